//! Property checks over random add/remove sequences.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;

use super::*;
use crate::test_fixtures::TestPrefab;

#[derive(Debug, Clone)]
enum Op {
	Add { id: u8, file: u8, allow_override: bool },
	RemoveFile { file: u8 },
	RemoveNth { nth: usize },
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![
		4 => (0u8..6, 0u8..4, any::<bool>()).prop_map(|(id, file, allow_override)| Op::Add { id, file, allow_override }),
		1 => (0u8..4).prop_map(|file| Op::RemoveFile { file }),
		1 => any::<usize>().prop_map(|nth| Op::RemoveNth { nth }),
	]
}

fn file(n: u8) -> ContentPath {
	ContentPath::new(&format!("defs/{n}.toml"))
}

proptest! {
	#[test]
	fn layers_are_disposed_once_and_stacks_never_empty(ops in prop::collection::vec(op(), 0..64)) {
		let counter = Arc::new(AtomicUsize::new(0));
		let mut reg = PrefabRegistry::new("prop");
		let mut accepted = 0usize;
		let mut live: Vec<Arc<TestPrefab>> = Vec::new();

		for op in ops {
			match op {
				Op::Add { id, file: f, allow_override } => {
					let mut prefab = TestPrefab::new(&format!("p{id}")).in_file(&format!("defs/{f}.toml"));
					prefab.disposed = counter.clone();
					if let Ok(added) = reg.add(prefab, allow_override) {
						accepted += 1;
						live.push(added.prefab);
					}
				}
				Op::RemoveFile { file: f } => {
					let path = file(f);
					reg.remove_by_file(&path);
					live.retain(|p| !p.file.as_ref().is_some_and(|pf| *pf == path));
				}
				Op::RemoveNth { nth } => {
					if !live.is_empty() {
						let prefab = live.remove(nth % live.len());
						prop_assert!(reg.remove(&prefab));
					}
				}
			}

			for id in reg.keys() {
				let stack = reg.stack(id).expect("key has a stack");
				prop_assert!(!stack.is_empty());
				prop_assert!(reg.get(id).is_some());
			}
			prop_assert_eq!(reg.layers().count(), live.len());
			prop_assert_eq!(counter.load(Ordering::SeqCst), accepted - live.len());
		}

		drop(reg);
		prop_assert_eq!(counter.load(Ordering::SeqCst), accepted);
	}

	#[test]
	fn keys_keep_first_insertion_order(ids in prop::collection::vec(0u8..8, 1..32)) {
		let mut reg = PrefabRegistry::new("prop");
		let mut expected: Vec<Identifier> = Vec::new();
		for id in ids {
			let identifier = Identifier::new(&format!("k{id}"));
			let _ = reg.add(TestPrefab::new(identifier.as_str()), true);
			if !expected.contains(&identifier) {
				expected.push(identifier);
			}
		}
		let keys: Vec<_> = reg.keys().cloned().collect();
		prop_assert_eq!(keys, expected);
	}
}
