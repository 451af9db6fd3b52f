use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{ContentPackage, ContentPath, Identifier, Prefab, Provenance};

/// Prefab stand-in that counts its disposals.
#[derive(Debug)]
pub(crate) struct TestPrefab {
	pub identifier: Identifier,
	pub name: String,
	pub file: Option<ContentPath>,
	pub package: Option<ContentPackage>,
	pub file_index: u32,
	pub commonness: f32,
	pub disposed: Arc<AtomicUsize>,
}

impl TestPrefab {
	pub fn new(id: &str) -> Self {
		Self {
			identifier: Identifier::new(id),
			name: id.to_string(),
			file: None,
			package: None,
			file_index: 0,
			commonness: 1.0,
			disposed: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// Tags the prefab with its definition file.
	pub fn in_file(mut self, file: &str) -> Self {
		self.file = Some(ContentPath::new(file));
		self
	}

	pub fn in_package(mut self, name: &str, load_index: i32) -> Self {
		self.package = Some(ContentPackage::new(name, load_index));
		self
	}

	/// Sets the position of the file within its package.
	pub fn file_index(mut self, file_index: u32) -> Self {
		self.file_index = file_index;
		self
	}

	pub fn named(mut self, name: &str) -> Self {
		self.name = name.to_string();
		self
	}

	pub fn weighted(mut self, commonness: f32) -> Self {
		self.commonness = commonness;
		self
	}

	pub fn disposals(&self) -> usize {
		self.disposed.load(Ordering::SeqCst)
	}

	pub fn provenance(&self, allow_override: bool) -> Provenance {
		Provenance::new(self.file.clone(), self.package.clone(), allow_override).with_file_index(self.file_index)
	}
}

impl Prefab for TestPrefab {
	fn identifier(&self) -> &Identifier {
		&self.identifier
	}

	fn original_name(&self) -> &str {
		&self.name
	}

	fn content_package(&self) -> Option<&ContentPackage> {
		self.package.as_ref()
	}

	fn file_path(&self) -> Option<&ContentPath> {
		self.file.as_ref()
	}

	fn file_index(&self) -> u32 {
		self.file_index
	}

	fn commonness(&self) -> f32 {
		self.commonness
	}

	fn dispose(&self) {
		self.disposed.fetch_add(1, Ordering::SeqCst);
	}
}
