//! Content hashes of loaded definition files.
//!
//! Loader worker threads record hashes while parsing; the reloader compares
//! against them to skip files whose bytes did not change.

use std::collections::HashMap;

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use tessera_registry::ContentPath;

/// Lowercase hex SHA-256 of a file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHash(String);

impl FileHash {
	pub fn of(bytes: &[u8]) -> Self {
		Self(format!("{:x}", Sha256::digest(bytes)))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for FileHash {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

#[derive(Debug, Default)]
pub struct FileHashCache {
	entries: RwLock<HashMap<ContentPath, FileHash>>,
}

impl FileHashCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&self, path: ContentPath, hash: FileHash) -> Option<FileHash> {
		self.entries.write().insert(path, hash)
	}

	pub fn get(&self, path: &ContentPath) -> Option<FileHash> {
		self.entries.read().get(path).cloned()
	}

	pub fn remove(&self, path: &ContentPath) -> Option<FileHash> {
		self.entries.write().remove(path)
	}

	/// Stores the hash of `bytes`, returning true if it differs from the cached one.
	///
	/// A path with no cached hash counts as changed.
	pub fn refresh(&self, path: &ContentPath, bytes: &[u8]) -> bool {
		let hash = FileHash::of(bytes);
		let mut entries = self.entries.write();
		if entries.get(path) == Some(&hash) {
			return false;
		}
		entries.insert(path.clone(), hash);
		true
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	pub fn clear(&self) {
		self.entries.write().clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hash_is_lowercase_hex_sha256() {
		assert_eq!(
			FileHash::of(b"abc").as_str(),
			"ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
		);
	}

	#[test]
	fn refresh_reports_changes_only() {
		let cache = FileHashCache::new();
		let path = ContentPath::new("items.toml");
		assert!(cache.refresh(&path, b"one"));
		assert!(!cache.refresh(&ContentPath::new("./ITEMS.toml"), b"one"));
		assert!(cache.refresh(&path, b"two"));
		assert_eq!(cache.get(&path), Some(FileHash::of(b"two")));

		cache.remove(&path);
		assert!(cache.is_empty());
		assert!(cache.refresh(&path, b"two"));
	}
}
