//! Whole-file overrides.
//!
//! A package can declare a definition file that replaces an entire content kind.
//! Once stacks are sorted, the registered file with the highest package load
//! index becomes the topmost override file, and every active prefab from a
//! package that loads before it is hidden from lookups. Hidden prefabs stay
//! stored and reappear once the file is removed.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::provenance::{ContentPackage, ContentPath, Provenance};

#[derive(Debug, Default)]
pub(crate) struct OverrideFiles {
	files: IndexMap<ContentPath, ContentPackage, FxBuildHasher>,
	topmost: Option<(ContentPath, i32)>,
}

impl OverrideFiles {
	/// Registers a file. Takes effect at the next [`Self::recompute`].
	pub(crate) fn add(&mut self, path: ContentPath, package: ContentPackage) -> bool {
		self.files.insert(path, package).is_none()
	}

	/// Unregisters a file. Removing the topmost file recomputes immediately so a
	/// stale file never keeps hiding content.
	pub(crate) fn remove(&mut self, path: &ContentPath) -> bool {
		if self.files.shift_remove(path).is_none() {
			return false;
		}
		if self.topmost.as_ref().is_some_and(|(top, _)| top == path) {
			self.recompute();
		}
		true
	}

	/// Picks the file with the highest load index; ties go to the earliest registered.
	pub(crate) fn recompute(&mut self) {
		let mut best: Option<(&ContentPath, i32)> = None;
		for (path, package) in &self.files {
			let index = package.load_index();
			if best.is_none_or(|(_, b)| index > b) {
				best = Some((path, index));
			}
		}
		self.topmost = best.map(|(path, index)| (path.clone(), index));
	}

	pub(crate) fn topmost(&self) -> Option<&ContentPath> {
		self.topmost.as_ref().map(|(path, _)| path)
	}

	/// Returns true if a layer with this provenance is hidden by the topmost file.
	pub(crate) fn hides(&self, provenance: &Provenance) -> bool {
		self.topmost
			.as_ref()
			.is_some_and(|(_, index)| *index > provenance.load_priority)
	}

	pub(crate) fn contains(&self, path: &ContentPath) -> bool {
		self.files.contains_key(path)
	}

	pub(crate) fn paths(&self) -> impl Iterator<Item = &ContentPath> + '_ {
		self.files.keys()
	}

	pub(crate) fn clear(&mut self) {
		self.files.clear();
		self.topmost = None;
	}
}
