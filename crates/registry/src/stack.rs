//! Per-identifier override stack.
//!
//! # Role
//!
//! An [`OverrideStack`] holds every definition loaded for one identifier, in the
//! order they shadowed each other. The last layer is the active one; the layers
//! beneath it stay stored so that removing an override reveals what it covered.
//!
//! # Invariants
//!
//! - The active layer is always the last element.
//! - At most one non-overriding layer is stored, always at the bottom.
//! - Removal preserves the relative order of the remaining layers.
//! - The stack never disposes layers; whoever removes a layer owns its disposal.

use std::sync::Arc;

use crate::provenance::Provenance;


/// One stored definition and where it came from.
#[derive(Debug)]
pub struct Layer<T> {
	pub prefab: Arc<T>,
	pub provenance: Provenance,
}

impl<T> Layer<T> {
	pub fn new(prefab: Arc<T>, provenance: Provenance) -> Self {
		Self { prefab, provenance }
	}

	/// Returns true if this layer holds exactly `prefab` (pointer identity).
	pub fn holds(&self, prefab: &Arc<T>) -> bool {
		Arc::ptr_eq(&self.prefab, prefab)
	}
}

impl<T> Clone for Layer<T> {
	fn clone(&self) -> Self {
		Self {
			prefab: self.prefab.clone(),
			provenance: self.provenance.clone(),
		}
	}
}

/// How a successful push changed the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	/// The stack was empty; the layer is the base definition.
	Inserted,
	/// The layer now shadows `shadowed` layers beneath it.
	Overrode { shadowed: usize },
	/// The layer became the base beneath `overrides` existing overrides.
	Underlaid { overrides: usize },
}

/// A rejected push.
#[derive(Debug)]
pub struct Conflict<T> {
	pub rejected: Layer<T>,
	/// Provenance of the layer that stayed active.
	pub existing: Provenance,
}

/// Ordered definitions for one identifier.
#[derive(Debug)]
pub struct OverrideStack<T> {
	layers: Vec<Layer<T>>,
}

impl<T> Default for OverrideStack<T> {
	fn default() -> Self {
		Self { layers: Vec::new() }
	}
}

impl<T> OverrideStack<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a stack whose only layer is `base`.
	pub fn with_base(base: Layer<T>) -> Self {
		Self { layers: vec![base] }
	}

	/// Pushes a layer, or hands it back if it would conflict with the base one.
	///
	/// The first non-overriding definition wins: a second one is rejected. A
	/// non-overriding layer arriving while only overrides are stored (its file
	/// was reloaded underneath them) becomes the base and stays shadowed.
	pub fn push(&mut self, layer: Layer<T>) -> Result<Resolution, Conflict<T>> {
		if self.layers.is_empty() {
			self.layers.push(layer);
			return Ok(Resolution::Inserted);
		}
		if layer.provenance.allow_override {
			let shadowed = self.layers.len();
			self.layers.push(layer);
			return Ok(Resolution::Overrode { shadowed });
		}
		if let Some(base) = self.layers.iter().find(|l| !l.provenance.allow_override) {
			return Err(Conflict {
				existing: base.provenance.clone(),
				rejected: layer,
			});
		}
		let overrides = self.layers.len();
		self.layers.insert(0, layer);
		Ok(Resolution::Underlaid { overrides })
	}

	/// Removes every layer whose provenance matches, keeping the rest in order.
	pub fn pop_matching(&mut self, mut predicate: impl FnMut(&Provenance) -> bool) -> Vec<Layer<T>> {
		if !self.layers.iter().any(|l| predicate(&l.provenance)) {
			return Vec::new();
		}
		let (removed, kept) = std::mem::take(&mut self.layers)
			.into_iter()
			.partition(|l| predicate(&l.provenance));
		self.layers = kept;
		removed
	}

	/// Removes the layer holding exactly `prefab`.
	pub fn remove_prefab(&mut self, prefab: &Arc<T>) -> Option<Layer<T>> {
		let idx = self.layers.iter().position(|l| l.holds(prefab))?;
		Some(self.layers.remove(idx))
	}

	/// Removes every layer, bottom first.
	pub fn drain(&mut self) -> std::vec::Drain<'_, Layer<T>> {
		self.layers.drain(..)
	}

	/// The currently visible layer.
	#[inline]
	pub fn active(&self) -> Option<&Layer<T>> {
		self.layers.last()
	}

	#[inline]
	pub fn layers(&self) -> &[Layer<T>] {
		&self.layers
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.layers.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}

	pub fn contains(&self, prefab: &Arc<T>) -> bool {
		self.layers.iter().any(|l| l.holds(prefab))
	}

	/// Returns true if `prefab` is stored here as an override layer.
	pub fn is_override(&self, prefab: &Arc<T>) -> bool {
		self.layers.iter().any(|l| l.holds(prefab) && l.provenance.allow_override)
	}

	/// First layer, bottom up, that came from the named package.
	pub fn find_from_package(&self, package: &str) -> Option<&Layer<T>> {
		self.layers.iter().find(|l| l.provenance.is_from_package(package))
	}

	/// Reorders layers by load order.
	///
	/// Base definitions sink below overrides; overrides are ordered by package
	/// load priority, then by file position within the package. The sort is
	/// stable, so layers that compare equal keep their insertion order.
	pub fn sort_by_load_order(&mut self) {
		self.layers.sort_by_key(|l| {
			(
				l.provenance.allow_override,
				l.provenance.load_priority,
				l.provenance.file_index,
			)
		});
	}
}
