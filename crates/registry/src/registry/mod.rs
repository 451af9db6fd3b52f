//! The prefab registry.
//!
//! # Purpose
//!
//! [`PrefabRegistry`] maps each [`Identifier`] to an [`OverrideStack`] and is the
//! only writer of those stacks. It is generic over the stored prefab kind; one
//! instance exists per kind, owned by whatever object owns the loaded content.
//!
//! # Mental model
//!
//! 1. **Load:** the loader calls [`PrefabRegistry::add`] once per definition, in
//!    load order. The identifier's stack decides whether the definition becomes
//!    active or is rejected as a duplicate.
//! 2. **Query:** lookups and enumeration see only the active layer of each stack,
//!    minus anything hidden by the topmost override file.
//! 3. **Reload:** [`PrefabRegistry::remove_by_file`] strips one file's layers
//!    from every stack; the loader then re-adds the file's fresh definitions.
//! 4. **Teardown:** [`PrefabRegistry::clear`] (also run on drop) disposes every
//!    remaining layer.
//!
//! # Invariants
//!
//! - No stored stack is empty; emptying a stack deletes its identifier.
//!   - Enforced in: [`PrefabRegistry::remove`], [`PrefabRegistry::remove_by_file`].
//! - Enumeration follows first-insertion order of identifiers; an identifier
//!   re-added after full removal is appended.
//!   - Enforced in: `slots` (insertion-ordered, `shift_remove` on deletion).
//! - Every layer is disposed exactly once, when it leaves its stack.
//!   - Enforced in: [`PrefabRegistry::evict`].
//! - An override inherits the network id of the identifier it shadows.
//!   - Enforced in: [`PrefabRegistry::add_arc`].
//!
//! # Concurrency
//!
//! Mutation takes `&mut self`, reads take `&self`: a registry shared across
//! threads must sit behind a lock chosen by its owner. Nothing here blocks or
//! performs I/O.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tessera_random::{RandSync, RandomStreams};

use crate::error::{AddError, DuplicateIdentifier, RegistryError};
use crate::identifier::Identifier;
use crate::prefab::{Prefab, RegistryObserver};
use crate::provenance::{ContentPackage, ContentPath, Provenance};
use crate::select::select_weighted;
use crate::stack::{Layer, OverrideStack, Resolution};
use crate::uint_id::UintIds;

mod overrides;


#[cfg(test)]
mod invariants;

use overrides::OverrideFiles;

/// Stack of one identifier plus its network id.
#[derive(Debug)]
struct Slot<T> {
	stack: OverrideStack<T>,
	uint_id: u32,
}

/// A successful [`PrefabRegistry::add`].
#[derive(Debug)]
pub struct Added<T> {
	/// Handle to the stored prefab; pass it to [`PrefabRegistry::remove`].
	pub prefab: Arc<T>,
	pub identifier: Identifier,
	pub resolution: Resolution,
	pub uint_id: u32,
}

/// What a [`PrefabRegistry::remove_by_file`] call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRemoval {
	/// Number of layers removed across all stacks.
	pub removed: usize,
	/// Identifiers that no longer exist.
	pub emptied: Vec<Identifier>,
	/// Identifiers whose active layer changed but which still exist.
	pub reactivated: Vec<Identifier>,
}

impl FileRemoval {
	pub fn is_empty(&self) -> bool {
		self.removed == 0
	}
}

/// Registry of one prefab kind.
pub struct PrefabRegistry<T: Prefab> {
	label: &'static str,
	slots: IndexMap<Identifier, Slot<T>, FxBuildHasher>,
	uint_ids: UintIds,
	override_files: OverrideFiles,
	observers: Vec<Box<dyn RegistryObserver<T>>>,
}

impl<T: Prefab> PrefabRegistry<T> {
	/// Creates an empty registry. `label` names the prefab kind in log fields.
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			slots: IndexMap::default(),
			uint_ids: UintIds::default(),
			override_files: OverrideFiles::default(),
			observers: Vec::new(),
		}
	}

	pub fn with_observer(mut self, observer: impl RegistryObserver<T> + 'static) -> Self {
		self.add_observer(observer);
		self
	}

	pub fn add_observer(&mut self, observer: impl RegistryObserver<T> + 'static) {
		self.observers.push(Box::new(observer));
	}

	#[inline]
	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Number of registered identifiers, hidden ones included.
	#[inline]
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Adds a definition loaded from its own file and package.
	pub fn add(&mut self, prefab: T, allow_override: bool) -> Result<Added<T>, AddError<T>> {
		self.add_arc(Arc::new(prefab), allow_override)
	}

	/// Adds an already shared definition.
	///
	/// A non-overriding definition for an identifier that already has a base
	/// definition is rejected and logged; the existing definition stays active.
	pub fn add_arc(&mut self, prefab: Arc<T>, allow_override: bool) -> Result<Added<T>, AddError<T>> {
		let identifier = prefab.identifier().clone();
		if identifier.is_empty() {
			tracing::error!(registry = self.label, name = prefab.original_name(), "prefab has no identifier");
			return Err(AddError::EmptyIdentifier { rejected: prefab });
		}

		let provenance = Provenance::new(prefab.file_path().cloned(), prefab.content_package().cloned(), allow_override)
			.with_file_index(prefab.file_index());
		let layer = Layer::new(prefab.clone(), provenance);

		let (resolution, uint_id) = match self.slots.get_mut(&identifier) {
			Some(slot) => match slot.stack.push(layer) {
				Ok(resolution) => (resolution, slot.uint_id),
				Err(conflict) => {
					let duplicate = DuplicateIdentifier {
						identifier,
						rejected: conflict.rejected.prefab,
						rejected_from: conflict.rejected.provenance,
						existing_from: conflict.existing,
					};
					tracing::error!(registry = self.label, "{duplicate}");
					return Err(AddError::Duplicate(duplicate));
				}
			},
			None => {
				let uint_id = self.uint_ids.assign(self.label, &identifier);
				self.slots.insert(
					identifier.clone(),
					Slot {
						stack: OverrideStack::with_base(layer),
						uint_id,
					},
				);
				(Resolution::Inserted, uint_id)
			}
		};

		tracing::debug!(registry = self.label, identifier = %identifier, ?resolution, uint_id, "prefab added");
		for observer in &mut self.observers {
			observer.on_add(&prefab, allow_override);
		}
		Ok(Added {
			prefab,
			identifier,
			resolution,
			uint_id,
		})
	}

	/// Removes exactly `prefab` (matched by pointer identity) and disposes it.
	///
	/// If it was active, the layer beneath becomes active in the same call.
	/// Returns false if the prefab is not stored here.
	pub fn remove(&mut self, prefab: &Arc<T>) -> bool {
		let identifier = prefab.identifier();
		let Some(slot) = self.slots.get_mut(identifier) else {
			return false;
		};
		let Some(layer) = slot.stack.remove_prefab(prefab) else {
			return false;
		};
		if slot.stack.is_empty() {
			let uint_id = slot.uint_id;
			self.slots.shift_remove(identifier);
			self.uint_ids.release(uint_id);
		}
		tracing::debug!(registry = self.label, identifier = %identifier, "prefab removed");
		self.evict(layer);
		true
	}

	/// Removes every layer loaded from `path` and disposes them.
	///
	/// Identifiers left without layers are deleted; identifiers whose active
	/// layer changed now resolve to the next layer down. A path with no layers is
	/// a no-op. The path is also dropped from the override-file set.
	pub fn remove_by_file(&mut self, path: &ContentPath) -> FileRemoval {
		let mut report = FileRemoval::default();
		let mut evicted = Vec::new();
		let mut released = Vec::new();

		self.slots.retain(|identifier, slot| {
			let active_before = slot.stack.active().map(|l| Arc::as_ptr(&l.prefab));
			let removed = slot.stack.pop_matching(|p| p.is_from_file(path));
			if removed.is_empty() {
				return true;
			}
			report.removed += removed.len();
			evicted.extend(removed);
			if slot.stack.is_empty() {
				report.emptied.push(identifier.clone());
				released.push(slot.uint_id);
				return false;
			}
			if slot.stack.active().map(|l| Arc::as_ptr(&l.prefab)) != active_before {
				report.reactivated.push(identifier.clone());
			}
			true
		});

		for uint_id in released {
			self.uint_ids.release(uint_id);
		}
		for layer in evicted {
			self.evict(layer);
		}
		self.remove_override_file(path);

		if !report.is_empty() {
			tracing::debug!(
				registry = self.label,
				file = %path,
				removed = report.removed,
				emptied = report.emptied.len(),
				reactivated = report.reactivated.len(),
				"removed prefabs by file"
			);
		}
		report
	}

	/// Removes and disposes every layer, leaving an empty registry.
	pub fn clear(&mut self) {
		let slots = std::mem::take(&mut self.slots);
		let count = slots.len();
		for (_, mut slot) in slots {
			let layers: Vec<_> = slot.stack.drain().collect();
			for layer in layers {
				self.evict(layer);
			}
		}
		self.uint_ids.clear();
		self.override_files.clear();
		if count > 0 {
			tracing::debug!(registry = self.label, identifiers = count, "registry cleared");
		}
	}

	fn evict(&mut self, layer: Layer<T>) {
		for observer in &mut self.observers {
			observer.on_remove(&layer.prefab);
		}
		layer.prefab.dispose();
	}

	/// Returns true if the identifier has at least one layer, visible or not.
	pub fn contains_key(&self, identifier: &Identifier) -> bool {
		self.slots.contains_key(identifier)
	}

	/// Active prefab for `identifier`, or `None` if unknown or hidden.
	pub fn get(&self, identifier: &Identifier) -> Option<&Arc<T>> {
		let layer = self.slots.get(identifier)?.stack.active()?;
		(!self.override_files.hides(&layer.provenance)).then_some(&layer.prefab)
	}

	/// [`Self::get`] for an unnormalized string.
	pub fn get_str(&self, identifier: &str) -> Option<&Arc<T>> {
		self.get(&Identifier::new(identifier))
	}

	/// Active prefab, or the reason there is none.
	pub fn try_get(&self, identifier: &Identifier) -> Result<&Arc<T>, RegistryError> {
		let not_found = || RegistryError::NotFound {
			registry: self.label,
			identifier: identifier.clone(),
		};
		let layer = self
			.slots
			.get(identifier)
			.and_then(|slot| slot.stack.active())
			.ok_or_else(not_found)?;
		if self.override_files.hides(&layer.provenance)
			&& let Some(file) = self.override_files.topmost()
		{
			return Err(RegistryError::OverriddenByFile {
				registry: self.label,
				identifier: identifier.clone(),
				file: file.clone(),
			});
		}
		Ok(&layer.prefab)
	}

	/// [`Self::try_get`] for call sites that expect the prefab to exist; logs the miss.
	pub fn get_or_log(&self, identifier: &Identifier) -> Option<&Arc<T>> {
		match self.try_get(identifier) {
			Ok(prefab) => Some(prefab),
			Err(err) => {
				tracing::error!(registry = self.label, "{err}");
				None
			}
		}
	}

	/// Layer of `identifier` loaded from the named package, active or not.
	///
	/// An empty package name resolves to the active prefab.
	pub fn get_from_package(&self, identifier: &Identifier, package: &str) -> Option<&Arc<T>> {
		if package.trim().is_empty() {
			return self.get(identifier);
		}
		let stack = &self.slots.get(identifier)?.stack;
		stack.find_from_package(package).map(|l| &l.prefab)
	}

	/// Full override stack of `identifier`.
	pub fn stack(&self, identifier: &Identifier) -> Option<&OverrideStack<T>> {
		self.slots.get(identifier).map(|slot| &slot.stack)
	}

	/// Returns true if `prefab` is stored as an override layer.
	pub fn is_override(&self, prefab: &Arc<T>) -> bool {
		self.slots
			.get(prefab.identifier())
			.is_some_and(|slot| slot.stack.is_override(prefab))
	}

	/// Network id assigned to `identifier`.
	pub fn uint_id(&self, identifier: &Identifier) -> Option<u32> {
		self.slots.get(identifier).map(|slot| slot.uint_id)
	}

	/// Active prefab owning the network id `uint_id`.
	pub fn find_by_uint_id(&self, uint_id: u32) -> Option<&Arc<T>> {
		self.get(self.uint_ids.owner(uint_id)?)
	}

	/// First visible active prefab, in enumeration order, matching `predicate`.
	pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&Arc<T>> {
		self.iter().find(|p| predicate(p))
	}

	/// Registered identifiers in enumeration order, hidden ones included.
	pub fn keys(&self) -> impl Iterator<Item = &Identifier> + '_ {
		self.slots.keys()
	}

	/// Visible active prefabs in enumeration order.
	pub fn iter(&self) -> Iter<'_, T> {
		Iter {
			slots: self.slots.values(),
			override_files: &self.override_files,
		}
	}

	/// Every stored layer, shadowed ones included, bottom first per identifier.
	pub fn layers(&self) -> impl Iterator<Item = (&Identifier, &Layer<T>)> + '_ {
		self.slots
			.iter()
			.flat_map(|(identifier, slot)| slot.stack.layers().iter().map(move |layer| (identifier, layer)))
	}

	/// Weighted-random visible active prefab, weighted by [`Prefab::commonness`].
	pub fn get_random<R>(&self, streams: &mut R, stream: RandSync) -> Option<&Arc<T>>
	where
		R: RandomStreams + ?Sized,
	{
		select_weighted(self.iter(), |p| f64::from(p.commonness()), streams, stream)
	}

	/// [`Self::get_random`] restricted to prefabs matching `predicate`.
	pub fn get_random_where<R>(&self, mut predicate: impl FnMut(&T) -> bool, streams: &mut R, stream: RandSync) -> Option<&Arc<T>>
	where
		R: RandomStreams + ?Sized,
	{
		select_weighted(self.iter().filter(|p| predicate(p)), |p| f64::from(p.commonness()), streams, stream)
	}

	/// Registers a file that overrides every definition from earlier packages.
	///
	/// Takes effect at the next [`Self::sort_all`].
	pub fn add_override_file(&mut self, path: ContentPath, package: ContentPackage) {
		if self.override_files.add(path.clone(), package) {
			for observer in &mut self.observers {
				observer.on_add_override_file(&path);
			}
		}
	}

	pub fn remove_override_file(&mut self, path: &ContentPath) -> bool {
		if !self.override_files.remove(path) {
			return false;
		}
		for observer in &mut self.observers {
			observer.on_remove_override_file(path);
		}
		true
	}

	/// Registered override files in registration order.
	pub fn override_files(&self) -> impl Iterator<Item = &ContentPath> + '_ {
		self.override_files.paths()
	}

	pub fn is_override_file(&self, path: &ContentPath) -> bool {
		self.override_files.contains(path)
	}

	/// The override file currently hiding earlier packages.
	pub fn topmost_override_file(&self) -> Option<&ContentPath> {
		self.override_files.topmost()
	}

	/// Reorders every stack by package load order and re-evaluates override files.
	///
	/// Run after the package order changes, once all packages are loaded.
	pub fn sort_all(&mut self) {
		for slot in self.slots.values_mut() {
			slot.stack.sort_by_load_order();
		}
		self.override_files.recompute();
		for observer in &mut self.observers {
			observer.on_sort();
		}
		tracing::debug!(
			registry = self.label,
			identifiers = self.slots.len(),
			topmost_override = ?self.override_files.topmost().map(ContentPath::as_str),
			"sorted by load order"
		);
	}
}

impl<T: Prefab> Drop for PrefabRegistry<T> {
	fn drop(&mut self) {
		if !self.slots.is_empty() {
			self.clear();
		}
	}
}

impl<T: Prefab> std::fmt::Debug for PrefabRegistry<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PrefabRegistry")
			.field("label", &self.label)
			.field("identifiers", &self.slots.len())
			.field("topmost_override_file", &self.override_files.topmost())
			.finish()
	}
}

/// Iterator over visible active prefabs, in enumeration order.
pub struct Iter<'a, T> {
	slots: indexmap::map::Values<'a, Identifier, Slot<T>>,
	override_files: &'a OverrideFiles,
}

impl<'a, T> Iterator for Iter<'a, T> {
	type Item = &'a Arc<T>;

	fn next(&mut self) -> Option<Self::Item> {
		for slot in self.slots.by_ref() {
			if let Some(layer) = slot.stack.active()
				&& !self.override_files.hides(&layer.provenance)
			{
				return Some(&layer.prefab);
			}
		}
		None
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(0, self.slots.size_hint().1)
	}
}

impl<'a, T: Prefab> IntoIterator for &'a PrefabRegistry<T> {
	type Item = &'a Arc<T>;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
