//! Contract between the registry and the values it stores.

use std::sync::Arc;

use crate::identifier::Identifier;
use crate::provenance::{ContentPackage, ContentPath};

/// Capability set a stored value must provide.
///
/// The registry reads only these accessors; every other field of a prefab is
/// opaque to it.
pub trait Prefab {
	/// Key the prefab is registered under.
	fn identifier(&self) -> &Identifier;

	/// Name as it appeared in the definition, before any normalization.
	fn original_name(&self) -> &str;

	/// Package the definition was loaded from.
	fn content_package(&self) -> Option<&ContentPackage> {
		None
	}

	/// File the definition was loaded from.
	fn file_path(&self) -> Option<&ContentPath> {
		None
	}

	/// Position of [`Self::file_path`] among its package's files.
	fn file_index(&self) -> u32 {
		0
	}

	/// Relative selection weight. Negative and non-finite values count as zero.
	fn commonness(&self) -> f32 {
		1.0
	}

	/// Releases resources tied to this definition.
	///
	/// Called exactly once, when the layer holding the prefab leaves its
	/// override stack for good.
	fn dispose(&self) {}
}

/// Callback surface invoked by a registry as layers come and go.
///
/// All methods default to no-ops.
pub trait RegistryObserver<T>: Send + Sync {
	/// A prefab was accepted, either as a new identifier or as an override.
	fn on_add(&mut self, _prefab: &Arc<T>, _is_override: bool) {}

	/// A prefab left the registry. Runs before [`Prefab::dispose`].
	fn on_remove(&mut self, _prefab: &Arc<T>) {}

	/// Stacks were resorted by load order.
	fn on_sort(&mut self) {}

	fn on_add_override_file(&mut self, _path: &ContentPath) {}

	fn on_remove_override_file(&mut self, _path: &ContentPath) {}
}
