//! Layered prefab registry.
//!
//! Content definitions ("prefabs") are registered under case-insensitive
//! [`Identifier`]s. Each identifier owns an [`OverrideStack`]: later packages may
//! override a definition without deleting it, and unloading the override
//! reveals the definition beneath. Whole files can be stripped from every stack
//! at once for hot reload, and weighted random picks consume a named
//! [`tessera_random::RandSync`] stream so peers stay in agreement.
//!
//! # Key types
//!
//! | Type | Role |
//! |------|------|
//! | [`PrefabRegistry`] | Identifier → override stack map for one prefab kind. |
//! | [`OverrideStack`] | Ordered layers of one identifier; last is active. |
//! | [`Prefab`] | Accessors the registry needs from a stored value. |
//! | [`Provenance`] | File, package and override flag of one layer. |
//! | [`select_weighted`] | Cumulative-weight pick over a fixed candidate order. |

mod error;
mod identifier;
mod prefab;
mod provenance;
mod registry;
mod select;
mod stack;
mod uint_id;

#[cfg(test)]
mod test_fixtures;

pub use error::{AddError, DuplicateIdentifier, RegistryError};
pub use identifier::Identifier;
pub use prefab::{Prefab, RegistryObserver};
pub use provenance::{ContentPackage, ContentPath, Provenance, names_match};
pub use registry::{Added, FileRemoval, Iter, PrefabRegistry};
pub use select::{SelectOutcome, select_weighted, select_weighted_outcome};
pub use stack::{Conflict, Layer, OverrideStack, Resolution};
pub use uint_id::hash_identifier;
