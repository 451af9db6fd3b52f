//! Concrete prefab kinds.
//!
//! Each kind carries the provenance the loader tagged it with and implements
//! [`Prefab`] so it can live in a [`tessera_registry::PrefabRegistry`].

use std::sync::Arc;

use tessera_random::{RandSync, RandomStreams};
use tessera_registry::{ContentPackage, ContentPath, Identifier, Prefab, names_match, select_weighted};

#[cfg(test)]
mod tests;

/// Where a definition was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
	pub file: ContentPath,
	pub package: ContentPackage,
	/// Position of `file` in the package manifest.
	pub file_index: u32,
}

macro_rules! impl_prefab {
	($ty:ty, $kind:literal) => {
		impl Prefab for $ty {
			fn identifier(&self) -> &Identifier {
				&self.identifier
			}

			fn original_name(&self) -> &str {
				&self.name
			}

			fn content_package(&self) -> Option<&ContentPackage> {
				Some(&self.source.package)
			}

			fn file_path(&self) -> Option<&ContentPath> {
				Some(&self.source.file)
			}

			fn file_index(&self) -> u32 {
				self.source.file_index
			}

			fn commonness(&self) -> f32 {
				self.commonness
			}

			fn dispose(&self) {
				tracing::trace!(kind = $kind, identifier = %self.identifier, file = %self.source.file, "prefab disposed");
			}
		}
	};
}

/// Item definition.
#[derive(Debug, Clone)]
pub struct ItemPrefab {
	pub identifier: Identifier,
	pub name: String,
	pub commonness: f32,
	pub tags: Vec<String>,
	/// Alternate identifiers content may refer to this item by.
	pub aliases: Vec<Identifier>,
	pub source: Source,
}

impl ItemPrefab {
	pub fn has_tag(&self, tag: &str) -> bool {
		self.tags.iter().any(|t| names_match(t, tag))
	}

	pub fn has_alias(&self, alias: &Identifier) -> bool {
		self.aliases.contains(alias)
	}
}

impl_prefab!(ItemPrefab, "item");

/// Structure definition.
#[derive(Debug, Clone)]
pub struct StructurePrefab {
	pub identifier: Identifier,
	pub name: String,
	pub commonness: f32,
	/// Collision body description, if the structure has one.
	pub body: Option<String>,
	pub source: Source,
}

impl_prefab!(StructurePrefab, "structure");

/// Weighted group of item identifiers a spawn template can hand out together.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSet {
	pub commonness: f32,
	pub items: Vec<Identifier>,
}

/// Spawn template: picks one of its item sets at random.
#[derive(Debug, Clone)]
pub struct SpawnTemplate {
	pub identifier: Identifier,
	pub name: String,
	pub commonness: f32,
	/// Candidate sets in declaration order.
	pub item_sets: Vec<ItemSet>,
	pub source: Source,
}

impl SpawnTemplate {
	/// Weighted pick among the item sets, walking them in declaration order.
	pub fn pick_item_set<R>(&self, streams: &mut R, stream: RandSync) -> Option<&ItemSet>
	where
		R: RandomStreams + ?Sized,
	{
		select_weighted(&self.item_sets, |set| f64::from(set.commonness), streams, stream)
	}
}

impl_prefab!(SpawnTemplate, "spawn_template");

/// Anything that can be placed on a map.
#[derive(Debug, Clone)]
pub enum MapEntityPrefab {
	Item(Arc<ItemPrefab>),
	Structure(Arc<StructurePrefab>),
}

impl MapEntityPrefab {
	pub fn identifier(&self) -> &Identifier {
		match self {
			Self::Item(item) => &item.identifier,
			Self::Structure(structure) => &structure.identifier,
		}
	}

	pub fn name(&self) -> &str {
		match self {
			Self::Item(item) => &item.name,
			Self::Structure(structure) => &structure.name,
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Self::Item(_) => "item",
			Self::Structure(_) => "structure",
		}
	}

	/// Builds a placement description from this prefab.
	pub fn instantiate(&self) -> Instance {
		match self {
			Self::Item(item) => Instance::Item {
				identifier: item.identifier.clone(),
				name: item.name.clone(),
				tags: item.tags.clone(),
			},
			Self::Structure(structure) => Instance::Structure {
				identifier: structure.identifier.clone(),
				name: structure.name.clone(),
				body: structure.body.clone(),
			},
		}
	}
}

/// A placed map entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Instance {
	Item {
		identifier: Identifier,
		name: String,
		tags: Vec<String>,
	},
	Structure {
		identifier: Identifier,
		name: String,
		body: Option<String>,
	},
}

impl Instance {
	pub fn identifier(&self) -> &Identifier {
		match self {
			Self::Item { identifier, .. } | Self::Structure { identifier, .. } => identifier,
		}
	}
}
