//! Definition file schema and parsing.
//!
//! ```toml
//! override_file = false   # whole-file override of every kind it defines
//!
//! [[item]]
//! identifier = "wrench"
//! name = "Wrench"
//! commonness = 2.0
//! tags = ["tool"]
//! aliases = ["spanner"]
//!
//! [[structure]]
//! identifier = "hull_wall"
//! override = true
//!
//! [[spawn_template]]
//! identifier = "toolbox_loot"
//! item_sets = [{ commonness = 1.0, items = ["wrench"] }]
//! ```
//!
//! Parsing is pure: it runs on loader worker threads and never touches a registry.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tessera_registry::{ContentPackage, ContentPath, Identifier};

use crate::error::{ContentError, Result};
use crate::hash_cache::FileHash;
use crate::prefabs::{ItemPrefab, ItemSet, Source, SpawnTemplate, StructurePrefab};

#[cfg(test)]
mod tests;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionFile {
	#[serde(default)]
	override_file: bool,
	#[serde(default)]
	item: Vec<ItemDef>,
	#[serde(default)]
	structure: Vec<StructureDef>,
	#[serde(default)]
	spawn_template: Vec<SpawnTemplateDef>,
}

fn default_commonness() -> f32 {
	1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ItemDef {
	identifier: String,
	name: Option<String>,
	#[serde(default = "default_commonness")]
	commonness: f32,
	#[serde(default)]
	tags: Vec<String>,
	#[serde(default)]
	aliases: Vec<String>,
	#[serde(default, rename = "override")]
	allow_override: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StructureDef {
	identifier: String,
	name: Option<String>,
	#[serde(default = "default_commonness")]
	commonness: f32,
	body: Option<String>,
	#[serde(default, rename = "override")]
	allow_override: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ItemSetDef {
	#[serde(default = "default_commonness")]
	commonness: f32,
	#[serde(default)]
	items: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpawnTemplateDef {
	identifier: String,
	name: Option<String>,
	#[serde(default = "default_commonness")]
	commonness: f32,
	#[serde(default)]
	item_sets: Vec<ItemSetDef>,
	#[serde(default, rename = "override")]
	allow_override: bool,
}

/// A prefab plus the override flag it was declared with.
#[derive(Debug)]
pub struct Declared<T> {
	pub prefab: T,
	pub allow_override: bool,
}

/// Everything one definition file declares, in declaration order.
#[derive(Debug)]
pub struct ParsedFile {
	pub path: PathBuf,
	pub content_path: ContentPath,
	pub package: ContentPackage,
	pub hash: FileHash,
	/// The file replaces every kind it defines from earlier packages.
	pub override_file: bool,
	pub items: Vec<Declared<ItemPrefab>>,
	pub structures: Vec<Declared<StructurePrefab>>,
	pub spawn_templates: Vec<Declared<SpawnTemplate>>,
}

impl ParsedFile {
	pub fn prefab_count(&self) -> usize {
		self.items.len() + self.structures.len() + self.spawn_templates.len()
	}
}

/// Reads and parses one definition file.
///
/// `file_index` is the file's position in its package manifest.
pub fn read_file(path: &Path, package: &ContentPackage, file_index: u32) -> Result<ParsedFile> {
	let text = std::fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
	parse_str(path, &text, package, file_index)
}

/// Parses definition text loaded from `path`.
pub fn parse_str(path: &Path, text: &str, package: &ContentPackage, file_index: u32) -> Result<ParsedFile> {
	let file: DefinitionFile = toml::from_str(text).map_err(|e| ContentError::parse(path, e))?;
	let content_path = ContentPath::from_path(path);
	let source = Source {
		file: content_path.clone(),
		package: package.clone(),
		file_index,
	};
	// Everything in an override file overrides, whatever its own flag says.
	let forced = file.override_file;

	let items = file
		.item
		.into_iter()
		.map(|def| Declared {
			allow_override: forced || def.allow_override,
			prefab: ItemPrefab {
				name: def.name.unwrap_or_else(|| def.identifier.clone()),
				identifier: Identifier::new(&def.identifier),
				commonness: def.commonness,
				tags: def.tags,
				aliases: def.aliases.iter().map(|a| Identifier::new(a)).collect(),
				source: source.clone(),
			},
		})
		.collect();

	let structures = file
		.structure
		.into_iter()
		.map(|def| Declared {
			allow_override: forced || def.allow_override,
			prefab: StructurePrefab {
				name: def.name.unwrap_or_else(|| def.identifier.clone()),
				identifier: Identifier::new(&def.identifier),
				commonness: def.commonness,
				body: def.body,
				source: source.clone(),
			},
		})
		.collect();

	let spawn_templates = file
		.spawn_template
		.into_iter()
		.map(|def| Declared {
			allow_override: forced || def.allow_override,
			prefab: SpawnTemplate {
				name: def.name.unwrap_or_else(|| def.identifier.clone()),
				identifier: Identifier::new(&def.identifier),
				commonness: def.commonness,
				item_sets: def
					.item_sets
					.into_iter()
					.map(|set| ItemSet {
						commonness: set.commonness,
						items: set.items.iter().map(|i| Identifier::new(i)).collect(),
					})
					.collect(),
				source: source.clone(),
			},
		})
		.collect();

	Ok(ParsedFile {
		path: path.to_path_buf(),
		content_path,
		package: package.clone(),
		hash: FileHash::of(text.as_bytes()),
		override_file: file.override_file,
		items,
		structures,
		spawn_templates,
	})
}
