//! Content packages and the prefab kinds loaded from them.
//!
//! A [`ContentContext`] loads the packages listed in a [`TesseraConfig`], parses
//! their TOML definition files into [`ItemPrefab`], [`StructurePrefab`] and
//! [`SpawnTemplate`] values, and registers them in one
//! [`tessera_registry::PrefabRegistry`] per kind.

mod config;
mod context;
mod definition;
mod error;
mod hash_cache;
mod prefabs;

pub use config::{LogConfig, PACKAGE_MANIFEST, PackageManifest, PackageSource, RandomConfig, TesseraConfig};
pub use context::{ContentContext, LoadReport, LoadedPackage, ReloadOutcome};
pub use definition::{Declared, ParsedFile, parse_str, read_file};
pub use error::{ContentError, Result};
pub use hash_cache::{FileHash, FileHashCache};
pub use prefabs::{Instance, ItemPrefab, ItemSet, MapEntityPrefab, Source, SpawnTemplate, StructurePrefab};
