//! Explicit owner of all loaded content.
//!
//! # Purpose
//!
//! [`ContentContext`] owns one [`PrefabRegistry`] per prefab kind, the file hash
//! cache, and the random streams. There are no process-wide registries: callers
//! construct a context and pass it where content is needed.
//!
//! # Mental model
//!
//! - [`ContentContext::load`] resolves enabled packages, parses every listed
//!   file on worker threads, then applies the adds on the calling thread in
//!   package order and file order.
//! - [`ContentContext::reload_file`] is the hot-reload path: strip one file from
//!   every registry, parse it again, re-add.
//! - [`ContentContext::set_package_enabled`] adds or strips one package; the
//!   other packages keep their prefabs and priorities.
//! - Random streams are seeded by the first load only. Later loads and
//!   package toggles keep drawing from where the streams left off.
//! - [`ContentContext::teardown`] clears every registry, disposing each layer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tessera_random::{RandSync, SeededStreams};
use tessera_registry::{AddError, ContentPackage, ContentPath, Identifier, Prefab, PrefabRegistry};

use crate::config::{PackageManifest, PackageSource, TesseraConfig};
use crate::definition::{Declared, ParsedFile, read_file};
use crate::error::{ContentError, Result};
use crate::hash_cache::FileHashCache;
use crate::prefabs::{Instance, ItemPrefab, MapEntityPrefab, SpawnTemplate, StructurePrefab};

/// A package that is currently loaded.
#[derive(Debug, Clone)]
pub struct LoadedPackage {
	pub package: ContentPackage,
	pub root: PathBuf,
	/// Definition files in load order.
	pub files: Vec<PathBuf>,
}

impl LoadedPackage {
	/// Position of `path` in the manifest, if this package lists it.
	fn file_index(&self, path: &ContentPath) -> Option<u32> {
		self.files
			.iter()
			.position(|f| ContentPath::from_path(f) == *path)
			.map(|i| i as u32)
	}
}

/// Counters for one load or reload pass.
#[derive(Debug, Default)]
pub struct LoadReport {
	/// Packages loaded once the pass finished.
	pub packages: usize,
	pub files: usize,
	pub added: usize,
	/// Definitions rejected as duplicates or for lacking an identifier.
	pub rejected: usize,
	/// Layers removed by a package toggle.
	pub removed: usize,
	/// Files or packages that could not be read or parsed.
	pub failures: Vec<ContentError>,
}

/// Result of [`ContentContext::reload_file`].
#[derive(Debug)]
pub enum ReloadOutcome {
	/// The file hash did not change; nothing was touched.
	Unchanged,
	/// The file's definitions were replaced.
	Reloaded { removed: usize, added: usize, rejected: usize },
	/// The file no longer exists; its definitions were removed.
	Removed { removed: usize },
	/// The path is not part of any loaded package.
	NotLoaded,
}

#[derive(Debug, Default)]
struct AddCounts {
	added: usize,
	rejected: usize,
}

/// Owner of every content registry.
#[derive(Debug)]
pub struct ContentContext {
	pub items: PrefabRegistry<ItemPrefab>,
	pub structures: PrefabRegistry<StructurePrefab>,
	pub spawn_templates: PrefabRegistry<SpawnTemplate>,
	hashes: FileHashCache,
	config: TesseraConfig,
	packages: Vec<LoadedPackage>,
	streams: SeededStreams,
	streams_seeded: bool,
}

impl Default for ContentContext {
	fn default() -> Self {
		Self::new()
	}
}

impl ContentContext {
	pub fn new() -> Self {
		Self {
			items: PrefabRegistry::new("items"),
			structures: PrefabRegistry::new("structures"),
			spawn_templates: PrefabRegistry::new("spawn_templates"),
			hashes: FileHashCache::new(),
			config: TesseraConfig::default(),
			packages: Vec::new(),
			streams: SeededStreams::new(0),
			streams_seeded: false,
		}
	}

	pub fn config(&self) -> &TesseraConfig {
		&self.config
	}

	/// Loaded packages in load order.
	pub fn packages(&self) -> &[LoadedPackage] {
		&self.packages
	}

	pub fn hashes(&self) -> &FileHashCache {
		&self.hashes
	}

	pub fn streams_mut(&mut self) -> &mut SeededStreams {
		&mut self.streams
	}

	/// Replaces all loaded content with the packages enabled in `config`.
	///
	/// Unreadable packages and files are logged, recorded in the report and
	/// skipped; the rest of the content set still loads. A package's load index
	/// is its position in `config`, disabled entries included.
	pub fn load(&mut self, config: TesseraConfig) -> LoadReport {
		self.teardown();
		if self.streams_seeded {
			tracing::debug!(seed = self.streams.seed(), "keeping running random streams");
		} else {
			self.streams = SeededStreams::new(config.random.seed);
			self.streams_seeded = true;
		}
		self.config = config;

		for source in self.config.packages.iter().filter(|p| !p.enabled) {
			tracing::warn!(package = %source.name, "package disabled, skipping");
		}
		let sources: Vec<(usize, PackageSource)> = self
			.config
			.packages
			.iter()
			.enumerate()
			.filter(|(_, p)| p.enabled)
			.map(|(i, p)| (i, p.clone()))
			.collect();
		let report = self.load_packages(&sources);

		tracing::info!(
			packages = report.packages,
			files = report.files,
			added = report.added,
			rejected = report.rejected,
			failures = report.failures.len(),
			"content loaded"
		);
		report
	}

	/// Resolves, parses and applies `sources` on top of the current content.
	fn load_packages(&mut self, sources: &[(usize, PackageSource)]) -> LoadReport {
		let mut report = LoadReport::default();
		let mut resolved = Vec::new();
		for (load_index, source) in sources {
			match resolve_package(source, *load_index as i32) {
				Ok(loaded) => resolved.push(loaded),
				Err(err) => {
					tracing::warn!(package = %source.name, error = %err, "package unavailable");
					report.failures.push(err);
				}
			}
		}

		let jobs: Vec<ParseJob> = resolved
			.iter()
			.flat_map(|p| {
				p.files
					.iter()
					.enumerate()
					.map(|(i, f)| (f.clone(), p.package.clone(), i as u32))
			})
			.collect();
		let parsed = parse_parallel(&jobs, &self.hashes);

		for loaded in resolved {
			let index = loaded.package.load_index();
			let at = self.packages.partition_point(|p| p.package.load_index() < index);
			self.packages.insert(at, loaded);
		}

		for result in parsed {
			match result {
				Ok(file) => {
					let counts = self.apply(file);
					report.files += 1;
					report.added += counts.added;
					report.rejected += counts.rejected;
				}
				Err(err) => {
					tracing::warn!(error = %err, "skipping unreadable content file");
					report.failures.push(err);
				}
			}
		}
		self.sort_all();
		report.packages = self.packages.len();
		report
	}

	/// Re-reads one definition file if its contents changed.
	pub fn reload_file(&mut self, path: &Path) -> Result<ReloadOutcome> {
		let content_path = ContentPath::from_path(path);
		let Some((package, file_index)) = self
			.packages
			.iter()
			.find_map(|p| p.file_index(&content_path).map(|i| (p.package.clone(), i)))
		else {
			tracing::warn!(file = %content_path, "reload requested for a file outside loaded packages");
			return Ok(ReloadOutcome::NotLoaded);
		};

		let text = match std::fs::read_to_string(path) {
			Ok(text) => text,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				let removed = self.remove_file(&content_path);
				self.hashes.remove(&content_path);
				self.sort_all();
				tracing::info!(file = %content_path, removed, "content file deleted");
				return Ok(ReloadOutcome::Removed { removed });
			}
			Err(err) => return Err(ContentError::io(path, err)),
		};

		if !self.hashes.refresh(&content_path, text.as_bytes()) {
			tracing::debug!(file = %content_path, "content file unchanged, skipping reload");
			return Ok(ReloadOutcome::Unchanged);
		}

		let parsed = crate::definition::parse_str(path, &text, &package, file_index);
		let removed = self.remove_file(&content_path);
		let counts = match parsed {
			Ok(file) => self.apply(file),
			Err(err) => {
				// Keep the stale hash out so the next attempt re-parses.
				self.hashes.remove(&content_path);
				self.sort_all();
				return Err(err);
			}
		};
		self.sort_all();

		tracing::info!(
			file = %content_path,
			removed,
			added = counts.added,
			rejected = counts.rejected,
			"content file reloaded"
		);
		Ok(ReloadOutcome::Reloaded {
			removed,
			added: counts.added,
			rejected: counts.rejected,
		})
	}

	/// Removes every definition of a loaded package and marks it disabled.
	///
	/// Returns the number of layers removed.
	pub fn unload_package(&mut self, name: &str) -> Result<usize> {
		let idx = self
			.packages
			.iter()
			.position(|p| p.package.name_matches(name))
			.ok_or_else(|| ContentError::UnknownPackage(name.to_string()))?;
		let loaded = self.packages.remove(idx);
		if let Some(source) = self.config.package_mut(loaded.package.name()) {
			source.enabled = false;
		}

		let mut removed = 0;
		for file in &loaded.files {
			let path = ContentPath::from_path(file);
			removed += self.remove_file(&path);
			self.hashes.remove(&path);
		}
		self.sort_all();
		tracing::info!(package = %loaded.package, removed, "package unloaded");
		Ok(removed)
	}

	/// Enables or disables a configured package.
	///
	/// Only that package's files are parsed or stripped; prefabs from other
	/// packages stay in place.
	pub fn set_package_enabled(&mut self, name: &str, enabled: bool) -> Result<LoadReport> {
		let (load_index, source) = self
			.config
			.packages
			.iter()
			.enumerate()
			.find(|(_, p)| p.name_matches(name))
			.map(|(i, p)| (i, p.clone()))
			.ok_or_else(|| ContentError::UnknownPackage(name.to_string()))?;
		tracing::info!(package = %source.name, enabled, "package toggled");

		let loaded = self.packages.iter().any(|p| p.package.name_matches(&source.name));
		let mut report = LoadReport::default();
		if enabled {
			if let Some(entry) = self.config.packages.get_mut(load_index) {
				entry.enabled = true;
			}
			if !loaded {
				report = self.load_packages(&[(load_index, source)]);
			}
		} else if loaded {
			report.removed = self.unload_package(&source.name)?;
		} else if let Some(entry) = self.config.packages.get_mut(load_index) {
			entry.enabled = false;
		}
		report.packages = self.packages.len();
		Ok(report)
	}

	/// Clears every registry, disposing all stored prefabs.
	pub fn teardown(&mut self) {
		self.items.clear();
		self.structures.clear();
		self.spawn_templates.clear();
		self.hashes.clear();
		self.packages.clear();
	}

	/// Re-sorts every registry by package load order.
	pub fn sort_all(&mut self) {
		self.items.sort_all();
		self.structures.sort_all();
		self.spawn_templates.sort_all();
	}

	/// Item by identifier, falling back to aliases.
	pub fn find_item(&self, name: &str) -> Option<&Arc<ItemPrefab>> {
		let identifier = Identifier::new(name);
		if identifier.is_empty() {
			return None;
		}
		self.items
			.get(&identifier)
			.or_else(|| self.items.find(|item| item.has_alias(&identifier)))
	}

	/// Every placeable prefab: items first, then structures, each in registry order.
	pub fn map_entities(&self) -> Vec<MapEntityPrefab> {
		self.items
			.iter()
			.cloned()
			.map(MapEntityPrefab::Item)
			.chain(self.structures.iter().cloned().map(MapEntityPrefab::Structure))
			.collect()
	}

	/// Placeable prefab by identifier; items shadow structures of the same name.
	pub fn find_map_entity(&self, identifier: &Identifier) -> Option<MapEntityPrefab> {
		if let Some(item) = self.items.get(identifier) {
			return Some(MapEntityPrefab::Item(item.clone()));
		}
		self.structures
			.get(identifier)
			.map(|s| MapEntityPrefab::Structure(s.clone()))
	}

	/// Builds an instance of the named placeable prefab.
	pub fn instantiate(&self, identifier: &Identifier) -> Option<Instance> {
		let Some(prefab) = self.find_map_entity(identifier) else {
			tracing::error!(identifier = %identifier, "cannot instantiate unknown map entity");
			return None;
		};
		let instance = prefab.instantiate();
		tracing::debug!(kind = prefab.kind(), identifier = %identifier, "instantiated map entity");
		Some(instance)
	}

	/// Weighted-random item from `stream`.
	pub fn random_item(&mut self, stream: RandSync) -> Option<Arc<ItemPrefab>> {
		self.items.get_random(&mut self.streams, stream).cloned()
	}

	/// Weighted-random structure from `stream`.
	pub fn random_structure(&mut self, stream: RandSync) -> Option<Arc<StructurePrefab>> {
		self.structures.get_random(&mut self.streams, stream).cloned()
	}

	/// Weighted-random spawn template from `stream`.
	pub fn random_spawn_template(&mut self, stream: RandSync) -> Option<Arc<SpawnTemplate>> {
		self.spawn_templates.get_random(&mut self.streams, stream).cloned()
	}

	/// Picks an item set from the named spawn template.
	pub fn roll_spawn_template(&mut self, identifier: &Identifier, stream: RandSync) -> Option<Vec<Identifier>> {
		let template = self.spawn_templates.get_or_log(identifier)?;
		template
			.pick_item_set(&mut self.streams, stream)
			.map(|set| set.items.clone())
	}

	fn remove_file(&mut self, path: &ContentPath) -> usize {
		self.items.remove_by_file(path).removed
			+ self.structures.remove_by_file(path).removed
			+ self.spawn_templates.remove_by_file(path).removed
	}

	fn apply(&mut self, file: ParsedFile) -> AddCounts {
		let mut counts = AddCounts::default();
		if file.override_file {
			if !file.items.is_empty() {
				self.items.add_override_file(file.content_path.clone(), file.package.clone());
			}
			if !file.structures.is_empty() {
				self.structures.add_override_file(file.content_path.clone(), file.package.clone());
			}
			if !file.spawn_templates.is_empty() {
				self.spawn_templates
					.add_override_file(file.content_path.clone(), file.package.clone());
			}
		}
		add_all(&mut self.items, file.items, &mut counts);
		add_all(&mut self.structures, file.structures, &mut counts);
		add_all(&mut self.spawn_templates, file.spawn_templates, &mut counts);
		tracing::debug!(file = %file.content_path, added = counts.added, rejected = counts.rejected, "applied content file");
		counts
	}
}

fn add_all<T: Prefab>(registry: &mut PrefabRegistry<T>, declared: Vec<Declared<T>>, counts: &mut AddCounts) {
	for Declared { prefab, allow_override } in declared {
		match registry.add(prefab, allow_override) {
			Ok(_) => counts.added += 1,
			Err(AddError::EmptyIdentifier { .. } | AddError::Duplicate(_)) => counts.rejected += 1,
		}
	}
}

/// A file to parse: path, owning package and position in that package.
type ParseJob = (PathBuf, ContentPackage, u32);

fn resolve_package(source: &PackageSource, load_index: i32) -> Result<LoadedPackage> {
	let manifest = PackageManifest::load(&source.path)?;
	if !source.name_matches(&manifest.name) {
		tracing::warn!(
			package = %source.name,
			manifest_name = %manifest.name,
			"package manifest name differs from configured name"
		);
	}
	Ok(LoadedPackage {
		package: ContentPackage::new(source.name.as_str(), load_index),
		files: manifest.files.iter().map(|f| source.path.join(f)).collect(),
		root: source.path.clone(),
	})
}

/// Parses every job on worker threads, returning results in job order.
///
/// Hashes are recorded into `hashes` from the workers as files are read.
fn parse_parallel(jobs: &[ParseJob], hashes: &FileHashCache) -> Vec<Result<ParsedFile>> {
	if jobs.is_empty() {
		return Vec::new();
	}
	let threads = std::thread::available_parallelism()
		.map_or(1, usize::from)
		.min(jobs.len());
	let per_thread = jobs.len().div_ceil(threads);

	let parse = |(path, package, file_index): &ParseJob| -> Result<ParsedFile> {
		let parsed = read_file(path, package, *file_index)?;
		hashes.insert(parsed.content_path.clone(), parsed.hash.clone());
		Ok(parsed)
	};

	if threads == 1 {
		return jobs.iter().map(parse).collect();
	}

	std::thread::scope(|s| {
		let workers: Vec<_> = jobs
			.chunks(per_thread)
			.map(|chunk| s.spawn(move || chunk.iter().map(parse).collect::<Vec<_>>()))
			.collect();
		workers
			.into_iter()
			.flat_map(|worker| worker.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
			.collect()
	})
}
