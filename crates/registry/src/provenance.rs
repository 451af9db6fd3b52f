//! Where a registry layer came from.
//!
//! # Role
//!
//! Every layer in an override stack carries a [`Provenance`] built at insertion
//! time. File-scoped invalidation matches on [`ContentPath`], override-file
//! hiding and load-order sorting compare [`Provenance::load_priority`].

use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// A content source with its position in the load order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentPackage {
	name: Arc<str>,
	load_index: i32,
}

impl ContentPackage {
	pub fn new(name: impl Into<Arc<str>>, load_index: i32) -> Self {
		Self {
			name: name.into(),
			load_index,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Position in the load order; higher loads later and wins ties.
	pub fn load_index(&self) -> i32 {
		self.load_index
	}

	/// Case-insensitive package name comparison.
	pub fn name_matches(&self, name: &str) -> bool {
		names_match(&self.name, name.trim())
	}
}

impl std::fmt::Display for ContentPackage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}#{}", self.name, self.load_index)
	}
}

/// Normalized path of a definition file.
///
/// Separators are unified to `/`, `.` segments dropped and `..` collapsed
/// lexically. Comparison ignores case, since content authored on one platform
/// is routinely loaded on another.
#[derive(Clone)]
pub struct ContentPath {
	normalized: Arc<str>,
	key: Arc<str>,
}

impl ContentPath {
	pub fn new(raw: &str) -> Self {
		let normalized = normalize(raw);
		let key = normalized.to_lowercase();
		let normalized: Arc<str> = Arc::from(normalized);
		let key = if *key == *normalized { normalized.clone() } else { Arc::from(key) };
		Self { normalized, key }
	}

	pub fn from_path(path: &Path) -> Self {
		Self::new(&path.to_string_lossy())
	}

	/// Normalized path with the author's casing.
	pub fn as_str(&self) -> &str {
		&self.normalized
	}

	/// Lowercased comparison key.
	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn is_empty(&self) -> bool {
		self.key.is_empty()
	}
}

/// Compares two names ignoring case, allocating only for non-ASCII input.
pub fn names_match(a: &str, b: &str) -> bool {
	if a.is_ascii() && b.is_ascii() {
		a.eq_ignore_ascii_case(b)
	} else {
		a.to_lowercase() == b.to_lowercase()
	}
}

fn normalize(raw: &str) -> String {
	let unified = raw.trim().replace('\\', "/");
	let absolute = unified.starts_with('/');
	let mut segments: Vec<&str> = Vec::new();
	for segment in unified.split('/') {
		match segment {
			"" | "." => {}
			".." => {
				if segments.last().is_some_and(|last| *last != "..") {
					segments.pop();
				} else if !absolute {
					segments.push("..");
				}
			}
			other => segments.push(other),
		}
	}
	let joined = segments.join("/");
	if absolute { format!("/{joined}") } else { joined }
}

impl PartialEq for ContentPath {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for ContentPath {}

impl Hash for ContentPath {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}

impl From<&str> for ContentPath {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<&Path> for ContentPath {
	fn from(value: &Path) -> Self {
		Self::from_path(value)
	}
}

impl std::fmt::Debug for ContentPath {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "ContentPath({:?})", &*self.normalized)
	}
}

impl std::fmt::Display for ContentPath {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.normalized)
	}
}

/// Immutable record binding one layer to its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
	pub file: Option<ContentPath>,
	pub package: Option<ContentPackage>,
	/// Load index of [`Self::package`], `0` for package-less definitions.
	pub load_priority: i32,
	/// Position of [`Self::file`] in its package's file list.
	pub file_index: u32,
	/// Whether the definition was marked as an override.
	pub allow_override: bool,
}

impl Provenance {
	pub fn new(file: Option<ContentPath>, package: Option<ContentPackage>, allow_override: bool) -> Self {
		let load_priority = package.as_ref().map_or(0, ContentPackage::load_index);
		Self {
			file,
			package,
			load_priority,
			file_index: 0,
			allow_override,
		}
	}

	pub fn with_file_index(mut self, file_index: u32) -> Self {
		self.file_index = file_index;
		self
	}

	/// Returns true if this layer was loaded from `path`.
	pub fn is_from_file(&self, path: &ContentPath) -> bool {
		self.file.as_ref() == Some(path)
	}

	/// Returns true if this layer belongs to a package named `name`.
	pub fn is_from_package(&self, name: &str) -> bool {
		self.package.as_ref().is_some_and(|p| p.name_matches(name))
	}
}

impl std::fmt::Display for Provenance {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.file {
			Some(file) => write!(f, "{file}")?,
			None => write!(f, "<no file>")?,
		}
		if let Some(package) = &self.package {
			write!(f, " ({package})")?;
		}
		Ok(())
	}
}
