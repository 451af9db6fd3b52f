//! `tessera.toml` and per-package `package.toml` schemas.
//!
//! ```toml
//! [random]
//! seed = 1234
//!
//! [log]
//! filter = "info"
//!
//! [[package]]
//! name = "Vanilla"
//! path = "content/vanilla"
//! ```
//!
//! Package paths are resolved against the directory holding `tessera.toml`.
//! Packages load in the order they are listed.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tessera_registry::names_match;

use crate::error::{ContentError, Result};

#[cfg(test)]
mod tests;

/// File name of a package manifest inside its directory.
pub const PACKAGE_MANIFEST: &str = "package.toml";

/// Parsed `tessera.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TesseraConfig {
	#[serde(default)]
	pub random: RandomConfig,
	#[serde(default)]
	pub log: LogConfig,
	/// Content packages in load order.
	#[serde(default, rename = "package")]
	pub packages: Vec<PackageSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RandomConfig {
	/// Seed for every random stream.
	#[serde(default)]
	pub seed: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
	/// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
	#[serde(default = "default_filter")]
	pub filter: String,
}

fn default_filter() -> String {
	"info".to_string()
}

impl Default for LogConfig {
	fn default() -> Self {
		Self { filter: default_filter() }
	}
}

/// One `[[package]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSource {
	pub name: String,
	pub path: PathBuf,
	#[serde(default = "default_enabled")]
	pub enabled: bool,
}

fn default_enabled() -> bool {
	true
}

impl PackageSource {
	pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
		Self {
			name: name.into(),
			path: path.into(),
			enabled: true,
		}
	}

	pub fn name_matches(&self, name: &str) -> bool {
		names_match(&self.name, name.trim())
	}
}

impl TesseraConfig {
	/// Parses a config string. Relative package paths are left as written.
	pub fn parse(input: &str) -> std::result::Result<Self, toml::de::Error> {
		toml::from_str(input)
	}

	/// Reads and validates a config file, resolving package paths against its directory.
	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
		let mut config = Self::parse(&text).map_err(|e| ContentError::parse(path, e))?;
		if let Some(base) = path.parent() {
			config.resolve_paths(base);
		}
		config.validate()?;
		Ok(config)
	}

	/// Makes every relative package path relative to `base`.
	pub fn resolve_paths(&mut self, base: &Path) {
		for package in &mut self.packages {
			if package.path.is_relative() {
				package.path = base.join(&package.path);
			}
		}
	}

	/// Rejects empty and duplicate package names.
	pub fn validate(&self) -> Result<()> {
		for (i, package) in self.packages.iter().enumerate() {
			if package.name.trim().is_empty() {
				return Err(ContentError::Config(format!("package #{i} has an empty name")));
			}
			if self.packages[..i].iter().any(|p| p.name_matches(&package.name)) {
				return Err(ContentError::Config(format!("package \"{}\" is listed twice", package.name)));
			}
		}
		Ok(())
	}

	pub fn package(&self, name: &str) -> Option<&PackageSource> {
		self.packages.iter().find(|p| p.name_matches(name))
	}

	pub fn package_mut(&mut self, name: &str) -> Option<&mut PackageSource> {
		self.packages.iter_mut().find(|p| p.name_matches(name))
	}

	/// Enabled packages in load order.
	pub fn enabled_packages(&self) -> impl Iterator<Item = &PackageSource> + '_ {
		self.packages.iter().filter(|p| p.enabled)
	}
}

/// Parsed `package.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageManifest {
	pub name: String,
	/// Definition files relative to the package directory, in load order.
	#[serde(default)]
	pub files: Vec<PathBuf>,
}

impl PackageManifest {
	/// Reads `package.toml` from a package directory.
	pub fn load(dir: &Path) -> Result<Self> {
		let path = dir.join(PACKAGE_MANIFEST);
		let text = std::fs::read_to_string(&path).map_err(|e| ContentError::io(&path, e))?;
		toml::from_str(&text).map_err(|e| ContentError::parse(&path, e))
	}
}
