//! Error types for content loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration or content files.
#[derive(Debug, Error)]
pub enum ContentError {
	/// A file could not be read.
	#[error("I/O error reading {path}: {error}")]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},

	/// A definition or manifest file is not valid TOML for its schema.
	#[error("failed to parse {path}: {error}")]
	Parse {
		path: PathBuf,
		#[source]
		error: toml::de::Error,
	},

	/// The configuration is well-formed TOML but semantically invalid.
	#[error("invalid configuration: {0}")]
	Config(String),

	/// No configured package has this name.
	#[error("unknown content package \"{0}\"")]
	UnknownPackage(String),
}

impl ContentError {
	pub(crate) fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
		Self::Io { path: path.into(), error }
	}

	pub(crate) fn parse(path: impl Into<PathBuf>, error: toml::de::Error) -> Self {
		Self::Parse { path: path.into(), error }
	}
}

/// Result type for content operations.
pub type Result<T> = std::result::Result<T, ContentError>;
