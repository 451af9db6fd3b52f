use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tessera_random::RandSync;

#[cfg(test)]
mod tests;

#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(about = "Inspect layered content packages")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file listing the content packages
	#[arg(long, short = 'c', value_name = "PATH", default_value = "tessera.toml")]
	pub config: PathBuf,

	/// Verbose logging (ignored when RUST_LOG is set)
	#[arg(long, short = 'v')]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List visible prefabs in enumeration order
	List {
		#[arg(long, short = 'k', value_enum, default_value_t = Kind::Items)]
		kind: Kind,
	},
	/// Show every layer stored for an identifier
	Show {
		identifier: String,
		#[arg(long, short = 'k', value_enum, default_value_t = Kind::Items)]
		kind: Kind,
	},
	/// Draw weighted-random prefabs
	Pick {
		#[arg(long, short = 'k', value_enum, default_value_t = Kind::Items)]
		kind: Kind,
		/// Number of draws
		#[arg(long, short = 'n', default_value_t = 1)]
		count: usize,
		#[arg(long, value_enum, default_value_t = Stream::ServerAndClient)]
		stream: Stream,
		/// Overrides the configured seed
		#[arg(long)]
		seed: Option<u64>,
	},
	/// Roll item sets from a spawn template
	Roll {
		template: String,
		#[arg(long, short = 'n', default_value_t = 1)]
		count: usize,
		#[arg(long, value_enum, default_value_t = Stream::Server)]
		stream: Stream,
		#[arg(long)]
		seed: Option<u64>,
	},
	/// Load everything and report problems; fails if any file could not be loaded
	Check,
}

/// Prefab kind selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
	Items,
	Structures,
	SpawnTemplates,
}

/// Random stream selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
	Unsynced,
	ServerAndClient,
	Server,
}

impl From<Stream> for RandSync {
	fn from(stream: Stream) -> Self {
		match stream {
			Stream::Unsynced => RandSync::Unsynced,
			Stream::ServerAndClient => RandSync::ServerAndClient,
			Stream::Server => RandSync::Server,
		}
	}
}
