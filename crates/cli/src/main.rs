//! Tessera command-line front end.
//!
//! Loads the content set described by a `tessera.toml` and runs one query
//! against it.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tessera_content::{ContentContext, TesseraConfig};

use crate::cli::Cli;

fn main() -> Result<()> {
	let cli = Cli::parse();
	let config = TesseraConfig::load(&cli.config)
		.with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

	setup_tracing(&config.log.filter, cli.verbose);
	tracing::debug!(config = %cli.config.display(), packages = config.packages.len(), "configuration loaded");

	let mut ctx = ContentContext::new();
	let report = ctx.load(config);

	let stdout = std::io::stdout();
	let mut out = stdout.lock();
	commands::run(&mut ctx, &report, &cli.command, &mut out)
}

fn setup_tracing(filter: &str, verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("debug")
		} else {
			EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"))
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}
