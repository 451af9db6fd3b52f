//! Subcommand implementations.
//!
//! Each command writes plain text to the supplied writer so tests can capture it.

use std::io::Write;

use anyhow::{Result, bail};
use tessera_content::{ContentContext, LoadReport};
use tessera_random::{RandSync, SeededStreams};
use tessera_registry::{Identifier, Prefab, PrefabRegistry};

use crate::cli::{Command, Kind};


pub fn run(ctx: &mut ContentContext, report: &LoadReport, command: &Command, out: &mut impl Write) -> Result<()> {
	match command {
		Command::List { kind } => match kind {
			Kind::Items => list(&ctx.items, out)?,
			Kind::Structures => list(&ctx.structures, out)?,
			Kind::SpawnTemplates => list(&ctx.spawn_templates, out)?,
		},
		Command::Show { identifier, kind } => {
			let identifier = Identifier::new(identifier);
			let found = match kind {
				Kind::Items => show(&ctx.items, &identifier, out)?,
				Kind::Structures => show(&ctx.structures, &identifier, out)?,
				Kind::SpawnTemplates => show(&ctx.spawn_templates, &identifier, out)?,
			};
			if !found {
				bail!("no {} named \"{identifier}\"", kind_label(*kind));
			}
		}
		Command::Pick {
			kind,
			count,
			stream,
			seed,
		} => {
			reseed(ctx, *seed);
			let stream = RandSync::from(*stream);
			for _ in 0..*count {
				let picked = match kind {
					Kind::Items => ctx.random_item(stream).map(|p| p.identifier.clone()),
					Kind::Structures => ctx.random_structure(stream).map(|p| p.identifier.clone()),
					Kind::SpawnTemplates => ctx.random_spawn_template(stream).map(|p| p.identifier.clone()),
				};
				match picked {
					Some(identifier) => writeln!(out, "{identifier}")?,
					None => bail!("nothing to pick from {}", kind_label(*kind)),
				}
			}
		}
		Command::Roll {
			template,
			count,
			stream,
			seed,
		} => {
			reseed(ctx, *seed);
			let template = Identifier::new(template);
			for _ in 0..*count {
				let Some(items) = ctx.roll_spawn_template(&template, RandSync::from(*stream)) else {
					bail!("spawn template \"{template}\" has nothing to roll");
				};
				let items: Vec<_> = items.iter().map(Identifier::original).collect();
				writeln!(out, "{}", items.join(", "))?;
			}
		}
		Command::Check => check(ctx, report, out)?,
	}
	Ok(())
}

fn kind_label(kind: Kind) -> &'static str {
	match kind {
		Kind::Items => "item",
		Kind::Structures => "structure",
		Kind::SpawnTemplates => "spawn template",
	}
}

fn reseed(ctx: &mut ContentContext, seed: Option<u64>) {
	if let Some(seed) = seed {
		*ctx.streams_mut() = SeededStreams::new(seed);
	}
}

fn list<T: Prefab>(registry: &PrefabRegistry<T>, out: &mut impl Write) -> Result<()> {
	for prefab in registry {
		let identifier = prefab.identifier();
		let uint_id = registry.uint_id(identifier).unwrap_or_default();
		let file = prefab.file_path().map(|f| f.as_str()).unwrap_or("-");
		let name = identifier.to_string();
		writeln!(out, "{name:<24} {uint_id:>10} {:>6.2}  {file}", prefab.commonness())?;
	}
	Ok(())
}

/// Prints the stack of `identifier`, top layer first. Returns false if unknown.
fn show<T: Prefab>(registry: &PrefabRegistry<T>, identifier: &Identifier, out: &mut impl Write) -> Result<bool> {
	let Some(stack) = registry.stack(identifier) else {
		return Ok(false);
	};
	let uint_id = registry.uint_id(identifier).unwrap_or_default();
	let visible = registry.get(identifier).is_some();
	writeln!(out, "{identifier} (uint id {uint_id}, {})", if visible { "visible" } else { "hidden" })?;
	for (depth, layer) in stack.layers().iter().rev().enumerate() {
		let marker = if depth == 0 { "*" } else { " " };
		let role = if layer.provenance.allow_override { "override" } else { "base" };
		writeln!(out, "{marker} {role:<8} {}  {}", layer.prefab.original_name(), layer.provenance)?;
	}
	Ok(true)
}

fn check(ctx: &ContentContext, report: &LoadReport, out: &mut impl Write) -> Result<()> {
	for package in ctx.packages() {
		writeln!(out, "package {} ({} files)", package.package, package.files.len())?;
	}
	writeln!(
		out,
		"{} items, {} structures, {} spawn templates",
		ctx.items.len(),
		ctx.structures.len(),
		ctx.spawn_templates.len()
	)?;
	writeln!(out, "{} definitions rejected", report.rejected)?;
	for failure in &report.failures {
		writeln!(out, "error: {failure}")?;
	}
	if !report.failures.is_empty() {
		bail!("{} content files or packages failed to load", report.failures.len());
	}
	Ok(())
}
