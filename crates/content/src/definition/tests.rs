use pretty_assertions::assert_eq;
use tessera_registry::Prefab;

use super::*;

const DEFS: &str = r#"
[[item]]
identifier = "Wrench"
name = "Wrench"
commonness = 2.0
tags = ["tool"]
aliases = ["spanner"]

[[item]]
identifier = "crowbar"
override = true

[[structure]]
identifier = "hull_wall"
body = "box"

[[spawn_template]]
identifier = "toolbox"
item_sets = [
	{ commonness = 3.0, items = ["wrench", "crowbar"] },
	{ items = ["crowbar"] },
]
"#;

fn package() -> ContentPackage {
	ContentPackage::new("Vanilla", 0)
}

#[test]
fn parses_every_kind_in_declaration_order() {
	let parsed = parse_str(Path::new("vanilla/items.toml"), DEFS, &package(), 0).unwrap();
	assert_eq!(parsed.prefab_count(), 4);
	assert!(!parsed.override_file);

	let items: Vec<_> = parsed
		.items
		.iter()
		.map(|d| (d.prefab.identifier.as_str(), d.prefab.name.as_str(), d.prefab.commonness, d.allow_override))
		.collect();
	assert_eq!(items, [("wrench", "Wrench", 2.0, false), ("crowbar", "crowbar", 1.0, true)]);
	assert_eq!(parsed.items[0].prefab.aliases, [Identifier::new("spanner")]);
	assert_eq!(parsed.items[0].prefab.source.file, ContentPath::new("vanilla/items.toml"));

	assert_eq!(parsed.structures[0].prefab.body.as_deref(), Some("box"));

	let sets = &parsed.spawn_templates[0].prefab.item_sets;
	assert_eq!(sets.len(), 2);
	assert_eq!(sets[0].commonness, 3.0);
	assert_eq!(sets[1].commonness, 1.0);
	assert_eq!(sets[1].items, [Identifier::new("crowbar")]);
}

#[test]
fn override_file_forces_every_definition_to_override() {
	let text = "override_file = true\n[[item]]\nidentifier = \"wrench\"\n";
	let parsed = parse_str(Path::new("mod/items.toml"), text, &package(), 0).unwrap();
	assert!(parsed.override_file);
	assert!(parsed.items[0].allow_override);
}

#[test]
fn hash_matches_file_text() {
	let parsed = parse_str(Path::new("a.toml"), DEFS, &package(), 0).unwrap();
	assert_eq!(parsed.hash, FileHash::of(DEFS.as_bytes()));
}

#[test]
fn malformed_file_reports_its_path() {
	let err = parse_str(Path::new("broken.toml"), "[[item]]\nname = 3\n", &package(), 0).unwrap_err();
	match err {
		ContentError::Parse { path, .. } => assert_eq!(path, PathBuf::from("broken.toml")),
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn prefabs_record_their_file_position() {
	let parsed = parse_str(Path::new("vanilla/items.toml"), DEFS, &package(), 3).unwrap();
	assert_eq!(parsed.items[0].prefab.source.file_index, 3);
	assert_eq!(parsed.structures[0].prefab.file_index(), 3);
}
