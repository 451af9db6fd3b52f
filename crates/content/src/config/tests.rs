use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use super::*;

const CONFIG: &str = r#"
[random]
seed = 1234

[log]
filter = "tessera=debug"

[[package]]
name = "Vanilla"
path = "content/vanilla"

[[package]]
name = "Extra"
path = "/abs/extra"
enabled = false
"#;

#[test]
fn parses_full_config() {
	let config = TesseraConfig::parse(CONFIG).unwrap();
	assert_eq!(config.random.seed, 1234);
	assert_eq!(config.log.filter, "tessera=debug");
	let names: Vec<_> = config.packages.iter().map(|p| (p.name.as_str(), p.enabled)).collect();
	assert_eq!(names, [("Vanilla", true), ("Extra", false)]);
	let enabled: Vec<_> = config.enabled_packages().map(|p| p.name.as_str()).collect();
	assert_eq!(enabled, ["Vanilla"]);
}

#[test]
fn empty_config_uses_defaults() {
	let config = TesseraConfig::parse("").unwrap();
	assert_eq!(config.random.seed, 0);
	assert_eq!(config.log.filter, "info");
	assert!(config.packages.is_empty());
}

#[test]
fn unknown_keys_are_rejected() {
	assert!(TesseraConfig::parse("[random]\nsed = 1\n").is_err());
}

#[test]
fn resolve_paths_only_touches_relative_paths() {
	let mut config = TesseraConfig::parse(CONFIG).unwrap();
	config.resolve_paths(Path::new("/root/game"));
	assert_eq!(config.packages[0].path, PathBuf::from("/root/game/content/vanilla"));
	assert_eq!(config.packages[1].path, PathBuf::from("/abs/extra"));
}

#[test]
fn duplicate_package_names_fail_validation() {
	let mut config = TesseraConfig::default();
	config.packages.push(PackageSource::new("Mod", "a"));
	config.packages.push(PackageSource::new("mod", "b"));
	assert!(matches!(config.validate(), Err(ContentError::Config(_))));
}

#[test]
fn package_lookup_is_case_insensitive() {
	let mut config = TesseraConfig::parse(CONFIG).unwrap();
	assert!(config.package("vanilla").is_some());
	config.package_mut("EXTRA").unwrap().enabled = true;
	assert_eq!(config.enabled_packages().count(), 2);
}

#[test]
fn manifest_lists_files_in_order() {
	let manifest: PackageManifest = toml::from_str("name = \"Vanilla\"\nfiles = [\"items.toml\", \"sub/structures.toml\"]\n").unwrap();
	assert_eq!(manifest.files, [PathBuf::from("items.toml"), PathBuf::from("sub/structures.toml")]);
}

#[test]
fn package_lookup_folds_non_ascii_case() {
	let mut config = TesseraConfig::default();
	config.packages.push(PackageSource::new("Ölraffinerie", "a"));
	assert!(config.package("ölraffinerie").is_some());
	config.packages.push(PackageSource::new("ÖLRAFFINERIE", "b"));
	assert!(matches!(config.validate(), Err(ContentError::Config(_))));
}
