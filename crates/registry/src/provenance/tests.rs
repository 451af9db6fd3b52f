use super::*;

#[test]
fn content_path_normalizes_separators_and_dots() {
	let path = ContentPath::new(r"Content\Items\.\Tools\..\Weapons/rifle.toml");
	assert_eq!(path.as_str(), "Content/Items/Weapons/rifle.toml");
	assert_eq!(path.key(), "content/items/weapons/rifle.toml");
}

#[test]
fn content_path_compares_case_insensitively() {
	assert_eq!(ContentPath::new("Mods/Foo/items.toml"), ContentPath::new("mods\\foo\\ITEMS.toml"));
	assert_ne!(ContentPath::new("mods/foo/items.toml"), ContentPath::new("mods/bar/items.toml"));
}

#[test]
fn content_path_keeps_leading_parent_segments() {
	assert_eq!(ContentPath::new("../shared/a.toml").as_str(), "../shared/a.toml");
	assert_eq!(ContentPath::new("/../a.toml").as_str(), "/a.toml");
	assert_eq!(ContentPath::new("a/b/../../../c").as_str(), "../c");
	assert_eq!(ContentPath::new("dir/").as_str(), "dir");
}

#[test]
fn provenance_takes_priority_from_package() {
	let package = ContentPackage::new("Mod", 3);
	let prov = Provenance::new(Some("a.toml".into()), Some(package), true);
	assert_eq!(prov.load_priority, 3);
	assert!(prov.is_from_file(&ContentPath::new("A.TOML")));
	assert!(prov.is_from_package("mod"));

	let bare = Provenance::new(None, None, false);
	assert_eq!(bare.load_priority, 0);
	assert!(!bare.is_from_file(&ContentPath::new("a.toml")));
	assert_eq!(bare.to_string(), "<no file>");
}

#[test]
fn package_names_match_beyond_ascii() {
	let package = ContentPackage::new("Überpack", 0);
	assert!(package.name_matches("überpack"));
	assert!(package.name_matches(" ÜBERPACK "));
	assert!(!package.name_matches("uberpack"));
	assert!(names_match("ǅemal", "ǆemal"));
	assert!(names_match("Vanilla", "vanilla"));
}

#[test]
fn provenance_carries_file_index() {
	let prov = Provenance::new(Some("b.toml".into()), Some(ContentPackage::new("Mod", 1)), true).with_file_index(2);
	assert_eq!(prov.file_index, 2);
	assert_eq!(Provenance::new(None, None, false).file_index, 0);
}
