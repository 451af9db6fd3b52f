use std::collections::HashSet;

use super::*;

#[test]
fn equality_ignores_case_and_whitespace() {
	assert_eq!(Identifier::new("Hull"), Identifier::new("  hull "));
	assert_eq!(Identifier::new("HULL").as_str(), "hull");
}

#[test]
fn titlecase_and_non_ascii_letters_normalize() {
	assert_eq!(Identifier::new("ǅ"), Identifier::new("Ǆ"));
	assert_eq!(Identifier::new("ǅ").as_str(), "ǆ");
	assert_eq!(Identifier::new("ǅ").original(), "ǅ");
	assert_eq!(Identifier::new("Ölfass"), Identifier::new("ölfass"));
	assert!(Identifier::new("ǆ").matches("Ǆ"));
}

#[test]
fn hashing_follows_equality() {
	let mut set = HashSet::new();
	set.insert(Identifier::new("Wrench"));
	assert!(set.contains(&Identifier::new("wrench")));
	assert!(set.contains("wrench"));
}

#[test]
fn display_keeps_author_spelling() {
	let id = Identifier::new(" DivingSuit ");
	assert_eq!(id.to_string(), "DivingSuit");
	assert_eq!(id.original(), "DivingSuit");
	assert_eq!(id.as_str(), "divingsuit");
}

#[test]
fn sentinels_are_empty() {
	assert!(Identifier::empty().is_empty());
	assert!(Identifier::new("   ").is_empty());
	assert!(Identifier::new("NotFound").is_empty());
	assert!(!Identifier::new("found").is_empty());
}

#[test]
fn matches_unnormalized_input() {
	let id = Identifier::new("oxygentank");
	assert!(id.matches("OxygenTank"));
	assert!(id.matches(" oxygentank "));
	assert!(!id.matches("oxygen"));

	let unicode = Identifier::new("Ärmel");
	assert!(unicode.matches("ÄRMEL"));
}

#[test]
fn ordering_is_case_insensitive() {
	let mut ids = vec![Identifier::new("b"), Identifier::new("A"), Identifier::new("c")];
	ids.sort();
	let names: Vec<_> = ids.iter().map(Identifier::as_str).collect();
	assert_eq!(names, ["a", "b", "c"]);
}
