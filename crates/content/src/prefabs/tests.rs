use pretty_assertions::assert_eq;
use tessera_random::ScriptedStreams;

use super::*;

fn source() -> Source {
	Source {
		file: ContentPath::new("vanilla/items.toml"),
		package: ContentPackage::new("Vanilla", 0),
		file_index: 0,
	}
}

fn template(weights: &[f32]) -> SpawnTemplate {
	SpawnTemplate {
		identifier: Identifier::new("loot"),
		name: "Loot".into(),
		commonness: 1.0,
		item_sets: weights
			.iter()
			.enumerate()
			.map(|(i, &commonness)| ItemSet {
				commonness,
				items: vec![Identifier::new(&format!("item{i}"))],
			})
			.collect(),
		source: source(),
	}
}

#[test]
fn pick_item_set_follows_declaration_order() {
	let template = template(&[1.0, 3.0]);
	let mut streams = ScriptedStreams::new([0.9, 0.1]);
	let first = template.pick_item_set(&mut streams, RandSync::Server).unwrap();
	assert_eq!(first.items, [Identifier::new("item1")]);
	let second = template.pick_item_set(&mut streams, RandSync::Server).unwrap();
	assert_eq!(second.items, [Identifier::new("item0")]);
}

#[test]
fn pick_item_set_with_zero_weights_is_none() {
	let template = template(&[0.0, 0.0]);
	let mut streams = ScriptedStreams::new([0.5]);
	assert!(template.pick_item_set(&mut streams, RandSync::Server).is_none());
	assert_eq!(streams.consumed(), 0);
}

#[test]
fn map_entity_instantiates_its_kind() {
	let structure = Arc::new(StructurePrefab {
		identifier: Identifier::new("Hull_Wall"),
		name: "Hull wall".into(),
		commonness: 1.0,
		body: Some("box".into()),
		source: source(),
	});
	let entity = MapEntityPrefab::Structure(structure);
	assert_eq!(entity.kind(), "structure");
	assert_eq!(
		entity.instantiate(),
		Instance::Structure {
			identifier: Identifier::new("hull_wall"),
			name: "Hull wall".into(),
			body: Some("box".into()),
		}
	);
}

#[test]
fn item_tags_and_aliases_ignore_case() {
	let item = ItemPrefab {
		identifier: Identifier::new("wrench"),
		name: "Wrench".into(),
		commonness: 1.0,
		tags: vec!["Tool".into()],
		aliases: vec![Identifier::new("Spanner")],
		source: source(),
	};
	assert!(item.has_tag("tool"));
	assert!(item.has_alias(&Identifier::new("SPANNER")));
	assert_eq!(item.file_path(), Some(&ContentPath::new("vanilla/items.toml")));
}
