use crate::config::{DiceConfig, Error};

use super::fixture;

#[test]
fn fixture_parses() {
	let config = fixture();
	assert!(!config.is_empty());
	assert_eq!(config.categories().count(), 2);
	assert!(config.category("starwars").is_some());
	assert!(config.category("fudge").is_some());
	assert!(config.category("unknown").is_none());
}

#[test]
fn category_lookup_ignores_case() {
	let config = fixture();
	assert!(config.category("STARWARS").is_some());
	assert!(config.category("StarWars").is_some());
}

#[test]
fn canonical_name_resolution() {
	let config = fixture();
	let starwars = config.category("starwars").unwrap();
	assert_eq!(starwars.canonical_name("a"), Some("ability"));
	assert_eq!(starwars.canonical_name("ABIL"), Some("ability"));
	assert_eq!(starwars.canonical_name("ability"), Some("ability"));
	assert_eq!(starwars.canonical_name("dif"), Some("difficulty"));
	assert_eq!(starwars.canonical_name("nope"), None);
}

#[test]
fn faces_lookup_ignores_case() {
	let config = fixture();
	let starwars = config.category("starwars").unwrap();
	let faces = starwars.faces_of("ABILITY").unwrap();
	assert_eq!(faces, vec!["Success", "Advantage", "Blank"]);
	assert!(starwars.faces_of("nope").is_none());
}

#[test]
fn all_names_include_aliases() {
	let config = fixture();
	let names = config.category("starwars").unwrap().all_names();
	for name in ["ability", "a", "abil", "boost", "b", "difficulty", "d", "dif"] {
		assert!(names.contains(&name), "missing {name}");
	}
}

#[test]
fn blank_shapes() {
	let config = fixture();
	assert_eq!(config.category("starwars").unwrap().blanks(), vec!["Blank"]);
	assert!(config.category("fudge").unwrap().blanks().is_empty());

	let many = DiceConfig::from_json(
		r#"{
			"x": {
				"delimiter": "x",
				"aliases": {},
				"faces": {},
				"blank": ["A", "B"],
				"default": "nothing"
			}
		}"#,
	)
	.unwrap();
	assert_eq!(many.category("x").unwrap().blanks(), vec!["A", "B"]);
}

#[test]
fn optional_fields_default() {
	let config = fixture();
	assert_eq!(config.category("starwars").unwrap().max_consecutive, Some(3));

	let fudge = config.category("fudge").unwrap();
	assert_eq!(fudge.max_consecutive, None);
	assert!(fudge.reduce.is_empty());
	assert!(fudge.cancels.is_empty());
	assert!(fudge.blank.is_none());
}

#[test]
fn empty_config() {
	let config = DiceConfig::empty();
	assert!(config.is_empty());
	assert_eq!(config.categories().count(), 0);
}

#[test]
fn malformed_json_is_a_parse_error() {
	assert!(matches!(DiceConfig::from_json("not json"), Err(Error::Parse(..))));
}

#[test]
fn missing_file_is_an_io_error() {
	assert!(matches!(
		DiceConfig::load("/definitely/not/a/real/path.json"),
		Err(Error::Io(..))
	));
}

#[test]
fn reload_without_a_source_does_nothing() {
	let mut config = fixture();
	assert!(!config.reload().unwrap());
}
