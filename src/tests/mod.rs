mod config;
mod dice;
mod entry;

/// Two-category configuration used across the test modules: a narrative symbol system with
/// aliases, reduction, cancellation, blanks, and collapsing, plus a minimal fudge-style category.
const FIXTURE_JSON: &str = r#"{
	"starwars": {
		"delimiter": "s",
		"aliases": {
			"ability": ["a", "abil"],
			"boost": ["b"],
			"difficulty": ["d", "dif"]
		},
		"faces": {
			"ability": ["Success", "Advantage", "Blank"],
			"boost": ["Boost"],
			"difficulty": ["Failure", "Threat", "Blank"]
		},
		"reduce": { "Advantage": ["Boost"] },
		"cancels": [["Success", "Failure"], ["Advantage", "Threat"]],
		"blank": "Blank",
		"max consecutive": 3,
		"default": "Washout"
	},
	"fudge": {
		"delimiter": "f",
		"aliases": { "fate": ["f", "fudge"] },
		"faces": { "fate": ["+", "-", "0"] },
		"default": "0"
	}
}"#;

fn fixture() -> crate::DiceConfig {
	crate::DiceConfig::from_json(FIXTURE_JSON).unwrap()
}
