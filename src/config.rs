//! Declarative configuration for special-dice categories.
//!
//! A [`DiceConfig`] is a read-only description of every special (non-numeric) dice category
//! available to the engine: the delimiter used in notation, the named dice with their alias lists
//! and face lists, and the symbol-reduction rules applied when totaling results. It is loaded from
//! JSON, passed by reference into the [`Tokenizer`](crate::Tokenizer) and [`Roll`](crate::Roll)
//! construction, and never mutated by the engine itself; the owning collaborator decides when to
//! call [`DiceConfig::reload`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Deserialize;

/// An error resulting from loading a dice configuration
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The backing file could not be read.
	#[error("failed to read dice config: {0}")]
	Io(#[from] std::io::Error),

	/// The backing file was read but did not contain valid configuration JSON.
	#[error("malformed dice config: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Blank symbols excluded from non-empty totals; configurable as a single symbol or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
#[expect(clippy::exhaustive_enums, reason = "Mirrors the two accepted JSON shapes exactly")]
pub enum Blank {
	/// A single blank symbol
	One(String),

	/// Multiple blank symbols
	Many(Vec<String>),
}

/// Full description of one special-dice category.
///
/// Deserialized from the per-category JSON object:
///
/// ```json
/// {
/// 	"delimiter": "s",
/// 	"aliases": { "advantage": ["a", "adv", "advantage"] },
/// 	"faces": { "advantage": ["", "Advantage", "Advantage Advantage"] },
/// 	"reduce": { "Advantage": ["Boost"] },
/// 	"cancels": [["Advantage", "Challenge"]],
/// 	"blank": "",
/// 	"max consecutive": 3,
/// 	"default": "Blank"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[non_exhaustive]
pub struct CategoryConfig {
	/// Notation delimiter between the pool count and the die name (the `s` in `3sA`)
	pub delimiter: String,

	/// Canonical die name mapped to every alias it may be written as
	pub aliases: BTreeMap<String, Vec<String>>,

	/// Canonical die name mapped to its face list; duplicate faces weight their probability
	pub faces: BTreeMap<String, Vec<String>>,

	/// Canonical symbol mapped to the symbols folded into it during reduction
	#[serde(default)]
	pub reduce: BTreeMap<String, Vec<String>>,

	/// Disjoint groups of symbols that cancel each other one-for-one
	#[serde(default)]
	pub cancels: Vec<Vec<String>>,

	/// Symbol(s) removed entirely from non-empty totals
	#[serde(default)]
	pub blank: Option<Blank>,

	/// Run-length threshold past which a repeated symbol collapses to a single `SYMxN` occurrence
	#[serde(rename = "max consecutive", default)]
	pub max_consecutive: Option<usize>,

	/// Text rendered when a total reduces to nothing at all
	pub default: String,
}

impl CategoryConfig {
	/// Gets every name a die in this category may be written as: each canonical name plus all of
	/// its aliases.
	#[must_use]
	pub fn all_names(&self) -> Vec<&str> {
		let mut names = Vec::new();
		for (name, aliases) in &self.aliases {
			names.push(name.as_str());
			names.extend(aliases.iter().map(String::as_str));
		}
		names
	}

	/// Resolves a die name or alias (case-insensitively) to its canonical die name.
	#[must_use]
	pub fn canonical_name(&self, alias: &str) -> Option<&str> {
		self.aliases
			.iter()
			.find(|(name, aliases)| {
				name.eq_ignore_ascii_case(alias) || aliases.iter().any(|a| a.eq_ignore_ascii_case(alias))
			})
			.map(|(name, _)| name.as_str())
	}

	/// Gets the face list for a canonical die name (case-insensitively).
	#[must_use]
	pub fn faces_of(&self, name: &str) -> Option<&[String]> {
		self.faces
			.iter()
			.find(|(face_name, _)| face_name.eq_ignore_ascii_case(name))
			.map(|(_, faces)| faces.as_slice())
	}

	/// Gets the blank symbols as a slice regardless of which JSON shape configured them.
	#[must_use]
	pub fn blanks(&self) -> &[String] {
		match &self.blank {
			Some(Blank::One(one)) => core::slice::from_ref(one),
			Some(Blank::Many(many)) => many,
			None => &[],
		}
	}
}

/// The complete, read-only configuration model: every special-dice category by name.
///
/// When loaded from a file via [`Self::load`], the source path and its modification time are
/// remembered so that [`Self::reload`] can cheaply re-read the definitions only when the backing
/// file has actually changed. The engine never calls `reload` itself.
#[derive(Debug, Clone)]
pub struct DiceConfig {
	/// Category name mapped to its full description
	categories: BTreeMap<String, CategoryConfig>,

	/// Backing file and its modification time at load, when file-loaded
	source: Option<(PathBuf, SystemTime)>,
}

impl DiceConfig {
	/// Creates an empty configuration with no special-dice categories.
	#[must_use]
	pub const fn empty() -> Self {
		Self {
			categories: BTreeMap::new(),
			source: None,
		}
	}

	/// Parses a configuration from a JSON string.
	///
	/// # Errors
	/// If the string is not valid JSON of the expected shape, an error variant is returned.
	pub fn from_json(json: &str) -> Result<Self, Error> {
		Ok(Self {
			categories: serde_json::from_str(json)?,
			source: None,
		})
	}

	/// Loads a configuration from a JSON file, remembering the path for [`Self::reload`].
	///
	/// # Errors
	/// If the file cannot be read or parsed, an error variant is returned.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
		let path = path.as_ref();
		let mtime = fs::metadata(path)?.modified()?;
		let categories = serde_json::from_str(&fs::read_to_string(path)?)?;
		Ok(Self {
			categories,
			source: Some((path.to_path_buf(), mtime)),
		})
	}

	/// Re-reads the backing file if its modification time has advanced since the last (re)load.
	/// Does nothing for configurations that did not come from a file.
	///
	/// Returns whether the definitions were actually re-read.
	///
	/// # Errors
	/// If the file cannot be read or parsed, an error variant is returned and the previous
	/// definitions are left in place.
	pub fn reload(&mut self) -> Result<bool, Error> {
		let Some((path, mtime)) = &self.source else {
			return Ok(false);
		};

		let new_mtime = fs::metadata(path)?.modified()?;
		if new_mtime <= *mtime {
			return Ok(false);
		}

		self.categories = serde_json::from_str(&fs::read_to_string(path)?)?;
		self.source = Some((path.clone(), new_mtime));
		Ok(true)
	}

	/// Looks up a category by name (case-insensitively).
	#[must_use]
	pub fn category(&self, name: &str) -> Option<&CategoryConfig> {
		self.categories
			.iter()
			.find(|(cat, _)| cat.eq_ignore_ascii_case(name))
			.map(|(_, config)| config)
	}

	/// Iterates over all configured categories in name order.
	pub fn categories(&self) -> impl Iterator<Item = (&str, &CategoryConfig)> {
		self.categories.iter().map(|(name, config)| (name.as_str(), config))
	}

	/// Indicates whether no categories are configured at all.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.categories.is_empty()
	}
}
