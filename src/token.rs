//! Tokenization of raw roll text into an ordered, lossless token stream.
//!
//! The grammar is partly static (numeric dice, flat modifiers, counters) and partly data-driven:
//! one pattern per special-dice category is compiled from the [`DiceConfig`] the tokenizer is
//! built with. Patterns are tried in a fixed priority order at each position, with a catch-all
//! `tag` pattern guaranteeing that every character of the input is consumed by exactly one token.
//! Each token's raw text keeps the whitespace that followed it, so concatenating all raw text
//! reconstructs the input byte-for-byte.

use core::fmt;

use regex::Regex;

use crate::config::DiceConfig;

/// An error resulting from building a tokenizer
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// A pattern assembled from the configuration failed to compile. Since all configured text is
	/// escaped before assembly, this indicates a pattern-construction bug rather than bad config.
	#[error("invalid token pattern built from config: {0}")]
	Pattern(#[from] regex::Error),
}

/// Grammar classification of a single token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "The token grammar is closed")]
pub enum TokenKind {
	/// Special-dice roll (`2sA`); the token's category names which configured category matched
	Special,

	/// Numeric dice roll with faces 1 through N (`2d6`, `-d20`)
	Basic,

	/// Numeric dice roll with an explicit face range (`3r4-6`)
	Range,

	/// Signed flat modifier (`+3`, `-2`)
	Flat,

	/// Unsigned number, usually an argument to a preceding modifier
	Number,

	/// Counting modifier keyword (`num`, `count`, `pas`, `success`)
	Counters,

	/// Pool modifier (`xx`, `x`, `<=`, `>=`, `<`, `>`, `=`, `min`, `max`)
	Modifier,

	/// Anything else: one run of non-whitespace text, used to tag the roll
	Tag,
}

/// One matched element of a roll's text
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Token {
	/// Grammar classification
	pub kind: TokenKind,

	/// Exact matched text, including any trailing whitespace, preserving the original casing
	pub raw: String,

	/// Captured arguments of the matched pattern, in pattern order
	pub args: Vec<String>,

	/// Name of the configured category that matched; set iff `kind` is [`TokenKind::Special`]
	pub category: Option<String>,
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}: {:?}", self.kind, self.args)
	}
}

/// One compiled grammar pattern with its token classification.
#[derive(Debug)]
struct Pattern {
	/// Kind of token this pattern produces
	kind: TokenKind,

	/// Category name for special-dice patterns
	category: Option<String>,

	/// Anchored regex; group 1.. are the token's arguments
	regex: Regex,

	/// Whether the match must sit on word boundaries (special-dice patterns only)
	bounded: bool,
}

impl Pattern {
	/// Tries this pattern against the input tail starting at `pos`, producing a token on a match.
	fn match_tail(&self, input: &str, pos: usize, tail: &str) -> Option<Token> {
		let caps = self.regex.captures(tail)?;
		let whole = caps.get(0)?;

		if self.bounded {
			// A special-dice match may not start or end inside a longer word. The regex crate has
			// no lookaround, so both boundaries are checked here instead: the match must begin at
			// the input start or after whitespace, and the die name (the last capture group) must
			// run up to whitespace or the end of input.
			if pos > 0 && !input[..pos].ends_with(char::is_whitespace) {
				return None;
			}
			let name_end = caps.get(caps.len().saturating_sub(1))?.end();
			if !tail[name_end..].is_empty() && !tail[name_end..].starts_with(char::is_whitespace) {
				return None;
			}
		}

		let args = caps
			.iter()
			.skip(1)
			.flatten()
			.map(|cap| cap.as_str().to_owned())
			.collect();

		Some(Token {
			kind: self.kind,
			raw: whole.as_str().to_owned(),
			args,
			category: self.category.clone(),
		})
	}
}

/// Converts raw roll text into [`Token`]s.
///
/// Construction compiles the full pattern set from a [`DiceConfig`]; the tokenizer holds no other
/// state and may be reused for any number of inputs. Rebuild it after a config reload so the
/// special-dice patterns stay in sync with the categories the config defines.
///
/// # Examples
/// ```
/// use dicebag::{DiceConfig, Tokenizer};
///
/// let config = DiceConfig::empty();
/// let tokenizer = Tokenizer::new(&config)?;
///
/// let tokens = tokenizer.tokenize("2d6x min2 ouch");
/// let raw = tokens.iter().map(|t| t.raw.as_str()).collect::<String>();
/// assert_eq!(raw, "2d6x min2 ouch");
/// # Ok::<(), dicebag::token::Error>(())
/// ```
#[derive(Debug)]
pub struct Tokenizer {
	/// Compiled patterns in match-priority order, the catch-all tag pattern last
	patterns: Vec<Pattern>,
}

impl Tokenizer {
	/// Static patterns tried after the special-dice patterns, in priority order.
	const GENERIC: [(TokenKind, &'static str); 7] = [
		(TokenKind::Basic, r"^(?i)([+-]?)(\d*)d(\d+)\s*"),
		(TokenKind::Range, r"^(?i)([+-]?)(\d*)r(\d+)-(\d+)\s*"),
		(TokenKind::Flat, r"^([+-]\d+)\s*"),
		(TokenKind::Number, r"^(\d+)\s*"),
		(TokenKind::Counters, r"^(?i)(num|count|pas|success)\s*"),
		(TokenKind::Modifier, r"^(?i)(xx|x|<=|>=|<|>|=|min|max)\s*"),
		(TokenKind::Tag, r"^(\S*\s*)"),
	];

	/// Builds a tokenizer whose special-dice patterns come from the given configuration.
	///
	/// # Errors
	/// If a pattern fails to compile, an error variant is returned.
	pub fn new(config: &DiceConfig) -> Result<Self, Error> {
		let mut patterns = Vec::new();

		for (name, category) in config.categories() {
			// Longest aliases first, so no alias can shadow a longer one it prefixes
			let mut names = category.all_names();
			names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
			names.dedup();

			let alternates = names.iter().map(|n| regex::escape(n)).collect::<Vec<_>>().join("|");
			let delimiter = regex::escape(&category.delimiter);
			let pattern = format!(r"^(?i)(\d*){delimiter}({alternates})\s*");

			patterns.push(Pattern {
				kind: TokenKind::Special,
				category: Some(name.to_owned()),
				regex: Regex::new(&pattern)?,
				bounded: true,
			});
		}

		for (kind, pattern) in Self::GENERIC {
			patterns.push(Pattern {
				kind,
				category: None,
				regex: Regex::new(pattern)?,
				bounded: false,
			});
		}

		Ok(Self { patterns })
	}

	/// Tokenizes an input string completely.
	///
	/// Every character of the input ends up in exactly one token's raw text; inputs that match no
	/// grammar pattern become [`TokenKind::Tag`] tokens, so tokenization cannot fail.
	#[must_use]
	pub fn tokenize(&self, input: &str) -> Vec<Token> {
		let mut tokens = Vec::new();
		let mut pos = 0;

		while pos < input.len() {
			let tail = &input[pos..];
			let Some(token) = self
				.patterns
				.iter()
				.find_map(|pattern| pattern.match_tail(input, pos, tail))
			else {
				break;
			};

			// The tag fallback always consumes at least one character
			debug_assert!(!token.raw.is_empty(), "tokenizer failed to advance at byte {pos}");
			pos = pos.saturating_add(token.raw.len());
			tokens.push(token);
		}

		tokens
	}
}
