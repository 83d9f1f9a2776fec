//! Numeric dice pools: individual die outcomes tagged with generation depth and validity, and the
//! mutable ordered pool ([`DiceList`]) that modifiers operate on.

pub mod roller;

use core::fmt;
use std::collections::BTreeMap;

pub use roller::Roller;

/// A single numeric die outcome.
///
/// `depth` records which wave of rolling produced the die: `0` for the original pool, `-1` for a
/// synthetic die representing a flat numeric modifier, and `n >= 1` for the n-th explosion
/// generation. `valid` starts `true` and is cleared by comparison and min/max modifiers; invalid
/// dice render struck through and are excluded from totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Plain data, shape fixed by the notation grammar")]
pub struct Die {
	/// Rolled (or synthetic) value
	pub value: i32,

	/// Generation depth: -1 synthetic, 0 original, >= 1 explosion wave
	pub depth: i32,

	/// Whether the die still counts toward the pool's total
	pub valid: bool,
}

impl Die {
	/// Creates an original-pool die with the given value.
	#[must_use]
	pub const fn new(value: i32) -> Self {
		Self::at_depth(value, 0)
	}

	/// Creates a valid die at an explicit generation depth.
	#[must_use]
	pub const fn at_depth(value: i32, depth: i32) -> Self {
		Self {
			value,
			depth,
			valid: true,
		}
	}
}

impl fmt::Display for Die {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.value)
	}
}

/// A computed value that supersedes the valid-dice sum as a pool's total, set by counting
/// modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[expect(clippy::exhaustive_enums, reason = "The counting modifiers are a closed set")]
pub enum Override {
	/// No override; the total is the valid-dice sum
	#[default]
	None,

	/// Total is the number of valid dice (`num`/`count`)
	Count(i32),

	/// Total is a pass/fail outcome (`pas`/`success`)
	Pass(bool),
}

/// Mutable ordered pool of numeric dice belonging to one roll entry.
///
/// The pool remembers its own size and face bounds so that explosion modifiers can append freshly
/// rolled dice of the same kind, and carries the [`Override`] slot counting modifiers write into.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DiceList {
	/// Every die in the pool, in the order it was produced
	pub dice: Vec<Die>,

	/// Number of dice originally rolled
	pub size: usize,

	/// Smallest face value
	pub minv: i32,

	/// Largest face value
	pub maxv: i32,

	/// Sign applied to every rolled value (`1` or `-1`)
	pub sign: i32,

	/// Computed total override, if any counting modifier has run
	pub override_: Override,
}

impl DiceList {
	/// Rolls a fresh pool of `size` dice, each uniform in `minv..=maxv` and sign-adjusted.
	#[must_use]
	pub fn roll(size: usize, minv: i32, maxv: i32, sign: i32, roller: &mut impl Roller) -> Self {
		let mut list = Self {
			dice: Vec::with_capacity(size),
			size,
			minv,
			maxv,
			sign,
			override_: Override::None,
		};
		for _ in 0..size {
			list.add(roller, 0);
		}
		list
	}

	/// Rolls one additional die of this pool's kind at the given depth, returning a copy of it.
	pub fn add(&mut self, roller: &mut impl Roller, depth: i32) -> Die {
		let die = Die::at_depth(roller.die(self.minv, self.maxv).saturating_mul(self.sign), depth);
		self.dice.push(die);
		die
	}

	/// Appends a synthetic die (depth -1) carrying a flat numeric value.
	pub fn push_synthetic(&mut self, value: i32) {
		self.dice.push(Die::at_depth(value, -1));
	}

	/// Sums the values of all valid dice, saturating at the integer bounds. Ignored by totaling
	/// when an override is set.
	#[must_use]
	pub fn total(&self) -> i32 {
		self.dice
			.iter()
			.filter(|die| die.valid)
			.map(|die| die.value)
			.fold(0, i32::saturating_add)
	}

	/// Counts the valid dice across all depths.
	#[must_use]
	pub fn valid_count(&self) -> usize {
		self.dice.iter().filter(|die| die.valid).count()
	}

	/// Indicates whether at least one die is valid.
	#[must_use]
	pub fn any_valid(&self) -> bool {
		self.dice.iter().any(|die| die.valid)
	}

	/// Renders the pool for display: dice grouped by ascending depth, each group space-separated
	/// from the next. Within a group, invalid dice come first struck through (`~~`), then valid
	/// dice, comma-separated. Depth -1 groups are wrapped in `()`, depth 0 bare, deeper groups in
	/// `[]`. A set override is appended as ` -> N`, ` -> Success`, or ` -> Failure`.
	#[must_use]
	pub fn render(&self) -> String {
		let mut groups: BTreeMap<i32, (Vec<String>, Vec<String>)> = BTreeMap::new();
		for die in &self.dice {
			let (invalid, valid) = groups.entry(die.depth).or_default();
			if die.valid {
				valid.push(die.to_string());
			} else {
				invalid.push(die.to_string());
			}
		}

		let mut parts = Vec::with_capacity(groups.len());
		for (depth, (invalid, valid)) in &groups {
			let (open, close) = match depth {
				-1 => ("(", ")"),
				0 => ("", ""),
				_ => ("[", "]"),
			};

			let mut part = String::from(open);
			if !invalid.is_empty() {
				part.push_str("~~");
				part.push_str(&invalid.join(", "));
				part.push_str("~~");
				if !valid.is_empty() {
					part.push_str(", ");
				}
			}
			part.push_str(&valid.join(", "));
			part.push_str(close);
			parts.push(part);
		}

		let mut out = parts.join(" ");
		match self.override_ {
			Override::None => {}
			Override::Count(count) => out.push_str(&format!(" -> {count}")),
			Override::Pass(true) => out.push_str(" -> Success"),
			Override::Pass(false) => out.push_str(" -> Failure"),
		}
		out
	}
}

impl fmt::Display for DiceList {
	/// Formats the value using the given formatter. The output is equivalent to [`Self::render`].
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.render())
	}
}
