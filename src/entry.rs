//! Typed entries of a roll and the arena that owns them.
//!
//! Each token of a roll becomes one [`Entry`] in an [`Arena`]: children are owning indices,
//! parents non-owning indices into the same arena, so parent/child navigation never forms a
//! reference cycle. The grammar of which entry kinds may contain which is the exhaustive
//! [`Entry::accepts`] table; [`Arena::add`] implements the upward-bubbling attach the tree
//! builder relies on.

use crate::dice::DiceList;
use crate::special::SpecialDie;
use crate::token::Token;

/// Handle to an [`Entry`] stored in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(pub(crate) usize);

/// The names a pool modifier may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "The modifier grammar is closed")]
pub enum ModifierName {
	/// `xx`: explode recursively
	ExplodeRec,

	/// `x`: explode once
	Explode,

	/// `<=`: keep dice at or below the argument
	Lte,

	/// `>=`: keep dice at or above the argument
	Gte,

	/// `<`: keep dice below the argument
	Lt,

	/// `>`: keep dice above the argument
	Gt,

	/// `=`: keep dice equal to the argument
	Eq,

	/// `min`: keep only the N smallest dice
	Min,

	/// `max`: keep only the N largest dice
	Max,
}

impl ModifierName {
	/// Resolves a modifier symbol (case-insensitively) to its name.
	#[must_use]
	pub fn from_symbol(symbol: &str) -> Option<Self> {
		Some(match symbol.to_ascii_lowercase().as_str() {
			"xx" => Self::ExplodeRec,
			"x" => Self::Explode,
			"<=" => Self::Lte,
			">=" => Self::Gte,
			"<" => Self::Lt,
			">" => Self::Gt,
			"=" => Self::Eq,
			"min" => Self::Min,
			"max" => Self::Max,
			_ => return None,
		})
	}

	/// Gets the symbol this modifier is written as.
	#[must_use]
	pub const fn symbol(self) -> &'static str {
		match self {
			Self::ExplodeRec => "xx",
			Self::Explode => "x",
			Self::Lte => "<=",
			Self::Gte => ">=",
			Self::Lt => "<",
			Self::Gt => ">",
			Self::Eq => "=",
			Self::Min => "min",
			Self::Max => "max",
		}
	}

	/// Gets the argument value used when no argument entry is attached.
	#[must_use]
	pub const fn default_value(self) -> i32 {
		match self {
			Self::ExplodeRec | Self::Explode | Self::Min | Self::Max => 1,
			Self::Lte | Self::Gte | Self::Lt | Self::Gt | Self::Eq => 0,
		}
	}

	/// Indicates whether the default argument is hidden from the invoke string when used.
	#[must_use]
	pub const fn hides_default(self) -> bool {
		matches!(self, Self::ExplodeRec | Self::Explode | Self::Min | Self::Max)
	}

	/// Checks a die value against a comparison modifier's argument. Always true for
	/// non-comparison modifiers.
	#[must_use]
	pub const fn check(self, value: i32, arg: i32) -> bool {
		match self {
			Self::Lte => value <= arg,
			Self::Gte => value >= arg,
			Self::Lt => value < arg,
			Self::Gt => value > arg,
			Self::Eq => value == arg,
			Self::ExplodeRec | Self::Explode | Self::Min | Self::Max => true,
		}
	}

	/// Indicates whether this is a comparison modifier.
	#[must_use]
	pub const fn is_comparison(self) -> bool {
		matches!(self, Self::Lte | Self::Gte | Self::Lt | Self::Gt | Self::Eq)
	}
}

/// The names a counting modifier may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "The counter grammar is closed")]
pub enum CounterName {
	/// `num`: total becomes the count of valid dice
	Num,

	/// `count`: synonym of `num`
	Count,

	/// `pas`: total becomes pass/fail on any valid die
	Pas,

	/// `success`: synonym of `pas`
	Success,
}

impl CounterName {
	/// Resolves a counter keyword (case-insensitively) to its name.
	#[must_use]
	pub fn from_symbol(symbol: &str) -> Option<Self> {
		Some(match symbol.to_ascii_lowercase().as_str() {
			"num" => Self::Num,
			"count" => Self::Count,
			"pas" => Self::Pas,
			"success" => Self::Success,
			_ => return None,
		})
	}

	/// Gets the keyword this counter is written as.
	#[must_use]
	pub const fn symbol(self) -> &'static str {
		match self {
			Self::Num => "num",
			Self::Count => "count",
			Self::Pas => "pas",
			Self::Success => "success",
		}
	}

	/// Indicates whether this counter produces a pass/fail override rather than a count.
	#[must_use]
	pub const fn is_pass(self) -> bool {
		matches!(self, Self::Pas | Self::Success)
	}
}

/// Payload of a `Ranged` or `Basic` entry: the declared pool and its rolled dice.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct RangedEntry {
	/// Sign applied to every value (`1` or `-1`)
	pub sign: i32,

	/// Number of dice declared
	pub pool: usize,

	/// Smallest face value (always 1 for `Basic`)
	pub minv: i32,

	/// Largest face value
	pub maxv: i32,

	/// The rolled dice pool this entry owns
	pub dice: DiceList,
}

/// Payload of a `Special` entry: the declared pool and its rolled symbol dice.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct SpecialEntry {
	/// Configured category the die belongs to
	pub category: String,

	/// Number of dice declared
	pub pool: usize,

	/// Canonical die name the written alias resolved to
	pub name: String,

	/// Category delimiter, kept for the invoke string
	pub delimiter: String,

	/// One rolled symbol set per die in the pool
	pub rolls: Vec<SpecialDie>,
}

impl SpecialEntry {
	/// Folds all of this entry's rolled dice into one combined symbol set.
	#[must_use]
	pub fn total(&self) -> SpecialDie {
		let mut total = SpecialDie::new(self.category.clone());
		for roll in &self.rolls {
			total.symbols.extend_from_slice(&roll.symbols);
		}
		total
	}
}

/// The closed set of entry kinds a token can become.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum EntryKind {
	/// Bare number; an argument for a preceding modifier, or a flat value when standing alone
	Number {
		/// Parsed value
		value: i32,
	},

	/// Signed standalone flat modifier
	Flat {
		/// Parsed value, sign included
		value: i32,
	},

	/// Pool modifier; its argument, if any, is a single `Number` child
	Modifier {
		/// Which modifier this is
		name: ModifierName,
	},

	/// Counting modifier; takes no children
	Counters {
		/// Which counter this is
		name: CounterName,
	},

	/// Dice pool with an explicit face range (`XrM-Y`)
	Ranged(RangedEntry),

	/// Dice pool with faces 1 through Y (`XdY`)
	Basic(RangedEntry),

	/// Special-dice pool from a configured category
	Special(SpecialEntry),

	/// Free text tagging the roll
	Tag,

	/// Collector of every `Tag` in a roll; at most one per roll
	MasterTag,
}

/// One node of the roll's entry forest.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Entry {
	/// The kind and payload of this entry
	pub kind: EntryKind,

	/// Token this entry was created from, if any (anonymous tags and the master tag have none)
	pub token: Option<Token>,

	/// Non-owning back-reference used to bubble attachments upward
	pub(crate) parent: Option<EntryId>,

	/// Owning references to child entries, in attachment order
	pub(crate) children: Vec<EntryId>,

	/// Canonicalized text representing this entry
	pub invoke: String,

	/// Rendered outcome text; empty until evaluation
	pub result: String,
}

impl Entry {
	/// Creates an entry with its initial invoke/result strings derived from the kind.
	#[must_use]
	pub fn new(kind: EntryKind, token: Option<Token>) -> Self {
		let (invoke, result) = initial_strings(&kind);
		Self {
			kind,
			token,
			parent: None,
			children: Vec::new(),
			invoke,
			result,
		}
	}

	/// Indicates whether this entry can stand as an independently totaled root of the roll.
	#[must_use]
	pub const fn is_root(&self) -> bool {
		matches!(
			self.kind,
			EntryKind::Number { .. }
				| EntryKind::Flat { .. }
				| EntryKind::Ranged(..)
				| EntryKind::Basic(..)
				| EntryKind::Special(..)
		)
	}

	/// The accepted-child table: whether this entry may directly contain a child of the given
	/// kind. Capacity limits are checked separately by [`Arena::add`].
	#[must_use]
	pub const fn accepts(&self, child: &EntryKind) -> bool {
		match self.kind {
			EntryKind::Ranged(..) | EntryKind::Basic(..) => matches!(
				child,
				EntryKind::Number { .. }
					| EntryKind::Flat { .. }
					| EntryKind::Modifier { .. }
					| EntryKind::Counters { .. }
			),
			EntryKind::Modifier { .. } => matches!(child, EntryKind::Number { .. }),
			EntryKind::Tag => matches!(
				child,
				EntryKind::Modifier { .. }
					| EntryKind::Number { .. }
					| EntryKind::Flat { .. }
					| EntryKind::Counters { .. }
			),
			EntryKind::MasterTag => matches!(child, EntryKind::Tag),
			EntryKind::Number { .. }
			| EntryKind::Flat { .. }
			| EntryKind::Counters { .. }
			| EntryKind::Special(..) => false,
		}
	}

	/// Maximum number of children this entry may hold, if limited.
	#[must_use]
	pub const fn max_children(&self) -> Option<usize> {
		match self.kind {
			EntryKind::Modifier { .. } => Some(1),
			EntryKind::Counters { .. } => Some(0),
			_ => None,
		}
	}

	/// The child entries of this entry, in attachment order.
	#[must_use]
	pub fn children(&self) -> &[EntryId] {
		&self.children
	}
}

/// Computes an entry kind's initial invoke and result strings.
fn initial_strings(kind: &EntryKind) -> (String, String) {
	match kind {
		EntryKind::Number { value } | EntryKind::Flat { value } => (format!("[{value:+}]"), format!("{value:+}")),
		EntryKind::Modifier { name } => {
			if name.hides_default() {
				(format!("[{}]", name.symbol()), String::new())
			} else {
				(format!("[{} {}]", name.symbol(), name.default_value()), String::new())
			}
		}
		EntryKind::Counters { name } => (format!("[{}]", name.symbol()), String::new()),
		EntryKind::Ranged(ranged) | EntryKind::Basic(ranged) => (canonical_pool_invoke(kind, ranged), String::new()),
		EntryKind::Special(special) => (
			format!("{}{}{}", special.pool, special.delimiter, special.name),
			String::new(),
		),
		EntryKind::Tag | EntryKind::MasterTag => (String::new(), String::new()),
	}
}

/// Builds the canonical `+XdY` / `+XrM-Y` text for a pool entry.
pub(crate) fn canonical_pool_invoke(kind: &EntryKind, ranged: &RangedEntry) -> String {
	let sign = if ranged.sign < 0 { '-' } else { '+' };
	match kind {
		EntryKind::Basic(..) => format!("{sign}{}d{}", ranged.pool, ranged.maxv),
		_ => format!("{sign}{}r{}-{}", ranged.pool, ranged.minv, ranged.maxv),
	}
}

/// Flat storage for a roll's entries, indexed by [`EntryId`] handles.
#[derive(Debug, Clone, Default)]
pub struct Arena {
	/// All entries ever created for the roll, trees expressed through index links
	entries: Vec<Entry>,
}

impl Arena {
	/// Stores an entry, returning its handle.
	pub fn insert(&mut self, entry: Entry) -> EntryId {
		let id = EntryId(self.entries.len());
		self.entries.push(entry);
		id
	}

	/// Gets an entry by handle.
	#[must_use]
	pub fn get(&self, id: EntryId) -> &Entry {
		&self.entries[id.0]
	}

	/// Gets an entry mutably by handle.
	pub fn get_mut(&mut self, id: EntryId) -> &mut Entry {
		&mut self.entries[id.0]
	}

	/// Attaches `child` directly under `parent` without consulting the grammar.
	pub(crate) fn link(&mut self, parent: EntryId, child: EntryId) {
		self.entries[parent.0].children.push(child);
		self.entries[child.0].parent = Some(parent);
	}

	/// Attempts to attach `child` at `at`, bubbling up through parent links until an ancestor
	/// accepts it. Returns whether any ancestor did.
	pub fn add(&mut self, at: EntryId, child: EntryId) -> bool {
		let mut cursor = Some(at);
		while let Some(id) = cursor {
			let entry = &self.entries[id.0];
			let has_room = entry.max_children().is_none_or(|max| entry.children.len() < max);
			if has_room && entry.accepts(&self.entries[child.0].kind) {
				self.link(id, child);
				return true;
			}
			cursor = entry.parent;
		}
		false
	}
}

impl core::ops::Index<EntryId> for Arena {
	type Output = Entry;

	fn index(&self, id: EntryId) -> &Entry {
		self.get(id)
	}
}
