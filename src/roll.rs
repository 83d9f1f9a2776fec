//! Building, evaluating, and totaling complete rolls.
//!
//! A [`Roll`] is constructed once from a token sequence: each token becomes an entry in the
//! arena, chained onto the most recent entry with upward bubbling until something accepts it,
//! roots collecting in `bases` and free text in the shared master tag. Evaluation then walks each
//! root's subtree exactly once, applying modifiers to its dice pool in declaration order, after
//! which the roll is read-only: per-root invoke/result strings and the aggregated totals can be
//! read out any number of times.

use crate::config::DiceConfig;
use crate::dice::{DiceList, Override, Roller};
use crate::entry::{
	canonical_pool_invoke, Arena, CounterName, Entry, EntryId, EntryKind, ModifierName, RangedEntry, SpecialEntry,
};
use crate::special::SpecialDie;
use crate::token::{Token, TokenKind};

/// Maximum explosion generations for the recursive `xx` modifier.
const MAX_EXPLOSION_LEVELS: i32 = 64;

/// An error resulting from building a roll
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// A token's entry could not be placed anywhere in the forest: no ancestor accepted it and it
	/// cannot stand as a root. Fatal for the whole roll.
	#[error("\"{0}\" does not fit anywhere in the roll")]
	Structure(String),

	/// A special-dice token referenced a category absent from the configuration. Cannot occur
	/// when the tokens came from a tokenizer built from the same configuration.
	#[error("unknown special dice category \"{0}\"")]
	UnknownCategory(String),

	/// A special-dice token referenced a die name its category does not define. Cannot occur when
	/// the tokens came from a tokenizer built from the same configuration.
	#[error("category \"{0}\" has no die named \"{1}\"")]
	UnknownDie(String, String),

	/// A captured numeric argument failed to parse or was out of range.
	#[error("\"{0}\" is not a usable number")]
	Argument(String),
}

/// What a pool root's child contributes during evaluation.
#[derive(Debug, Clone, Copy)]
enum ChildOp {
	/// A bare number child: append a synthetic depth -1 die
	Synthetic(i32),

	/// A pool modifier to apply
	Modifier(ModifierName),

	/// A counting modifier setting the pool's override
	Counter(CounterName),
}

/// Evaluation phase marker guarding against double application of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	/// Pools are rolled but no modifiers have been applied
	NotEvaluated,

	/// Modifiers have been applied; the roll is now read-only
	Evaluated,
}

/// A complete parsed roll: a forest of root entries, the shared tag collector, and the raw text
/// it was built from.
///
/// # Examples
/// ```
/// use dicebag::{dice::roller::FastRand, DiceConfig, Roll, Tokenizer};
///
/// let config = DiceConfig::empty();
/// let tokenizer = Tokenizer::new(&config)?;
/// let mut roller = FastRand::default();
///
/// let tokens = tokenizer.tokenize("2d6x min4 damage");
/// let mut roll = Roll::new(&tokens, &config, &mut roller)?;
/// roll.evaluate(&mut roller);
///
/// assert_eq!(roll.raw, "2d6x min4 damage");
/// assert_eq!(roll.tag_text().as_deref(), Some("damage"));
/// assert_eq!(roll.totals(&config).len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Roll {
	/// Storage for every entry of the forest
	pub(crate) arena: Arena,

	/// Root entries in declaration order
	pub(crate) bases: Vec<EntryId>,

	/// The master tag, present only if at least one tag was collected
	pub(crate) tag: Option<EntryId>,

	/// Reconstruction of the original input text
	pub raw: String,

	/// Whether modifiers have been applied yet
	phase: Phase,
}

impl Roll {
	/// Builds a roll from a token sequence, rolling all dice pools as their entries are created.
	///
	/// # Errors
	/// If a token cannot be placed anywhere in the forest, references unknown special-dice
	/// configuration, or carries an unusable numeric capture, an error variant is returned and no
	/// partial roll exists.
	pub fn new(tokens: &[Token], config: &DiceConfig, roller: &mut impl Roller) -> Result<Self, Error> {
		let mut arena = Arena::default();
		let master = arena.insert(Entry::new(EntryKind::MasterTag, None));
		let mut bases = Vec::new();
		let mut prev: Option<EntryId> = None;

		for token in tokens {
			let entry = entry_from_token(token, config, roller)?;
			let is_tag = matches!(entry.kind, EntryKind::Tag);
			let is_root = entry.is_root();
			let id = arena.insert(entry);

			if is_tag {
				// Tags (and stray whitespace) always land in the master tag
				arena.link(master, id);
			} else if let Some(prev_id) = prev {
				if !arena.add(prev_id, id) {
					if is_root {
						bases.push(id);
					} else {
						return Err(Error::Structure(token.raw.trim().to_owned()));
					}
				}
			} else if is_root {
				bases.push(id);
			} else {
				// First entry but not root-eligible: wrap it in an anonymous tag
				let wrapper = arena.insert(Entry::new(EntryKind::Tag, None));
				if !arena.add(wrapper, id) {
					return Err(Error::Structure(token.raw.trim().to_owned()));
				}
				arena.link(master, wrapper);
			}

			// Chaining continues from the newest entry, not from wherever it attached
			prev = Some(id);
		}

		let tag = if arena[master].children().is_empty() {
			None
		} else {
			Some(master)
		};

		Ok(Self {
			arena,
			bases,
			tag,
			raw: tokens.iter().map(|token| token.raw.as_str()).collect(),
			phase: Phase::NotEvaluated,
		})
	}

	/// Applies every root's modifiers to its dice pool and renders the per-root invoke/result
	/// strings. Idempotent: calling this again after the first evaluation does nothing.
	pub fn evaluate(&mut self, roller: &mut impl Roller) {
		if self.phase == Phase::Evaluated {
			return;
		}

		for index in 0..self.bases.len() {
			let base = self.bases[index];
			if matches!(self.arena[base].kind, EntryKind::Ranged(..) | EntryKind::Basic(..)) {
				self.evaluate_pool(base, roller);
			}
		}

		self.phase = Phase::Evaluated;
	}

	/// The root entries of the roll, in declaration order.
	pub fn bases(&self) -> impl Iterator<Item = &Entry> {
		self.bases.iter().map(|&id| &self.arena[id])
	}

	/// Concatenated raw text of all tag tokens, for use as a display title. `None` when the roll
	/// has no tags or only whitespace ones.
	#[must_use]
	pub fn tag_text(&self) -> Option<String> {
		let master = self.tag?;
		let mut text = String::new();
		self.collect_raw(master, &mut text);
		let trimmed = text.trim();
		if trimmed.is_empty() {
			None
		} else {
			Some(trimmed.to_owned())
		}
	}

	/// The combined numeric total across all numeric roots, or `None` if no root produced a
	/// numeric total.
	#[must_use]
	pub fn num_total(&self) -> Option<i32> {
		let mut total: Option<i32> = None;
		for &base in &self.bases {
			// Totals saturate rather than wrap on absurd inputs
			let part = match &self.arena[base].kind {
				EntryKind::Number { value } | EntryKind::Flat { value } => *value,
				EntryKind::Ranged(ranged) | EntryKind::Basic(ranged) => match ranged.dice.override_ {
					Override::Pass(..) => continue,
					Override::Count(count) => count.saturating_add(self.flat_sum(base)),
					Override::None => ranged.dice.total().saturating_add(self.flat_sum(base)),
				},
				_ => continue,
			};
			let sum = total.get_or_insert(0);
			*sum = sum.saturating_add(part);
		}
		total
	}

	/// The combined pass/fail outcome: the AND of every root with a pass/fail override, or `None`
	/// if no root produced one.
	#[must_use]
	pub fn pass_total(&self) -> Option<bool> {
		let mut outcome = None;
		for &base in &self.bases {
			if let EntryKind::Ranged(ranged) | EntryKind::Basic(ranged) = &self.arena[base].kind {
				if let Override::Pass(pass) = ranged.dice.override_ {
					*outcome.get_or_insert(true) &= pass;
				}
			}
		}
		outcome
	}

	/// Per-category combined special-dice totals, reduced and rendered, in first-appearance
	/// order.
	#[must_use]
	pub fn special_totals(&self, config: &DiceConfig) -> Vec<String> {
		let mut combined: Vec<(String, SpecialDie)> = Vec::new();
		for &base in &self.bases {
			if let EntryKind::Special(special) = &self.arena[base].kind {
				let total = special.total();
				if let Some((_, folded)) = combined.iter_mut().find(|(cat, _)| *cat == special.category) {
					folded.symbols.extend_from_slice(&total.symbols);
				} else {
					combined.push((special.category.clone(), total));
				}
			}
		}

		combined
			.into_iter()
			.map(|(category, total)| match config.category(&category) {
				Some(cat_config) => total.reduced(cat_config).render(cat_config),
				// Config changed under us: fall back to the raw symbols
				None => total.symbols.join(" "),
			})
			.collect()
	}

	/// The full ordered totals list: the numeric total (if any), the pass/fail outcome (if any),
	/// then one combined entry per special-dice category. May be empty when nothing was rolled.
	#[must_use]
	pub fn totals(&self, config: &DiceConfig) -> Vec<String> {
		let mut totals = Vec::new();
		if let Some(total) = self.num_total() {
			totals.push(total.to_string());
		}
		if let Some(pass) = self.pass_total() {
			totals.push(if pass { "Success" } else { "Failure" }.to_owned());
		}
		totals.extend(self.special_totals(config));
		totals
	}

	/// Renders the totals as one display line, with a placeholder when nothing was rolled.
	#[must_use]
	pub fn totals_line(&self, config: &DiceConfig) -> String {
		let totals = self.totals(config);
		if totals.is_empty() {
			"No dice rolled".to_owned()
		} else {
			totals.join(", ")
		}
	}

	/// Indicates whether [`Self::evaluate`] has run.
	#[must_use]
	pub fn is_evaluated(&self) -> bool {
		self.phase == Phase::Evaluated
	}

	/// Sums the values of a pool root's `Flat` children, saturating at the integer bounds.
	fn flat_sum(&self, base: EntryId) -> i32 {
		self.arena[base]
			.children()
			.iter()
			.filter_map(|&child| match self.arena[child].kind {
				EntryKind::Flat { value } => Some(value),
				_ => None,
			})
			.fold(0, i32::saturating_add)
	}

	/// Applies one pool root's children to its dice in declaration order, then renders its
	/// invoke/result strings.
	fn evaluate_pool(&mut self, base: EntryId, roller: &mut impl Roller) {
		let children = self.arena[base].children().to_vec();
		let flat = self.flat_sum(base);

		for &child in &children {
			let op = match &self.arena[child].kind {
				EntryKind::Number { value } => ChildOp::Synthetic(*value),
				EntryKind::Modifier { name } => ChildOp::Modifier(*name),
				EntryKind::Counters { name } => ChildOp::Counter(*name),
				// Flat children only contribute through the flat sum
				_ => continue,
			};

			match op {
				ChildOp::Synthetic(value) => {
					if let Some(dice) = self.pool_mut(base) {
						dice.push_synthetic(value);
					}
				}
				ChildOp::Modifier(name) => {
					let value = self.modifier_argument(child).unwrap_or_else(|| name.default_value());
					self.arena.get_mut(child).invoke = modifier_invoke(name, value);
					if let Some(dice) = self.pool_mut(base) {
						apply_modifier(name, value, flat, dice, roller);
					}
				}
				ChildOp::Counter(name) => {
					if let Some(dice) = self.pool_mut(base) {
						dice.override_ = if name.is_pass() {
							Override::Pass(dice.any_valid())
						} else {
							Override::Count(checked_count(dice))
						};
					}
				}
			}
		}

		let entry = self.arena.get_mut(base);
		if let EntryKind::Ranged(ranged) | EntryKind::Basic(ranged) = &entry.kind {
			entry.result = ranged.dice.render();
			entry.invoke = canonical_pool_invoke(&entry.kind, ranged);
		}
		let mut invoke = self.arena[base].invoke.clone();
		for &child in &children {
			invoke.push(' ');
			invoke.push_str(&self.arena[child].invoke);
		}
		self.arena.get_mut(base).invoke = invoke;
	}

	/// Reads a modifier's argument from its single `Number` child, if attached.
	fn modifier_argument(&self, modifier: EntryId) -> Option<i32> {
		let &child = self.arena[modifier].children().first()?;
		match self.arena[child].kind {
			EntryKind::Number { value } => Some(value),
			_ => None,
		}
	}

	/// Gets the dice pool owned by a `Ranged`/`Basic` entry.
	fn pool_mut(&mut self, base: EntryId) -> Option<&mut DiceList> {
		match &mut self.arena.get_mut(base).kind {
			EntryKind::Ranged(ranged) | EntryKind::Basic(ranged) => Some(&mut ranged.dice),
			_ => None,
		}
	}

	/// Appends an entry's raw token text and its children's, depth first.
	fn collect_raw(&self, id: EntryId, out: &mut String) {
		if let Some(token) = &self.arena[id].token {
			out.push_str(&token.raw);
		}
		for &child in self.arena[id].children() {
			self.collect_raw(child, out);
		}
	}
}

/// Builds a modifier's invoke string, hiding a hidden default argument.
fn modifier_invoke(name: ModifierName, value: i32) -> String {
	if name.hides_default() && value == name.default_value() {
		format!("[{}]", name.symbol())
	} else {
		format!("[{} {}]", name.symbol(), value)
	}
}

/// Counts a pool's valid dice as an i32, saturating on absurd pool sizes.
fn checked_count(dice: &DiceList) -> i32 {
	i32::try_from(dice.valid_count()).unwrap_or(i32::MAX)
}

/// Applies a single modifier to a dice pool.
fn apply_modifier(name: ModifierName, value: i32, flat: i32, dice: &mut DiceList, roller: &mut impl Roller) {
	if name.is_comparison() {
		for die in &mut dice.dice {
			if die.depth >= 0 && !name.check(die.value.saturating_add(flat), value) {
				die.valid = false;
			}
		}
		return;
	}

	match name {
		ModifierName::Min | ModifierName::Max => {
			let keep = usize::try_from(value).unwrap_or(0);
			let mut order: Vec<usize> = (0..dice.dice.len()).collect();
			order.sort_by_key(|&idx| dice.dice[idx].value);
			if matches!(name, ModifierName::Max) {
				order.reverse();
			}
			// Synthetic (depth -1) dice can claim a keep slot but are never themselves dropped
			for (rank, &idx) in order.iter().enumerate() {
				if rank >= keep && dice.dice[idx].depth >= 0 {
					dice.dice[idx].valid = false;
				}
			}
		}
		ModifierName::Explode => {
			let threshold = dice.maxv.saturating_sub(value);
			let to_add = dice
				.dice
				.iter()
				.filter(|die| die.depth >= 0 && die.value > threshold)
				.count();
			for _ in 0..to_add {
				dice.add(roller, 1);
			}
		}
		ModifierName::ExplodeRec => {
			let threshold = dice.maxv.saturating_sub(value);
			let mut pending = dice
				.dice
				.iter()
				.filter(|die| die.depth >= 0 && die.value > threshold)
				.count();
			for level in 1..MAX_EXPLOSION_LEVELS {
				if pending == 0 {
					break;
				}
				pending = (0..pending)
					.filter(|_| dice.add(roller, level).value > threshold)
					.count();
			}
		}
		// Comparisons were handled above
		_ => {}
	}
}

/// Creates the entry a token stands for, rolling any dice pools it declares.
fn entry_from_token(token: &Token, config: &DiceConfig, roller: &mut impl Roller) -> Result<Entry, Error> {
	let kind = match token.kind {
		TokenKind::Number => EntryKind::Number {
			value: int_arg(token, 0)?,
		},
		TokenKind::Flat => EntryKind::Flat {
			value: int_arg(token, 0)?,
		},
		TokenKind::Basic => {
			let sign = sign_arg(token, 0);
			let pool = pool_arg(token, 1)?;
			let maxv = int_arg(token, 2)?;
			EntryKind::Basic(rolled_pool(sign, pool, 1, maxv, roller))
		}
		TokenKind::Range => {
			let sign = sign_arg(token, 0);
			let pool = pool_arg(token, 1)?;
			let minv = int_arg(token, 2)?;
			let maxv = int_arg(token, 3)?;
			EntryKind::Ranged(rolled_pool(sign, pool, minv, maxv, roller))
		}
		TokenKind::Counters => {
			let symbol = str_arg(token, 0);
			EntryKind::Counters {
				name: CounterName::from_symbol(symbol).ok_or_else(|| Error::Argument(symbol.to_owned()))?,
			}
		}
		TokenKind::Modifier => {
			let symbol = str_arg(token, 0);
			EntryKind::Modifier {
				name: ModifierName::from_symbol(symbol).ok_or_else(|| Error::Argument(symbol.to_owned()))?,
			}
		}
		TokenKind::Special => EntryKind::Special(special_from_token(token, config, roller)?),
		TokenKind::Tag => EntryKind::Tag,
	};

	let mut entry = Entry::new(kind, Some(token.clone()));
	if let EntryKind::Special(special) = &entry.kind {
		// The per-die result needs the category config for rendering
		if let Some(cat_config) = config.category(&special.category) {
			entry.result = special
				.rolls
				.iter()
				.map(|roll| roll.render(cat_config))
				.collect::<Vec<_>>()
				.join(", ");
		}
	}
	Ok(entry)
}

/// Rolls the dice pool a `Basic`/`Range` token declares.
fn rolled_pool(sign: i32, pool: usize, minv: i32, maxv: i32, roller: &mut impl Roller) -> RangedEntry {
	RangedEntry {
		sign,
		pool,
		minv,
		maxv,
		dice: DiceList::roll(pool, minv, maxv, sign, roller),
	}
}

/// Rolls the symbol dice a special token declares, resolving its alias through the config.
fn special_from_token(token: &Token, config: &DiceConfig, roller: &mut impl Roller) -> Result<SpecialEntry, Error> {
	let category = token
		.category
		.clone()
		.ok_or_else(|| Error::UnknownCategory(String::new()))?;
	let cat_config = config
		.category(&category)
		.ok_or_else(|| Error::UnknownCategory(category.clone()))?;

	let pool = pool_arg(token, 0)?;
	let alias = str_arg(token, 1);
	let name = cat_config
		.canonical_name(alias)
		.ok_or_else(|| Error::UnknownDie(category.clone(), alias.to_owned()))?
		.to_owned();
	let faces = cat_config
		.faces_of(&name)
		.ok_or_else(|| Error::UnknownDie(category.clone(), name.clone()))?;

	let rolls = (0..pool)
		.map(|_| {
			let symbols = if faces.is_empty() {
				Vec::new()
			} else {
				vec![faces[roller.face(faces.len())].clone()]
			};
			SpecialDie::with_symbols(category.clone(), symbols)
		})
		.collect();

	Ok(SpecialEntry {
		category,
		pool,
		name,
		delimiter: cat_config.delimiter.clone(),
		rolls,
	})
}

/// Gets a token's captured argument as text (empty when the capture is absent).
fn str_arg(token: &Token, index: usize) -> &str {
	token.args.get(index).map_or("", String::as_str)
}

/// Parses a required integer capture.
fn int_arg(token: &Token, index: usize) -> Result<i32, Error> {
	let text = str_arg(token, index);
	text.parse().map_err(|_| Error::Argument(text.to_owned()))
}

/// Parses an optional pool-count capture, defaulting to 1 and bounding the size.
fn pool_arg(token: &Token, index: usize) -> Result<usize, Error> {
	let text = str_arg(token, index);
	if text.is_empty() {
		return Ok(1);
	}
	text.parse::<u16>()
		.map(usize::from)
		.map_err(|_| Error::Argument(text.to_owned()))
}

/// Reads a sign capture as `1` or `-1`.
fn sign_arg(token: &Token, index: usize) -> i32 {
	if str_arg(token, index) == "-" {
		-1
	} else {
		1
	}
}
