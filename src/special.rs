//! Symbol algebra for special (narrative) dice.
//!
//! A [`SpecialDie`] is an ordered multiset of symbol strings scoped to one configured category.
//! Combination concatenates multisets without touching them; reduction is applied on demand and
//! performs alias folding, pairwise cancellation of opposing symbols, and blank removal, in that
//! order, per the category's [`CategoryConfig`].

use crate::config::CategoryConfig;

/// An error resulting from a special-dice operation
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// Two special dice of different categories cannot be combined.
	#[error("cannot combine \"{0}\" dice with \"{1}\" dice")]
	CategoryMismatch(String, String),
}

/// An ordered multiset of rolled symbols belonging to one special-dice category.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SpecialDie {
	/// Category the symbols belong to; dice combine only within one category
	pub category: String,

	/// Symbols in the order they were rolled or combined
	pub symbols: Vec<String>,
}

impl SpecialDie {
	/// Creates an empty symbol set for a category.
	#[must_use]
	pub const fn new(category: String) -> Self {
		Self {
			category,
			symbols: Vec::new(),
		}
	}

	/// Creates a symbol set from already-rolled symbols.
	#[must_use]
	pub const fn with_symbols(category: String, symbols: Vec<String>) -> Self {
		Self { category, symbols }
	}

	/// Appends another die's symbols to this one. No reduction happens here; each operand stays
	/// independently reducible until rendering.
	///
	/// # Errors
	/// If the other die belongs to a different category, an error variant is returned and this
	/// die is left unchanged.
	pub fn combine(&mut self, other: &Self) -> Result<(), Error> {
		if self.category != other.category {
			return Err(Error::CategoryMismatch(self.category.clone(), other.category.clone()));
		}
		self.symbols.extend_from_slice(&other.symbols);
		Ok(())
	}

	/// Produces the reduced form of this symbol set:
	///
	/// 1. Alias fold: counts of every symbol listed under a canonical symbol in the category's
	///    `reduce` map move into the canonical symbol.
	/// 2. Cancellation: within each configured group, the two distinct symbols with the largest
	///    remaining counts annihilate one-for-one until either stack empties (capped iteration).
	/// 3. Blank removal: configured blank symbols are dropped entirely.
	///
	/// Reduction is idempotent; the result keeps symbols in first-appearance order.
	#[must_use]
	pub fn reduced(&self, config: &CategoryConfig) -> Self {
		let mut counts = count_symbols(&self.symbols);

		for (canonical, sources) in &config.reduce {
			for source in sources {
				let moved = take_count(&mut counts, source);
				if moved > 0 {
					bump(&mut counts, canonical, moved);
				}
			}
		}

		for group in &config.cancels {
			if group.len() < 2 {
				continue;
			}
			// Opposing symbols annihilate one-for-one, largest remaining stacks first; the cap
			// bounds pathological configurations
			for _ in 0..32 {
				let Some((first, first_count)) = largest_in(&counts, group, None) else {
					break;
				};
				let Some((second, second_count)) = largest_in(&counts, group, Some(&first)) else {
					break;
				};
				if first_count == 0 || second_count == 0 {
					break;
				}
				decrement(&mut counts, &first);
				decrement(&mut counts, &second);
			}
		}

		for blank in config.blanks() {
			take_count(&mut counts, blank);
		}

		let mut symbols = Vec::new();
		for (symbol, count) in counts {
			for _ in 0..count {
				symbols.push(symbol.clone());
			}
		}

		Self {
			category: self.category.clone(),
			symbols,
		}
	}

	/// Renders the symbol set for display: symbols joined by spaces in first-appearance order,
	/// with any symbol repeated more than the category's `max consecutive` threshold collapsed to
	/// a single `SYMxN` occurrence. An empty set renders the category's default text.
	#[must_use]
	pub fn render(&self, config: &CategoryConfig) -> String {
		let counts = count_symbols(&self.symbols);

		let mut parts = Vec::new();
		for (symbol, count) in &counts {
			match config.max_consecutive {
				Some(max) if *count > max => parts.push(format!("{symbol}x{count}")),
				_ => {
					for _ in 0..*count {
						parts.push(symbol.clone());
					}
				}
			}
		}

		if parts.is_empty() {
			config.default.clone()
		} else {
			parts.join(" ")
		}
	}
}

/// Counts symbols into an insertion-ordered multiset.
fn count_symbols(symbols: &[String]) -> Vec<(String, usize)> {
	let mut counts: Vec<(String, usize)> = Vec::new();
	for symbol in symbols {
		bump(&mut counts, symbol, 1);
	}
	counts
}

/// Adds to a symbol's count, inserting it at the end if absent.
fn bump(counts: &mut Vec<(String, usize)>, symbol: &str, by: usize) {
	if let Some((_, count)) = counts.iter_mut().find(|(name, _)| name == symbol) {
		*count = count.saturating_add(by);
	} else {
		counts.push((symbol.to_owned(), by));
	}
}

/// Removes a symbol's entry entirely, returning the count it held.
fn take_count(counts: &mut Vec<(String, usize)>, symbol: &str) -> usize {
	if let Some(idx) = counts.iter().position(|(name, _)| name == symbol) {
		counts.remove(idx).1
	} else {
		0
	}
}

/// Finds the group symbol with the largest remaining count (ties broken by symbol name, matching
/// how stacks of equal size are resolved deterministically), optionally excluding one symbol.
fn largest_in(counts: &[(String, usize)], group: &[String], exclude: Option<&str>) -> Option<(String, usize)> {
	group
		.iter()
		.filter(|symbol| exclude != Some(symbol.as_str()))
		.map(|symbol| {
			let count = counts
				.iter()
				.find(|(name, _)| name == symbol)
				.map_or(0, |(_, count)| *count);
			(symbol.clone(), count)
		})
		.max_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
}

/// Decrements a symbol's count by one, dropping the entry at zero.
fn decrement(counts: &mut Vec<(String, usize)>, symbol: &str) {
	if let Some(idx) = counts.iter().position(|(name, _)| name == symbol) {
		counts[idx].1 = counts[idx].1.saturating_sub(1);
		if counts[idx].1 == 0 {
			counts.remove(idx);
		}
	}
}
