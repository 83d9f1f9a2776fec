//! Abstractions for generating the random outcomes of a roll.

use core::iter::Peekable;

#[cfg(feature = "fastrand")]
use fastrand::Rng;

/// Produces the raw random outcomes the engine needs: numeric die values and face picks for
/// special dice. Implementations decide where the randomness (if any) comes from.
pub trait Roller {
	/// Generates the value of a single numeric die with faces `minv..=maxv` (inclusive).
	#[must_use]
	fn die(&mut self, minv: i32, maxv: i32) -> i32;

	/// Picks an index into a face list of the given length.
	#[must_use]
	fn face(&mut self, len: usize) -> usize;
}

/// Generates outcomes with uniform random values using [fastrand].
/// Requires the `fastrand` feature (enabled by default).
///
/// # Examples
/// ```
/// use dicebag::dice::{roller::FastRand, DiceList, Roller};
///
/// let mut roller = FastRand::with_seed(0x750c38d574400);
/// let pool = DiceList::roll(4, 1, 6, 1, &mut roller);
/// assert!(pool.dice.iter().all(|die| (1..=6).contains(&die.value)));
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone, Default)]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller with a pre-seeded RNG instance.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	fn die(&mut self, minv: i32, maxv: i32) -> i32 {
		if minv <= maxv {
			self.0.i32(minv..=maxv)
		} else {
			minv
		}
	}

	fn face(&mut self, len: usize) -> usize {
		if len > 0 {
			self.0.usize(0..len)
		} else {
			0
		}
	}
}

/// Generates outcomes that always take their maximum value: every numeric die rolls its highest
/// face and every face pick takes the last face. Useful for exercising explosion paths.
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Stateless")]
pub struct Max;

impl Roller for Max {
	fn die(&mut self, _minv: i32, maxv: i32) -> i32 {
		maxv
	}

	fn face(&mut self, len: usize) -> usize {
		len.saturating_sub(1)
	}
}

/// Generates outcomes from an iterator of predetermined values. Mainly useful for testing.
///
/// Die values are taken verbatim; face picks take the next value as an index (clamped at zero for
/// negative values).
///
/// # Examples
/// ```
/// use dicebag::dice::{roller::Iter, DiceList, Roller};
///
/// let mut roller = Iter::new([3, 6, 1]);
/// let pool = DiceList::roll(3, 1, 6, 1, &mut roller);
/// assert_eq!(pool.dice.iter().map(|die| die.value).collect::<Vec<_>>(), vec![3, 6, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = i32>>(Peekable<I>);

impl<I: Iterator<Item = i32>> Iter<I> {
	/// Creates a new roller that takes outcomes from the given iterator.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}

	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}
}

impl<I: Iterator<Item = i32>> Roller for Iter<I> {
	/// Produces the next iteration's value as a die roll.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn die(&mut self, _minv: i32, _maxv: i32) -> i32 {
		self.0.next().expect("iterator is finished")
	}

	fn face(&mut self, _len: usize) -> usize {
		usize::try_from(self.die(0, 0)).unwrap_or(0)
	}
}
