use crate::dice::roller::{Iter, Max};
use crate::dice::{DiceList, Die, Override};

#[cfg(feature = "fastrand")]
#[test]
fn rolled_pool_in_range() {
	let mut roller = crate::dice::roller::FastRand::default();
	let pool = DiceList::roll(100, 1, 20, 1, &mut roller);
	assert_eq!(pool.dice.len(), 100);
	assert!(pool.dice.iter().all(|die| (1..=20).contains(&die.value)));
	assert!(pool.dice.iter().all(|die| die.depth == 0 && die.valid));
}

#[test]
fn iter_roller_preserves_order() {
	let mut roller = Iter::new([3, 6, 1]);
	let pool = DiceList::roll(3, 1, 6, 1, &mut roller);
	assert_eq!(values(&pool), vec![3, 6, 1]);
	assert_eq!(pool.total(), 10);
}

#[test]
fn max_roller_rolls_highest_face() {
	let pool = DiceList::roll(3, 1, 8, 1, &mut Max);
	assert_eq!(values(&pool), vec![8, 8, 8]);
}

#[test]
fn negative_sign_negates_values() {
	let mut roller = Iter::new([3, 5]);
	let pool = DiceList::roll(2, 1, 6, -1, &mut roller);
	assert_eq!(values(&pool), vec![-3, -5]);
	assert_eq!(pool.total(), -8);
}

#[test]
fn total_skips_invalid_dice() {
	let mut pool = DiceList::roll(3, 1, 6, 1, &mut Iter::new([2, 4, 6]));
	pool.dice[1].valid = false;
	assert_eq!(pool.total(), 8);
	assert_eq!(pool.valid_count(), 2);
	assert!(pool.any_valid());
}

#[test]
fn no_valid_dice() {
	let mut pool = DiceList::roll(2, 1, 6, 1, &mut Iter::new([2, 4]));
	for die in &mut pool.dice {
		die.valid = false;
	}
	assert_eq!(pool.total(), 0);
	assert_eq!(pool.valid_count(), 0);
	assert!(!pool.any_valid());
}

#[test]
fn render_groups_by_depth() {
	let mut roller = Iter::new([4, 2, 6]);
	let mut pool = DiceList::roll(2, 1, 6, 1, &mut roller);
	pool.push_synthetic(3);
	pool.add(&mut roller, 1);
	pool.dice[0].valid = false;
	assert_eq!(pool.render(), "(3) ~~4~~, 2 [6]");
}

#[test]
fn render_count_override() {
	let mut pool = DiceList::roll(2, 1, 6, 1, &mut Iter::new([4, 5]));
	pool.override_ = Override::Count(2);
	assert_eq!(pool.render(), "4, 5 -> 2");
}

#[test]
fn render_pass_override() {
	let mut pool = DiceList::roll(1, 1, 6, 1, &mut Iter::new([1]));
	pool.dice[0].valid = false;
	pool.override_ = Override::Pass(false);
	assert_eq!(pool.render(), "~~1~~ -> Failure");
}

#[test]
fn die_constructors() {
	assert_eq!(Die::new(4), Die::at_depth(4, 0));
	let exploded = Die::at_depth(6, 2);
	assert_eq!(exploded.depth, 2);
	assert!(exploded.valid);
}

fn values(pool: &DiceList) -> Vec<i32> {
	pool.dice.iter().map(|die| die.value).collect()
}
