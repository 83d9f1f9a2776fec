use crate::dice::roller::Iter;
use crate::dice::DiceList;
use crate::entry::{Arena, CounterName, Entry, EntryKind, ModifierName, RangedEntry};

#[test]
fn pool_accepts_arguments_and_modifiers() {
	let pool = pool_entry();
	assert!(pool.accepts(&EntryKind::Number { value: 3 }));
	assert!(pool.accepts(&EntryKind::Flat { value: -2 }));
	assert!(pool.accepts(&EntryKind::Modifier {
		name: ModifierName::Min
	}));
	assert!(pool.accepts(&EntryKind::Counters {
		name: CounterName::Num
	}));
	assert!(!pool.accepts(&EntryKind::Tag));
	assert!(!pool.accepts(&pool_entry().kind));
}

#[test]
fn modifier_accepts_single_number() {
	let modifier = Entry::new(
		EntryKind::Modifier {
			name: ModifierName::Gte,
		},
		None,
	);
	assert!(modifier.accepts(&EntryKind::Number { value: 3 }));
	assert!(!modifier.accepts(&EntryKind::Flat { value: 3 }));
	assert_eq!(modifier.max_children(), Some(1));
}

#[test]
fn counters_take_no_children() {
	let counters = Entry::new(
		EntryKind::Counters {
			name: CounterName::Pas,
		},
		None,
	);
	assert_eq!(counters.max_children(), Some(0));
	assert!(!counters.accepts(&EntryKind::Number { value: 1 }));
}

#[test]
fn tags_catch_stray_entries() {
	let tag = Entry::new(EntryKind::Tag, None);
	assert!(tag.accepts(&EntryKind::Modifier {
		name: ModifierName::Explode
	}));
	assert!(tag.accepts(&EntryKind::Number { value: 1 }));
	assert!(tag.accepts(&EntryKind::Flat { value: 1 }));
	assert!(tag.accepts(&EntryKind::Counters {
		name: CounterName::Count
	}));
	assert!(!tag.accepts(&pool_entry().kind));
}

#[test]
fn root_eligibility() {
	assert!(pool_entry().is_root());
	assert!(Entry::new(EntryKind::Number { value: 5 }, None).is_root());
	assert!(Entry::new(EntryKind::Flat { value: -2 }, None).is_root());
	assert!(!Entry::new(EntryKind::Tag, None).is_root());
	assert!(!Entry::new(
		EntryKind::Modifier {
			name: ModifierName::Max
		},
		None
	)
	.is_root());
}

#[test]
fn bubbling_attaches_to_nearest_accepting_ancestor() {
	let mut arena = Arena::default();
	let pool = arena.insert(pool_entry());
	let modifier = arena.insert(Entry::new(
		EntryKind::Modifier {
			name: ModifierName::Explode,
		},
		None,
	));
	let first = arena.insert(Entry::new(EntryKind::Number { value: 3 }, None));
	let second = arena.insert(Entry::new(EntryKind::Number { value: 2 }, None));

	assert!(arena.add(pool, modifier));
	assert!(arena.add(modifier, first));
	// The modifier already holds its one argument, so this bubbles up to the pool
	assert!(arena.add(first, second));

	assert_eq!(arena[pool].children(), &[modifier, second]);
	assert_eq!(arena[modifier].children(), &[first]);
}

#[test]
fn bubbling_fails_with_no_accepting_ancestor() {
	let mut arena = Arena::default();
	let number = arena.insert(Entry::new(EntryKind::Number { value: 5 }, None));
	let counters = arena.insert(Entry::new(
		EntryKind::Counters {
			name: CounterName::Num,
		},
		None,
	));
	assert!(!arena.add(number, counters));
}

#[test]
fn modifier_symbols_resolve_case_insensitively() {
	assert_eq!(ModifierName::from_symbol("MIN"), Some(ModifierName::Min));
	assert_eq!(ModifierName::from_symbol("xx"), Some(ModifierName::ExplodeRec));
	assert_eq!(ModifierName::from_symbol(">="), Some(ModifierName::Gte));
	assert_eq!(ModifierName::from_symbol("nope"), None);
}

#[test]
fn modifier_defaults() {
	for name in [
		ModifierName::Explode,
		ModifierName::ExplodeRec,
		ModifierName::Min,
		ModifierName::Max,
	] {
		assert_eq!(name.default_value(), 1);
		assert!(name.hides_default());
	}
	for name in [
		ModifierName::Lte,
		ModifierName::Gte,
		ModifierName::Lt,
		ModifierName::Gt,
		ModifierName::Eq,
	] {
		assert_eq!(name.default_value(), 0);
		assert!(name.is_comparison());
		assert!(!name.hides_default());
	}
}

#[test]
fn comparison_checks() {
	assert!(ModifierName::Lte.check(3, 3));
	assert!(!ModifierName::Lte.check(4, 3));
	assert!(ModifierName::Gte.check(3, 3));
	assert!(!ModifierName::Gte.check(2, 3));
	assert!(ModifierName::Lt.check(2, 3));
	assert!(!ModifierName::Lt.check(3, 3));
	assert!(ModifierName::Gt.check(4, 3));
	assert!(!ModifierName::Gt.check(3, 3));
	assert!(ModifierName::Eq.check(3, 3));
	assert!(!ModifierName::Eq.check(2, 3));
}

#[test]
fn counter_symbols() {
	assert_eq!(CounterName::from_symbol("NUM"), Some(CounterName::Num));
	assert_eq!(CounterName::from_symbol("success"), Some(CounterName::Success));
	assert!(!CounterName::Num.is_pass());
	assert!(!CounterName::Count.is_pass());
	assert!(CounterName::Pas.is_pass());
	assert!(CounterName::Success.is_pass());
}

fn pool_entry() -> Entry {
	let dice = DiceList::roll(2, 1, 6, 1, &mut Iter::new([3, 4]));
	Entry::new(
		EntryKind::Basic(RangedEntry {
			sign: 1,
			pool: 2,
			minv: 1,
			maxv: 6,
			dice,
		}),
		None,
	)
}
