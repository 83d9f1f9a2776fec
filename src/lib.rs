//! Engine for interpreting free-form dice-notation text (`2d6x3 min4>=3 "damage"`, `3sA 2sC`) into
//! structured, replayable roll results.
//!
//! The pipeline is a strict, synchronous sequence: a [`Tokenizer`] turns raw text into an ordered,
//! lossless token stream; a [`Roll`] consumes the tokens into a forest of typed entries (dice
//! pools, modifiers, special-dice rolls, free-text tags); evaluation rolls and mutates each root's
//! dice in place; and the aggregated totals are read out as display strings.
//!
//! Special-dice categories (narrative symbol systems with alias folding and pairwise symbol
//! cancellation) are entirely data-driven: a [`DiceConfig`] loaded from JSON describes every
//! category's delimiter, die names, faces, and reduction rules, and the tokenizer's grammar is
//! built from it. The engine performs no I/O of its own beyond the explicit config load/reload
//! entry points, and holds no state shared between rolls.

#![expect(
	clippy::tabs_in_doc_comments,
	reason = "Consistency with source, user-configurability & accessibility"
)]
#![deny(macro_use_extern_crate, meta_variable_misuse, unit_bindings)]
#![warn(
	explicit_outlives_requirements,
	missing_docs,
	missing_debug_implementations,
	unreachable_pub,
	unused_qualifications,
	clippy::pedantic,
	clippy::allow_attributes_without_reason,
	clippy::arithmetic_side_effects,
	clippy::clone_on_ref_ptr,
	clippy::cognitive_complexity,
	clippy::dbg_macro,
	clippy::exhaustive_enums,
	clippy::exhaustive_structs,
	clippy::expect_used,
	clippy::get_unwrap,
	clippy::if_then_some_else_none,
	clippy::infinite_loop,
	clippy::map_err_ignore,
	clippy::panic_in_result_fn,
	clippy::print_stderr,
	clippy::print_stdout,
	clippy::rc_buffer,
	clippy::rc_mutex,
	clippy::redundant_type_annotations,
	clippy::same_name_method,
	clippy::semicolon_inside_block,
	clippy::str_to_string,
	clippy::unnecessary_self_imports,
	clippy::unused_result_ok,
	clippy::unwrap_in_result,
	clippy::unwrap_used
)]

pub mod config;
pub mod dice;
pub mod entry;
pub mod roll;
pub mod special;
pub mod token;

pub use config::DiceConfig;
pub use dice::{roller::Roller, Die, DiceList};
pub use roll::Roll;
pub use special::SpecialDie;
pub use token::{Token, Tokenizer};

#[cfg(test)]
mod tests;
