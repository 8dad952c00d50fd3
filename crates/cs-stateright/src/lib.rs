//! # cs-stateright
//!
//! Exhaustive bounded model checking of the contracted stack.
//!
//! The model's state holds a real `ContractedStack`, so every property is
//! checked against the implementation itself, over every sequence of
//! push/pop/peek calls up to the configured length.

pub mod stack_model;

pub use stack_model::{Outcome, StackAction, StackModel, StackState};
