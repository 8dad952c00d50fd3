//! Invariant traits for contracted data structures.
//!
//! Each module defines the properties an implementation must satisfy,
//! each traceable to a contract clause.

pub mod stack;

pub use stack::{StackHistory, StackOpType, StackOperation, StackProperties, StackPropertyChecker};
