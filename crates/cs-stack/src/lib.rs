//! # cs-stack
//!
//! A last-in-first-out stack whose behavior is defined by contracts.
//!
//! The concrete state is a `Vec<T>`. Two model attributes are derived
//! from it on demand and never stored:
//!
//! - `entries`: the number of elements
//! - `head`: the last element, or absent when `entries == 0`
//!
//! Every operation states its pre- and postconditions over those two
//! attributes (see [`contracts`]). Preconditions are guards that return
//! [`StackError::Underflow`]; postconditions are debug assertions.
//!
//! ```rust
//! use cs_stack::{ContractedStack, StackError};
//!
//! let mut stack = ContractedStack::new();
//! stack.push(1);
//! stack.push(2);
//! assert_eq!(stack.peek(), Ok(&2));
//! assert_eq!(stack.pop(), Ok(2));
//! assert_eq!(stack.pop(), Ok(1));
//! assert_eq!(stack.pop(), Err(StackError::Underflow));
//! ```
//!
//! [`TrackedStack`] records every operation so the `cs-core` property
//! checker can verify a run after the fact.

pub mod contracts;
pub mod error;
pub mod stack;
pub mod tracked;

#[cfg(kani)]
mod kani_proofs;

pub use contracts::{STACK_CONTRACTS, STACK_INVARIANTS};
pub use error::StackError;
pub use stack::ContractedStack;
pub use tracked::TrackedStack;
