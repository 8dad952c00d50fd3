//! A stack that records its own history.
//!
//! `TrackedStack` forwards every call to a `ContractedStack` and records
//! the call and its outcome. The recorded history lets
//! `StackPropertyChecker` verify LIFO order and count conservation after
//! an arbitrary sequence of calls.

use std::fmt;

use cs_core::{StackHistory, StackProperties, StackPropertyChecker};

use crate::error::StackError;
use crate::stack::ContractedStack;

/// A `ContractedStack` plus a record of every operation applied to it.
#[derive(Debug, Clone)]
pub struct TrackedStack<T> {
    stack: ContractedStack<T>,
    history: StackHistory<T>,
}

impl<T> Default for TrackedStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TrackedStack<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: ContractedStack::new(),
            history: StackHistory::new(),
        }
    }

    /// The underlying stack.
    #[must_use]
    pub fn stack(&self) -> &ContractedStack<T> {
        &self.stack
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.stack.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    fn next_step(&self) -> u64 {
        self.history.len() as u64 + 1
    }
}

impl<T: Clone> TrackedStack<T> {
    pub fn push(&mut self, x: T) {
        let step = self.next_step();
        self.history.record_push(x.clone(), step);
        self.stack.push(x);
    }

    /// # Errors
    ///
    /// [`StackError::Underflow`] when empty; recorded as an underflow.
    pub fn pop(&mut self) -> Result<T, StackError> {
        let step = self.next_step();
        let result = self.stack.pop();
        self.history.record_pop(result.as_ref().ok().cloned(), step);
        result
    }

    /// # Errors
    ///
    /// [`StackError::Underflow`] when empty; recorded as an underflow.
    pub fn peek(&mut self) -> Result<&T, StackError> {
        let step = self.next_step();
        let observed = self.stack.peek().ok().cloned();
        self.history.record_peek(observed, step);
        self.stack.peek()
    }
}

impl<T: Clone + PartialEq + fmt::Debug> TrackedStack<T> {
    /// Checker over this stack's state and history.
    #[must_use]
    pub fn checker(&self) -> StackPropertyChecker<'_, Self> {
        StackPropertyChecker::new(self)
    }
}

impl<T: Clone + PartialEq + fmt::Debug> StackProperties for TrackedStack<T> {
    type Element = T;

    fn contents(&self) -> &[T] {
        self.stack.as_slice()
    }

    fn entries(&self) -> usize {
        self.stack.entries()
    }

    fn head(&self) -> Option<&T> {
        self.stack.head()
    }

    fn history(&self) -> &StackHistory<T> {
        &self.history
    }
}
