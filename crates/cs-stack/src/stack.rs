//! The contracted stack.

use cs_core::{ContractViolation, OperationContract};

use crate::contracts::{HEAD_IFF_NON_EMPTY, HEAD_IS_LAST, STACK_CONTRACTS};
use crate::error::StackError;

/// A LIFO stack whose model attributes are derived, never stored.
///
/// Equality and hashing are structural over the contents, so two stacks
/// are equal exactly when they hold the same elements in the same order.
///
/// # Contracts
///
/// | Operation | Requires | Ensures |
/// |-----------|----------|---------|
/// | `push(x)` | - | `entries == old(entries) + 1`, `head == x` |
/// | `pop()` | `entries > 0` | `entries == old(entries) - 1`, `result == old(head)` |
/// | `peek()` | `entries > 0` | `result == head`, `entries == old(entries)` |
/// | `size()` | - | `result == entries` |
/// | `is_empty()` | - | `result == (entries == 0)` |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractedStack<T> {
    /// Bottom to top. Only touched at the end.
    contents: Vec<T>,
}

impl<T> Default for ContractedStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ContractedStack<T> {
    /// Create an empty stack: `entries == 0`, `head` absent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contents: Vec::new(),
        }
    }

    /// Create an empty stack with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            contents: Vec::with_capacity(capacity),
        }
    }

    // ========== Model attributes ==========

    /// Model attribute `entries`: the length of contents.
    #[must_use]
    pub fn entries(&self) -> usize {
        self.contents.len()
    }

    /// Model attribute `head`: the last element, absent when empty.
    #[must_use]
    pub fn head(&self) -> Option<&T> {
        self.contents.last()
    }

    // ========== Operations ==========

    /// Push `x` on top. Always legal.
    pub fn push(&mut self, x: T) {
        let entries_old = self.entries();

        self.contents.push(x);

        debug_assert_eq!(
            self.entries(),
            entries_old + 1,
            "ensures entries == old(entries) + 1"
        );
        debug_assert!(self.head().is_some(), "ensures head is present");
    }

    /// Remove and return the top element.
    ///
    /// # Errors
    ///
    /// [`StackError::Underflow`] when the stack is empty. The stack is
    /// left unmodified.
    pub fn pop(&mut self) -> Result<T, StackError> {
        let entries_old = self.entries();

        // requires entries > 0; the removed element is old(head)
        let Some(head_old) = self.contents.pop() else {
            return Err(StackError::Underflow);
        };

        debug_assert_eq!(
            self.entries(),
            entries_old - 1,
            "ensures entries == old(entries) - 1"
        );
        Ok(head_old)
    }

    /// Borrow the top element without removing it.
    ///
    /// # Errors
    ///
    /// [`StackError::Underflow`] when the stack is empty.
    pub fn peek(&self) -> Result<&T, StackError> {
        // requires entries > 0
        self.head().ok_or(StackError::Underflow)
    }

    /// Number of elements, i.e. `entries`.
    #[must_use]
    pub fn size(&self) -> usize {
        self.entries()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries() == 0
    }

    /// Contents from bottom to top.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.contents
    }

    /// Iterate from top to bottom, the order `pop` would return.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.contents.iter().rev()
    }

    // ========== Contracts ==========

    /// Contracts of every public operation.
    #[must_use]
    pub fn contracts() -> &'static [OperationContract] {
        STACK_CONTRACTS
    }

    /// Check the stack invariants against the current contents.
    ///
    /// `entries >= 0` holds by type and is not checked here.
    ///
    /// # Errors
    ///
    /// The first invariant found not to hold.
    pub fn check_invariants(&self) -> Result<(), ContractViolation> {
        let entries = self.entries();
        let head = self.head();

        if head.is_some() != (entries > 0) {
            return Err(ContractViolation::new(
                &HEAD_IFF_NON_EMPTY,
                format!(
                    "head is {} with {} entries",
                    if head.is_some() { "present" } else { "absent" },
                    entries
                ),
            ));
        }

        let last = entries.checked_sub(1).and_then(|i| self.contents.get(i));
        let head_is_last = match (head, last) {
            (Some(h), Some(l)) => std::ptr::eq(h, l),
            (None, None) => true,
            _ => false,
        };
        if !head_is_last {
            return Err(ContractViolation::new(
                &HEAD_IS_LAST,
                format!("head is not element {} of contents", entries),
            ));
        }

        Ok(())
    }
}
