//! Stack errors.

use cs_core::Clause;
use thiserror::Error;

use crate::contracts::NON_EMPTY;

/// Errors returned by stack operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum StackError {
    /// `pop` or `peek` was called while `entries == 0`.
    #[error("stack underflow: operation requires entries > 0")]
    Underflow,
}

impl StackError {
    /// The precondition the caller violated.
    #[must_use]
    pub fn clause(&self) -> &'static Clause {
        match self {
            StackError::Underflow => &NON_EMPTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underflow_names_precondition() {
        let err = StackError::Underflow;
        assert_eq!(err.clause().name, "NonEmpty");
        assert_eq!(
            err.to_string(),
            "stack underflow: operation requires entries > 0"
        );
    }
}
