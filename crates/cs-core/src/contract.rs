//! Contract clauses attached to operations.
//!
//! Clauses are stated over model attributes (`entries`, `head`), never
//! over the concrete representation. `old(x)` denotes the value of `x`
//! observed at call time.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Role a clause plays in an operation contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClauseKind {
    /// Caller obligation, checked on entry.
    Precondition,
    /// Guarantee about the result and the resulting state.
    Postcondition,
    /// Holds in every externally observable state.
    Invariant,
}

impl ClauseKind {
    /// Keyword used when rendering the clause.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            ClauseKind::Precondition => "requires",
            ClauseKind::Postcondition => "ensures",
            ClauseKind::Invariant => "invariant",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseKind::Precondition => write!(f, "precondition"),
            ClauseKind::Postcondition => write!(f, "postcondition"),
            ClauseKind::Invariant => write!(f, "invariant"),
        }
    }
}

/// A single named clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Clause {
    pub kind: ClauseKind,
    /// Short identifier, e.g. `"EntriesDecrement"`.
    pub name: &'static str,
    /// The clause as written over model attributes.
    pub expression: &'static str,
}

impl Clause {
    #[must_use]
    pub const fn requires(name: &'static str, expression: &'static str) -> Self {
        Self {
            kind: ClauseKind::Precondition,
            name,
            expression,
        }
    }

    #[must_use]
    pub const fn ensures(name: &'static str, expression: &'static str) -> Self {
        Self {
            kind: ClauseKind::Postcondition,
            name,
            expression,
        }
    }

    #[must_use]
    pub const fn invariant(name: &'static str, expression: &'static str) -> Self {
        Self {
            kind: ClauseKind::Invariant,
            name,
            expression,
        }
    }

    /// Render as `requires entries > 0`.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{} {}", self.kind.keyword(), self.expression)
    }
}

/// The contract of one operation: its pre- and postconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationContract {
    pub operation: &'static str,
    pub clauses: &'static [Clause],
}

impl OperationContract {
    /// Clauses the caller must establish.
    pub fn preconditions(&self) -> impl Iterator<Item = &Clause> {
        self.clauses
            .iter()
            .filter(|c| c.kind == ClauseKind::Precondition)
    }

    /// Clauses the operation guarantees.
    pub fn postconditions(&self) -> impl Iterator<Item = &Clause> {
        self.clauses
            .iter()
            .filter(|c| c.kind == ClauseKind::Postcondition)
    }

    /// An operation with no precondition is legal in every state.
    #[must_use]
    pub fn is_total(&self) -> bool {
        self.preconditions().next().is_none()
    }

    /// Find a clause by name.
    #[must_use]
    pub fn clause(&self, name: &str) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.name == name)
    }

    /// Multi-line rendering, one clause per line.
    #[must_use]
    pub fn render(&self) -> String {
        debug_assert!(!self.operation.is_empty(), "Operation name must not be empty");

        let mut out = String::from(self.operation);
        out.push('\n');
        for clause in self.clauses {
            out.push_str("  ");
            out.push_str(&clause.render());
            out.push('\n');
        }
        out
    }
}

/// A clause found not to hold.
///
/// Returned by invariant-check routines. Normal operations report caller
/// errors through their own error type instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} `{clause}` violated: {detail}")]
pub struct ContractViolation {
    pub kind: ClauseKind,
    pub clause: &'static str,
    pub detail: String,
}

impl ContractViolation {
    #[must_use]
    pub fn new(clause: &Clause, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        debug_assert!(!detail.is_empty(), "Violation detail must not be empty");

        Self {
            kind: clause.kind,
            clause: clause.name,
            detail,
        }
    }
}
