//! The contract table of `ContractedStack`.
//!
//! These clauses are the authoritative behavior of the stack. The
//! implementation enforces preconditions with guards and checks
//! postconditions with debug assertions; tests and the model checker
//! check the same clauses from outside.

use cs_core::{Clause, OperationContract};

pub const NON_EMPTY: Clause = Clause::requires("NonEmpty", "entries > 0");

pub const ENTRIES_NON_NEGATIVE: Clause = Clause::invariant("EntriesNonNegative", "entries >= 0");
pub const HEAD_IFF_NON_EMPTY: Clause =
    Clause::invariant("HeadIffNonEmpty", "head.is_some() == (entries > 0)");
pub const HEAD_IS_LAST: Clause = Clause::invariant("HeadIsLast", "head == last(contents)");

pub const PUSH: OperationContract = OperationContract {
    operation: "push",
    clauses: &[
        Clause::ensures("EntriesIncrement", "entries == old(entries) + 1"),
        Clause::ensures("HeadIsArgument", "head == x"),
    ],
};

pub const POP: OperationContract = OperationContract {
    operation: "pop",
    clauses: &[
        NON_EMPTY,
        Clause::ensures("EntriesDecrement", "entries == old(entries) - 1"),
        Clause::ensures("ResultIsOldHead", "result == old(head)"),
    ],
};

pub const PEEK: OperationContract = OperationContract {
    operation: "peek",
    clauses: &[
        NON_EMPTY,
        Clause::ensures("ResultIsHead", "result == head"),
        Clause::ensures("EntriesUnchanged", "entries == old(entries)"),
    ],
};

pub const SIZE: OperationContract = OperationContract {
    operation: "size",
    clauses: &[Clause::ensures("ResultIsEntries", "result == entries")],
};

pub const IS_EMPTY: OperationContract = OperationContract {
    operation: "is_empty",
    clauses: &[Clause::ensures("ResultIsEntriesZero", "result == (entries == 0)")],
};

/// Contracts of every public operation.
pub const STACK_CONTRACTS: &[OperationContract] = &[PUSH, POP, PEEK, SIZE, IS_EMPTY];

/// Invariants that hold before and after every public operation.
pub const STACK_INVARIANTS: &[Clause] = &[ENTRIES_NON_NEGATIVE, HEAD_IFF_NON_EMPTY, HEAD_IS_LAST];

/// Look up an operation's contract by name.
#[must_use]
pub fn contract_for(operation: &str) -> Option<&'static OperationContract> {
    STACK_CONTRACTS.iter().find(|c| c.operation == operation)
}

/// Render every contract and invariant.
#[must_use]
pub fn render_all() -> String {
    let mut out = String::new();
    for contract in STACK_CONTRACTS {
        out.push_str(&contract.render());
    }
    out.push_str("invariants\n");
    for clause in STACK_INVARIANTS {
        out.push_str("  ");
        out.push_str(&clause.render());
        out.push('\n');
    }
    out
}
