//! # cs-core
//!
//! Contract vocabulary for the contracted stack.
//!
//! A contract is data: every operation carries a table of `requires` /
//! `ensures` clauses stated over model attributes, and every checked
//! property reports which clause it enforces. The pieces are:
//!
//! | Module | Provides |
//! |--------|----------|
//! | `contract` | `Clause`, `ClauseKind`, `OperationContract`, `ContractViolation` |
//! | `property` | `PropertyResult`, `PropertyChecker`, `PropertySummary` |
//! | `counterexample` | Seeded, step-by-step reproduction traces |
//! | `invariants` | `StackProperties` and the stack property checker |

pub mod contract;
pub mod counterexample;
pub mod invariants;
pub mod property;

pub use contract::{Clause, ClauseKind, ContractViolation, OperationContract};
pub use counterexample::{Counterexample, StateSnapshot};
pub use invariants::{
    StackHistory, StackOpType, StackOperation, StackProperties, StackPropertyChecker,
};
pub use property::{PropertyChecker, PropertyResult, PropertySummary};
