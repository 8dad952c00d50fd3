//! Stack invariants and contract properties.
//!
//! # Contract Mapping
//!
//! | Property | Clause | Description |
//! |----------|--------|-------------|
//! | EntriesNonNegative | `entries == len(contents) >= 0` | `entries` is derived from contents |
//! | HeadIffNonEmpty | `head.is_some() == (entries > 0)` | `head` is the last element or absent |
//! | CountConservation | `entries == pushes - pops` | No element dropped or duplicated |
//! | LifoOrder | `pop() == old(head)` | Replaying history reproduces every result |
//! | UnderflowOnlyWhenEmpty | `requires entries > 0` | Underflow exactly when the stack was empty |

use std::fmt;

use crate::counterexample::{Counterexample, StateSnapshot};
use crate::property::{PropertyChecker, PropertyResult};

const ENTRIES_CLAUSE: &str = "entries == len(contents) >= 0";
const HEAD_CLAUSE: &str = "head.is_some() == (entries > 0) && head == last(contents)";
const CONSERVATION_CLAUSE: &str = "entries == pushes - pops";
const LIFO_CLAUSE: &str = "pop() == old(head) && peek() == head";
const UNDERFLOW_CLAUSE: &str = "requires entries > 0";

/// Operations kept in a counterexample trace.
const TRACE_STEPS_MAX: usize = 16;

/// Observable state of a stack implementation.
///
/// The checker verifies invariants against this view, so any stack that
/// can expose its contents and a history of operations can be checked.
pub trait StackProperties {
    type Element: Clone + PartialEq + fmt::Debug;

    /// Current contents, bottom to top.
    fn contents(&self) -> &[Self::Element];

    /// Model attribute `entries` as the implementation reports it.
    fn entries(&self) -> usize;

    /// Model attribute `head` as the implementation reports it.
    fn head(&self) -> Option<&Self::Element>;

    /// Every operation applied so far, in order.
    fn history(&self) -> &StackHistory<Self::Element>;
}

/// Type of stack operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackOpType {
    Push,
    Pop,
    PopUnderflow,
    Peek,
    PeekUnderflow,
}

impl StackOpType {
    #[must_use]
    pub fn is_underflow(&self) -> bool {
        matches!(self, StackOpType::PopUnderflow | StackOpType::PeekUnderflow)
    }
}

/// A single recorded stack operation.
#[derive(Debug, Clone, PartialEq)]
pub struct StackOperation<T> {
    pub op_type: StackOpType,
    /// Argument for push, result for a successful pop or peek.
    pub element: Option<T>,
    /// Step number for ordering
    pub step: u64,
}

impl<T: fmt::Debug> StackOperation<T> {
    /// One-line rendering such as `pop -> 3`.
    #[must_use]
    pub fn describe(&self) -> String {
        match (self.op_type, &self.element) {
            (StackOpType::Push, Some(e)) => format!("push {:?}", e),
            (StackOpType::Pop, Some(e)) => format!("pop -> {:?}", e),
            (StackOpType::Peek, Some(e)) => format!("peek -> {:?}", e),
            (StackOpType::PopUnderflow, _) => "pop -> Underflow".to_string(),
            (StackOpType::PeekUnderflow, _) => "peek -> Underflow".to_string(),
            (op_type, None) => format!("{:?} without element", op_type),
        }
    }
}

/// History of stack operations in the order they were applied.
#[derive(Debug, Clone, PartialEq)]
pub struct StackHistory<T> {
    pub operations: Vec<StackOperation<T>>,
}

impl<T> Default for StackHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StackHistory<T> {
    /// Create a new empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Record a push operation.
    pub fn record_push(&mut self, element: T, step: u64) {
        debug_assert!(step > 0, "Step must be positive");
        self.operations.push(StackOperation {
            op_type: StackOpType::Push,
            element: Some(element),
            step,
        });
    }

    /// Record a pop; `None` means it failed with underflow.
    pub fn record_pop(&mut self, element: Option<T>, step: u64) {
        debug_assert!(step > 0, "Step must be positive");
        self.operations.push(StackOperation {
            op_type: if element.is_some() {
                StackOpType::Pop
            } else {
                StackOpType::PopUnderflow
            },
            element,
            step,
        });
    }

    /// Record a peek; `None` means it failed with underflow.
    pub fn record_peek(&mut self, element: Option<T>, step: u64) {
        debug_assert!(step > 0, "Step must be positive");
        self.operations.push(StackOperation {
            op_type: if element.is_some() {
                StackOpType::Peek
            } else {
                StackOpType::PeekUnderflow
            },
            element,
            step,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    #[must_use]
    pub fn count(&self, op_type: StackOpType) -> u64 {
        self.operations
            .iter()
            .filter(|op| op.op_type == op_type)
            .count() as u64
    }

    /// Successful pushes.
    #[must_use]
    pub fn pushes_count(&self) -> u64 {
        self.count(StackOpType::Push)
    }

    /// Successful pops. Underflows removed nothing and are not counted.
    #[must_use]
    pub fn pops_count(&self) -> u64 {
        self.count(StackOpType::Pop)
    }

    #[must_use]
    pub fn underflows_count(&self) -> u64 {
        self.operations
            .iter()
            .filter(|op| op.op_type.is_underflow())
            .count() as u64
    }
}

/// Property checker for stack implementations.
pub struct StackPropertyChecker<'a, S: StackProperties> {
    stack: &'a S,
    dst_seed: Option<u64>,
}

impl<'a, S: StackProperties> StackPropertyChecker<'a, S> {
    /// Create a new checker for the given stack.
    #[must_use]
    pub fn new(stack: &'a S) -> Self {
        Self {
            stack,
            dst_seed: None,
        }
    }

    /// Set DST seed for counterexample reproduction.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        debug_assert!(seed != 0, "DST seed should not be zero");
        self.dst_seed = Some(seed);
        self
    }

    /// Trace of the operations up to and including `step`, ending with
    /// a snapshot describing the failure.
    fn counterexample(&self, step: u64, description: String) -> Counterexample {
        let mut ce = match self.dst_seed {
            Some(seed) => Counterexample::with_seed(seed),
            None => Counterexample::new(),
        };

        let operations = &self.stack.history().operations;
        let upto = operations.iter().take_while(|op| op.step <= step).count();
        let start = upto.saturating_sub(TRACE_STEPS_MAX);

        for op in &operations[start..upto] {
            ce.add_state(StateSnapshot {
                step: op.step,
                description: op.describe(),
                variables: Vec::new(),
            });
        }

        ce.add_state(StateSnapshot {
            step,
            description,
            variables: vec![
                ("entries".to_string(), self.stack.entries().to_string()),
                ("head".to_string(), format!("{:?}", self.stack.head())),
                ("contents".to_string(), format!("{:?}", self.stack.contents())),
            ],
        });

        ce
    }

    fn last_step(&self) -> u64 {
        self.stack
            .history()
            .operations
            .last()
            .map_or(0, |op| op.step)
    }

    /// `entries` is the length of contents. Non-negativity holds by type.
    fn check_entries(&self) -> PropertyResult {
        let entries = self.stack.entries();
        let len = self.stack.contents().len();

        if entries != len {
            return PropertyResult::fail(
                "EntriesNonNegative",
                ENTRIES_CLAUSE,
                format!("entries is {} but contents holds {} elements", entries, len),
                Some(self.counterexample(self.last_step(), "entries out of sync".to_string())),
            );
        }

        PropertyResult::pass("EntriesNonNegative", ENTRIES_CLAUSE)
    }

    /// `head` is present iff the stack is non-empty, and is the last element.
    fn check_head(&self) -> PropertyResult {
        let head = self.stack.head();
        let entries = self.stack.entries();

        if head.is_some() != (entries > 0) {
            return PropertyResult::fail(
                "HeadIffNonEmpty",
                HEAD_CLAUSE,
                format!("head is {:?} with {} entries", head, entries),
                Some(self.counterexample(self.last_step(), "head presence mismatch".to_string())),
            );
        }

        if head != self.stack.contents().last() {
            return PropertyResult::fail(
                "HeadIffNonEmpty",
                HEAD_CLAUSE,
                format!(
                    "head is {:?} but last element is {:?}",
                    head,
                    self.stack.contents().last()
                ),
                Some(self.counterexample(self.last_step(), "head is not the top".to_string())),
            );
        }

        PropertyResult::pass("HeadIffNonEmpty", HEAD_CLAUSE)
    }

    /// Every pushed element is either still present or was popped.
    fn check_count_conservation(&self) -> PropertyResult {
        let history = self.stack.history();
        let pushes = history.pushes_count();
        let pops = history.pops_count();
        let entries = self.stack.entries() as u64;

        if pops > pushes || pushes - pops != entries {
            return PropertyResult::fail(
                "CountConservation",
                CONSERVATION_CLAUSE,
                format!(
                    "entries is {} but {} pushes and {} pops were recorded",
                    entries, pushes, pops
                ),
                Some(self.counterexample(self.last_step(), "element count drifted".to_string())),
            );
        }

        PropertyResult::pass("CountConservation", CONSERVATION_CLAUSE)
    }

    /// Replay the history on a reference sequence. Every pop must return
    /// the reference top, every peek must observe it, and the final
    /// contents must match.
    fn check_lifo_order(&self) -> PropertyResult {
        let mut model: Vec<S::Element> = Vec::new();

        for op in &self.stack.history().operations {
            match op.op_type {
                StackOpType::Push => {
                    if let Some(ref e) = op.element {
                        model.push(e.clone());
                    }
                }
                StackOpType::Pop => {
                    let expected = model.pop();
                    if expected.as_ref() != op.element.as_ref() {
                        return PropertyResult::fail(
                            "LifoOrder",
                            LIFO_CLAUSE,
                            format!(
                                "pop returned {:?} but LIFO expected {:?}",
                                op.element, expected
                            ),
                            Some(self.counterexample(op.step, "pop out of order".to_string())),
                        );
                    }
                }
                StackOpType::Peek => {
                    let expected = model.last();
                    if expected != op.element.as_ref() {
                        return PropertyResult::fail(
                            "LifoOrder",
                            LIFO_CLAUSE,
                            format!(
                                "peek returned {:?} but head was {:?}",
                                op.element, expected
                            ),
                            Some(self.counterexample(op.step, "peek saw wrong head".to_string())),
                        );
                    }
                }
                // Underflows are checked separately
                StackOpType::PopUnderflow | StackOpType::PeekUnderflow => {}
            }
        }

        if model.as_slice() != self.stack.contents() {
            return PropertyResult::fail(
                "LifoOrder",
                LIFO_CLAUSE,
                format!(
                    "contents are {:?} but replayed history gives {:?}",
                    self.stack.contents(),
                    model
                ),
                Some(self.counterexample(self.last_step(), "contents diverged".to_string())),
            );
        }

        PropertyResult::pass("LifoOrder", LIFO_CLAUSE)
    }

    /// Underflow is reported exactly when the stack was empty.
    fn check_underflow_only_when_empty(&self) -> PropertyResult {
        let mut depth: u64 = 0;

        for op in &self.stack.history().operations {
            let violation = match op.op_type {
                StackOpType::Push => {
                    depth += 1;
                    None
                }
                StackOpType::Pop | StackOpType::Peek if depth == 0 => Some(format!(
                    "{} succeeded on an empty stack",
                    op.describe()
                )),
                StackOpType::Pop => {
                    depth -= 1;
                    None
                }
                StackOpType::Peek => None,
                StackOpType::PopUnderflow | StackOpType::PeekUnderflow if depth > 0 => Some(
                    format!("{} with {} entries present", op.describe(), depth),
                ),
                StackOpType::PopUnderflow | StackOpType::PeekUnderflow => None,
            };

            if let Some(violation) = violation {
                return PropertyResult::fail(
                    "UnderflowOnlyWhenEmpty",
                    UNDERFLOW_CLAUSE,
                    violation,
                    Some(self.counterexample(op.step, "precondition misjudged".to_string())),
                );
            }
        }

        PropertyResult::pass("UnderflowOnlyWhenEmpty", UNDERFLOW_CLAUSE)
    }
}

impl<S: StackProperties> PropertyChecker for StackPropertyChecker<'_, S> {
    fn check_all(&self) -> Vec<PropertyResult> {
        vec![
            self.check_entries(),
            self.check_head(),
            self.check_count_conservation(),
            self.check_lifo_order(),
            self.check_underflow_only_when_empty(),
        ]
    }
}
