//! Stateright model of the contracted stack.
//!
//! Every action calls the real `ContractedStack`, records what was
//! observed before the call in `Outcome`, and the properties check the
//! operation contracts against that record.

use cs_stack::{ContractedStack, StackError};
use stateright::Model;

/// What the last action observed before and after the call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Initial,
    Pushed {
        value: u64,
        entries_old: usize,
    },
    Popped {
        result: Result<u64, StackError>,
        head_old: Option<u64>,
        entries_old: usize,
        /// Whole stack before the call, to check that underflow has no effect.
        before: ContractedStack<u64>,
    },
    Peeked {
        result: Result<u64, StackError>,
        head_old: Option<u64>,
        entries_old: usize,
    },
}

/// State of the stack model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackState {
    pub stack: ContractedStack<u64>,
    pub pushes_count: u64,
    /// Successful pops only
    pub pops_count: u64,
    pub operations_count: u64,
    pub last: Outcome,
}

impl Default for StackState {
    fn default() -> Self {
        Self::new()
    }
}

impl StackState {
    /// Empty stack, nothing applied yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: ContractedStack::new(),
            pushes_count: 0,
            pops_count: 0,
            operations_count: 0,
            last: Outcome::Initial,
        }
    }

    // ========== Invariants ==========

    /// Stack invariants plus count conservation.
    pub fn invariants_hold(&self) -> bool {
        self.stack.check_invariants().is_ok()
            && self.pops_count <= self.pushes_count
            && self.stack.entries() as u64 == self.pushes_count - self.pops_count
    }

    // ========== Contracts of the last action ==========

    /// `entries == old(entries) + 1`, `head == x`
    pub fn push_contract_held(&self) -> bool {
        match self.last {
            Outcome::Pushed { value, entries_old } => {
                self.stack.entries() == entries_old + 1 && self.stack.head() == Some(&value)
            }
            _ => true,
        }
    }

    /// `entries == old(entries) - 1`, `result == old(head)`; underflow
    /// exactly when empty, with no effect.
    pub fn pop_contract_held(&self) -> bool {
        match &self.last {
            Outcome::Popped {
                result,
                head_old,
                entries_old,
                before,
            } => match (result, head_old) {
                (Ok(v), Some(h)) => v == h && self.stack.entries() + 1 == *entries_old,
                (Err(StackError::Underflow), None) => *entries_old == 0 && self.stack == *before,
                _ => false,
            },
            _ => true,
        }
    }

    /// `result == head`, `entries == old(entries)`; underflow exactly when empty.
    pub fn peek_contract_held(&self) -> bool {
        match &self.last {
            Outcome::Peeked {
                result,
                head_old,
                entries_old,
            } => {
                let unchanged = self.stack.entries() == *entries_old;
                match (result, head_old) {
                    (Ok(v), Some(h)) => unchanged && v == h && self.stack.head() == Some(h),
                    (Err(StackError::Underflow), None) => unchanged && *entries_old == 0,
                    _ => false,
                }
            }
            _ => true,
        }
    }

    pub fn underflowed(&self) -> bool {
        matches!(
            self.last,
            Outcome::Popped { result: Err(_), .. } | Outcome::Peeked { result: Err(_), .. }
        )
    }
}

/// Calls the model may make.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StackAction {
    Push(u64),
    Pop,
    Peek,
}

/// Model for bounded model checking.
pub struct StackModel {
    pub values: Vec<u64>,
    pub operations_max: u64,
}

impl StackModel {
    /// Create a new model with given parameters.
    pub fn new(values: Vec<u64>, operations_max: u64) -> Self {
        debug_assert!(!values.is_empty(), "Must push at least one value");
        debug_assert!(operations_max > 0, "Must allow at least one operation");
        debug_assert!(operations_max <= 12, "Model checking long sequences is slow");

        Self {
            values,
            operations_max,
        }
    }
}

impl Model for StackModel {
    type State = StackState;
    type Action = StackAction;

    fn init_states(&self) -> Vec<Self::State> {
        vec![StackState::new()]
    }

    fn actions(&self, state: &Self::State, actions: &mut Vec<Self::Action>) {
        if state.operations_count >= self.operations_max {
            return;
        }

        for &value in &self.values {
            actions.push(StackAction::Push(value));
        }
        // Legal to attempt on an empty stack; the contract says they underflow
        actions.push(StackAction::Pop);
        actions.push(StackAction::Peek);
    }

    fn next_state(&self, state: &Self::State, action: Self::Action) -> Option<Self::State> {
        let mut next = state.clone();
        next.operations_count += 1;

        let entries_old = state.stack.entries();
        let head_old = state.stack.head().copied();

        match action {
            StackAction::Push(value) => {
                next.stack.push(value);
                next.pushes_count += 1;
                next.last = Outcome::Pushed { value, entries_old };
            }

            StackAction::Pop => {
                let result = next.stack.pop();
                if result.is_ok() {
                    next.pops_count += 1;
                }
                next.last = Outcome::Popped {
                    result,
                    head_old,
                    entries_old,
                    before: state.stack.clone(),
                };
            }

            StackAction::Peek => {
                let result = next.stack.peek().copied();
                next.last = Outcome::Peeked {
                    result,
                    head_old,
                    entries_old,
                };
            }
        }

        Some(next)
    }

    fn properties(&self) -> Vec<stateright::Property<Self>> {
        vec![
            stateright::Property::always("InvariantsHold", |_model: &Self, state: &Self::State| {
                state.invariants_hold()
            }),
            stateright::Property::always("PushContract", |_model: &Self, state: &Self::State| {
                state.push_contract_held()
            }),
            stateright::Property::always("PopContract", |_model: &Self, state: &Self::State| {
                state.pop_contract_held()
            }),
            stateright::Property::always("PeekContract", |_model: &Self, state: &Self::State| {
                state.peek_contract_held()
            }),
            stateright::Property::sometimes("UnderflowReached", |_model: &Self, state: &Self::State| {
                state.underflowed()
            }),
            stateright::Property::sometimes("FullDepth", |model: &Self, state: &Self::State| {
                state.stack.entries() as u64 == model.operations_max
            }),
            stateright::Property::sometimes("DrainedAfterPush", |_model: &Self, state: &Self::State| {
                state.pushes_count > 0 && state.stack.is_empty()
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stateright::Checker;

    #[test]
    fn test_initial_state() {
        let state = StackState::new();
        assert!(state.stack.is_empty());
        assert!(state.invariants_hold());
        assert!(state.pop_contract_held());
        assert!(!state.underflowed());
    }

    #[test]
    fn test_model_checking_small() {
        let model = StackModel::new(vec![1, 2], 5);

        model
            .checker()
            .threads(1)
            .spawn_bfs()
            .join()
            .assert_properties();
    }

    #[test]
    fn test_discoveries_found() {
        let checker = StackModel::new(vec![7], 3)
            .checker()
            .threads(1)
            .spawn_bfs()
            .join();

        assert!(checker.discovery("UnderflowReached").is_some());
        assert!(checker.discovery("FullDepth").is_some());
        assert!(checker.discovery("DrainedAfterPush").is_some());
        assert!(checker.discovery("PopContract").is_none());
    }

    #[test]
    fn test_wrong_pop_result_detected() {
        let mut state = StackState::new();
        state.stack.push(1);
        state.pushes_count = 2;
        state.pops_count = 1;

        let mut before = ContractedStack::new();
        before.push(1);
        before.push(2);
        state.last = Outcome::Popped {
            result: Ok(1),
            head_old: Some(2),
            entries_old: 2,
            before,
        };

        assert!(state.invariants_hold());
        assert!(!state.pop_contract_held());
    }

    #[test]
    fn test_underflow_with_effect_detected() {
        let mut state = StackState::new();
        state.stack.push(9);
        state.pushes_count = 1;
        state.last = Outcome::Popped {
            result: Err(StackError::Underflow),
            head_old: None,
            entries_old: 0,
            before: ContractedStack::new(),
        };

        assert!(!state.pop_contract_held());
    }

    #[test]
    fn test_lost_count_detected() {
        let mut state = StackState::new();
        state.stack.push(3);
        state.pushes_count = 2;

        assert!(!state.invariants_hold());
    }

    #[test]
    #[ignore] // Slower test, run with --ignored
    fn test_model_checking_medium() {
        let model = StackModel::new(vec![1, 2, 3], 8);

        model
            .checker()
            .threads(num_cpus::get())
            .spawn_bfs()
            .join()
            .assert_properties();
    }
}
