//! Counterexamples: the steps that lead to a property violation.
//!
//! A counterexample carries the DST seed (when one produced it) so the
//! run can be replayed with `DST_SEED=<seed>`.

use serde::Serialize;

/// Snapshot of observable state at one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub step: u64,
    pub description: String,
    /// Named variables, rendered with `Debug`.
    pub variables: Vec<(String, String)>,
}

/// Reproduction trace for a failed property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Counterexample {
    pub dst_seed: Option<u64>,
    pub states: Vec<StateSnapshot>,
}

impl Counterexample {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dst_seed: None,
            states: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            dst_seed: Some(seed),
            states: Vec::new(),
        }
    }

    pub fn add_state(&mut self, state: StateSnapshot) {
        debug_assert!(
            self.states.last().map_or(true, |last| last.step <= state.step),
            "States must be added in step order"
        );
        self.states.push(state);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Render as a vertical step diagram.
    ///
    /// ```text
    /// DST_SEED=42
    /// [step 3] pop returned 1, expected 2
    ///   | contents = [1]
    /// ```
    #[must_use]
    pub fn render_diagram(&self) -> String {
        let mut out = String::new();

        if let Some(seed) = self.dst_seed {
            out.push_str(&format!("DST_SEED={}\n", seed));
        }

        for state in &self.states {
            out.push_str(&format!("[step {}] {}\n", state.step, state.description));
            for (name, value) in &state.variables {
                out.push_str(&format!("  | {} = {}\n", name, value));
            }
        }

        out
    }
}
