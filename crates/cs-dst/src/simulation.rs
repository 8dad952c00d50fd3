//! Contract-checking simulation of the stack.
//!
//! Each step draws one operation from the workload, applies it to a
//! `TrackedStack`, and checks from the outside that the operation met its
//! contract: the postconditions against values observed before the call,
//! then the stack invariants. Every `check_interval` steps (and at the
//! end) the full property checker replays the recorded history.

use cs_core::{ContractViolation, PropertyChecker, PropertyResult, PropertySummary};
use cs_stack::{StackError, TrackedStack};
use serde::Serialize;
use thiserror::Error;

use crate::ConfigError;
use crate::env::{DstEnv, DstStats};
use crate::workload::StackOp;

/// How long to run and how often to run the full checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationConfig {
    pub steps: u64,
    /// Run the history-replaying property checker every this many steps.
    pub check_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: 1_000,
            check_interval: 50,
        }
    }
}

impl SimulationConfig {
    /// Short runs for quick iteration.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            steps: 100,
            check_interval: 10,
        }
    }

    /// Long runs for CI.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            steps: 10_000,
            check_interval: 500,
        }
    }

    /// # Errors
    ///
    /// `steps` or `check_interval` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        if self.check_interval == 0 {
            return Err(ConfigError::ZeroCheckInterval);
        }
        Ok(())
    }
}

/// A contract broken during simulation, or a run that could not start.
/// Every variant carries the seed.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("DST_SEED={seed}: invalid simulation config: {source}")]
    InvalidConfig { seed: u64, source: ConfigError },

    #[error("DST_SEED={seed} step {step} after {op:?}: {violation}")]
    Invariant {
        seed: u64,
        step: u64,
        op: StackOp,
        violation: ContractViolation,
    },

    #[error("DST_SEED={seed} step {step}: {op:?} broke its contract: {detail}")]
    Postcondition {
        seed: u64,
        step: u64,
        op: StackOp,
        detail: String,
    },

    #[error("DST_SEED={seed} step {step}: {}", .result.format_status())]
    Property {
        seed: u64,
        step: u64,
        result: Box<PropertyResult>,
    },
}

impl SimulationError {
    #[must_use]
    pub fn seed(&self) -> u64 {
        match self {
            SimulationError::InvalidConfig { seed, .. }
            | SimulationError::Invariant { seed, .. }
            | SimulationError::Postcondition { seed, .. }
            | SimulationError::Property { seed, .. } => *seed,
        }
    }
}

/// Outcome of a run in which every contract held.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub steps: u64,
    pub stats: DstStats,
    pub depth_max: usize,
    pub underflows_count: u64,
    pub entries_final: usize,
    pub summary: PropertySummary,
}

/// Run one simulation.
///
/// # Errors
///
/// [`SimulationError::InvalidConfig`] before any step runs, otherwise the
/// first contract, invariant, or property found not to hold.
pub fn simulate(
    env: &mut DstEnv,
    config: &SimulationConfig,
) -> Result<SimulationReport, SimulationError> {
    let seed = env.seed();
    config
        .validate()
        .map_err(|source| SimulationError::InvalidConfig { seed, source })?;

    let mut stack: TrackedStack<u64> = TrackedStack::new();
    let mut depth_max = 0;
    let mut underflows_count = 0;

    for step in 1..=config.steps {
        let op = env.workload().next_op();

        if apply_op(&mut stack, op).map_err(|detail| SimulationError::Postcondition {
            seed,
            step,
            op,
            detail,
        })? {
            underflows_count += 1;
        }

        stack
            .stack()
            .check_invariants()
            .map_err(|violation| SimulationError::Invariant {
                seed,
                step,
                op,
                violation,
            })?;

        depth_max = depth_max.max(stack.size());

        if step % config.check_interval == 0 {
            check_properties(&stack, seed, step)?;
        }
    }

    let summary = check_properties(&stack, seed, config.steps)?;

    Ok(SimulationReport {
        seed,
        steps: config.steps,
        stats: env.stats(),
        depth_max,
        underflows_count,
        entries_final: stack.size(),
        summary,
    })
}

/// Run `iterations` simulations with consecutive seeds starting at
/// `base_seed`, stopping at the first failure.
///
/// # Errors
///
/// [`SimulationError::InvalidConfig`] when `iterations` is zero, otherwise
/// the first failing simulation's error.
pub fn simulate_many(
    base_seed: u64,
    iterations: u64,
    make_env: impl Fn(u64) -> DstEnv,
    config: &SimulationConfig,
) -> Result<Vec<SimulationReport>, SimulationError> {
    if iterations == 0 {
        return Err(SimulationError::InvalidConfig {
            seed: base_seed,
            source: ConfigError::ZeroIterations,
        });
    }

    let mut reports = Vec::new();
    for i in 0..iterations {
        let seed = match base_seed.wrapping_add(i) {
            0 => 1,
            s => s,
        };
        let mut env = make_env(seed);
        reports.push(simulate(&mut env, config)?);
    }
    Ok(reports)
}

fn check_properties(
    stack: &TrackedStack<u64>,
    seed: u64,
    step: u64,
) -> Result<PropertySummary, SimulationError> {
    let summary = stack.checker().with_seed(seed).summary();
    match summary.first_failure() {
        Some(failure) => Err(SimulationError::Property {
            seed,
            step,
            result: Box::new(failure.clone()),
        }),
        None => Ok(summary),
    }
}

/// Apply `op`, checking its postconditions against the state observed
/// before the call. Returns whether the call underflowed.
fn apply_op(stack: &mut TrackedStack<u64>, op: StackOp) -> Result<bool, String> {
    let entries_old = stack.size();
    let head_old = stack.stack().head().copied();

    match op {
        StackOp::Push(x) => {
            stack.push(x);
            if stack.size() != entries_old + 1 {
                return Err(format!("entries {} -> {}", entries_old, stack.size()));
            }
            if stack.stack().head() != Some(&x) {
                return Err(format!("head is {:?}, expected {}", stack.stack().head(), x));
            }
            Ok(false)
        }

        StackOp::Pop => {
            let snapshot = stack.stack().clone();
            match (stack.pop(), head_old) {
                (Ok(v), Some(h)) if v == h && stack.size() == entries_old - 1 => Ok(false),
                (Err(StackError::Underflow), None) if *stack.stack() == snapshot => Ok(true),
                (result, _) => Err(format!(
                    "pop returned {:?} with old(head) = {:?}, entries {} -> {}",
                    result,
                    head_old,
                    entries_old,
                    stack.size()
                )),
            }
        }

        StackOp::Peek => {
            let result = stack.peek().copied();
            if stack.size() != entries_old {
                return Err(format!("peek changed entries {} -> {}", entries_old, stack.size()));
            }
            match (result, head_old) {
                (Ok(v), Some(h)) if v == h => Ok(false),
                (Err(StackError::Underflow), None) => Ok(true),
                (result, _) => Err(format!(
                    "peek returned {:?} with head = {:?}",
                    result, head_old
                )),
            }
        }

        StackOp::RoundTrip(x) => {
            let snapshot = stack.stack().clone();
            stack.push(x);
            let popped = stack.pop();
            if popped != Ok(x) || *stack.stack() != snapshot {
                return Err(format!(
                    "push({}) then pop returned {:?}, entries {} -> {}",
                    x,
                    popped,
                    entries_old,
                    stack.size()
                ));
            }
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::WorkloadConfig;

    #[test]
    fn test_simulation_passes() {
        let mut env = DstEnv::new(12345);
        let report = simulate(&mut env, &SimulationConfig::fast()).unwrap();

        assert_eq!(report.seed, 12345);
        assert_eq!(report.steps, 100);
        assert_eq!(report.stats.workload.total(), 100);
        assert!(report.summary.all_hold());
    }

    #[test]
    fn test_pop_heavy_reaches_underflow() {
        let mut env = DstEnv::with_workload(777, WorkloadConfig::pop_heavy()).unwrap();
        let report = simulate(&mut env, &SimulationConfig::fast()).unwrap();
        assert!(report.underflows_count > 0);
    }

    #[test]
    fn test_push_heavy_grows() {
        let mut env = DstEnv::with_workload(777, WorkloadConfig::push_heavy()).unwrap();
        let report = simulate(&mut env, &SimulationConfig::default()).unwrap();
        assert!(report.depth_max >= report.entries_final);
        assert!(report.entries_final > 0);
    }

    #[test]
    fn test_same_seed_same_report() {
        let a = simulate(&mut DstEnv::new(4242), &SimulationConfig::fast()).unwrap();
        let b = simulate(&mut DstEnv::new(4242), &SimulationConfig::fast()).unwrap();

        assert_eq!(a.depth_max, b.depth_max);
        assert_eq!(a.underflows_count, b.underflows_count);
        assert_eq!(a.entries_final, b.entries_final);
    }

    #[test]
    fn test_simulate_many_uses_consecutive_seeds() {
        let reports =
            simulate_many(100, 5, DstEnv::new, &SimulationConfig::fast()).unwrap();
        let seeds: Vec<u64> = reports.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102, 103, 104]);
    }

    #[test]
    fn test_apply_op_underflow_on_empty() {
        let mut stack = TrackedStack::new();
        assert_eq!(apply_op(&mut stack, StackOp::Pop), Ok(true));
        assert_eq!(apply_op(&mut stack, StackOp::Peek), Ok(true));
        assert_eq!(apply_op(&mut stack, StackOp::Push(3)), Ok(false));
        assert_eq!(apply_op(&mut stack, StackOp::RoundTrip(9)), Ok(false));
        assert_eq!(apply_op(&mut stack, StackOp::Peek), Ok(false));
        assert_eq!(stack.size(), 1);
    }

    #[test]
    fn test_error_carries_seed() {
        let err = SimulationError::Postcondition {
            seed: 31,
            step: 4,
            op: StackOp::Pop,
            detail: "pop returned Ok(1)".to_string(),
        };
        assert_eq!(err.seed(), 31);
        assert!(err.to_string().starts_with("DST_SEED=31 step 4"));
    }

    #[test]
    fn test_zero_check_interval_rejected() {
        let mut env = DstEnv::new(12345);
        let config = SimulationConfig {
            steps: 10,
            check_interval: 0,
        };

        let err = simulate(&mut env, &config).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidConfig {
                seed: 12345,
                source: ConfigError::ZeroCheckInterval
            }
        ));
        assert!(err.to_string().starts_with("DST_SEED=12345"));
        // Rejected before drawing any operation
        assert_eq!(env.stats().workload.total(), 0);
    }

    #[test]
    fn test_zero_steps_rejected() {
        let config = SimulationConfig {
            steps: 0,
            check_interval: 10,
        };
        let err = simulate(&mut DstEnv::new(7), &config).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidConfig {
                source: ConfigError::ZeroSteps,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = simulate_many(100, 0, DstEnv::new, &SimulationConfig::fast()).unwrap_err();
        assert_eq!(err.seed(), 100);
        assert!(matches!(
            err,
            SimulationError::InvalidConfig {
                source: ConfigError::ZeroIterations,
                ..
            }
        ));
    }

    #[test]
    fn test_check_interval_longer_than_run() {
        let config = SimulationConfig {
            steps: 5,
            check_interval: 1_000,
        };
        let report = simulate(&mut DstEnv::new(12345), &config).unwrap();
        assert_eq!(report.steps, 5);
        assert!(report.summary.all_hold());
    }
}
