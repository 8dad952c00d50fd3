//! # cs-dst
//!
//! Deterministic Simulation Testing for the contracted stack.
//!
//! A single seed determines the whole operation sequence, so every
//! failure is reproducible. Each step checks the operation's contract,
//! then the stack invariants; the recorded history is periodically
//! replayed through the property checker.
//!
//! ## Usage
//!
//! ```rust
//! use cs_dst::{simulate, DstEnv, SimulationConfig};
//!
//! let mut env = DstEnv::new(12345);
//! let report = simulate(&mut env, &SimulationConfig::fast()).unwrap();
//! assert!(report.summary.all_hold());
//! ```
//!
//! ## Reproducibility
//!
//! ```bash
//! DST_SEED=12345 DST_ITERATIONS=50 cargo test -p cs-dst
//! ```

pub mod env;
pub mod random;
pub mod simulation;
pub mod workload;

use thiserror::Error;

pub use env::{DstEnv, DstStats};
pub use random::DeterministicRng;
pub use simulation::{simulate, simulate_many, SimulationConfig, SimulationError, SimulationReport};
pub use workload::{StackOp, WorkloadConfig, WorkloadGenerator, WorkloadStats};

/// Environment variable holding the seed to replay.
pub const DST_SEED_VAR: &str = "DST_SEED";

/// Environment variable holding the number of simulations to run.
pub const DST_ITERATIONS_VAR: &str = "DST_ITERATIONS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("{name} must be a valid u64, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must not be zero")]
    Zero { name: &'static str },
}

/// A `WorkloadConfig` or `SimulationConfig` that cannot drive a run.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("workload weights are all zero")]
    NoWeights,

    #[error("value_max must be at least 1")]
    EmptyValueRange,

    #[error("steps must be at least 1")]
    ZeroSteps,

    #[error("check_interval must be at least 1")]
    ZeroCheckInterval,

    #[error("iterations must be at least 1")]
    ZeroIterations,
}

/// Read a positive integer from the environment. Unset means `None`.
///
/// # Errors
///
/// The variable is set but is not a positive `u64`.
pub fn env_u64(name: &'static str) -> Result<Option<u64>, EnvError> {
    match std::env::var(name) {
        Ok(s) => match s.trim().parse::<u64>() {
            Ok(0) => Err(EnvError::Zero { name }),
            Ok(n) => Ok(Some(n)),
            Err(_) => Err(EnvError::InvalidNumber { name, value: s }),
        },
        Err(_) => Ok(None),
    }
}

/// Get DST seed from environment or generate random one.
///
/// Prints the seed for reproduction. Use `DST_SEED=<seed>` to reproduce.
///
/// # Panics
///
/// If `DST_SEED` is set to something other than a positive `u64`.
#[must_use]
pub fn get_or_generate_seed() -> u64 {
    match env_u64(DST_SEED_VAR) {
        Ok(Some(seed)) => {
            println!("DST_SEED={} (from environment)", seed);
            seed
        }
        Ok(None) => {
            let seed = rand::random::<u64>().max(1);
            println!("DST_SEED={} (randomly generated)", seed);
            seed
        }
        Err(e) => panic!("{}", e),
    }
}

/// Number of simulations to run: `DST_ITERATIONS` or `default`.
///
/// # Panics
///
/// If `DST_ITERATIONS` is set to something other than a positive `u64`.
#[must_use]
pub fn get_iterations(default: u64) -> u64 {
    match env_u64(DST_ITERATIONS_VAR) {
        Ok(n) => n.unwrap_or(default),
        Err(e) => panic!("{}", e),
    }
}
