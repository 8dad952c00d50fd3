//! DST environment: one seed, every source of randomness derived from it.

use std::fmt;

use serde::Serialize;

use crate::ConfigError;
use crate::random::DeterministicRng;
use crate::workload::{WorkloadConfig, WorkloadGenerator, WorkloadStats};

/// Complete DST environment.
///
/// Given the same seed and workload config, the generated operation
/// sequence is identical.
///
/// ```rust
/// use cs_dst::{DstEnv, StackOp};
///
/// let mut env = DstEnv::new(12345);
/// let op: StackOp = env.workload().next_op();
/// # let _ = op;
/// ```
pub struct DstEnv {
    seed: u64,
    workload: WorkloadGenerator,
}

impl DstEnv {
    /// Create with the default workload.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        debug_assert!(seed != 0, "Seed should not be zero");

        let mut master_rng = DeterministicRng::new(seed);
        let workload = WorkloadGenerator::with_default_config(master_rng.fork());

        Self { seed, workload }
    }

    /// Create with a custom workload.
    ///
    /// # Errors
    ///
    /// The config cannot drive a workload (see [`WorkloadConfig::validate`]).
    pub fn with_workload(seed: u64, config: WorkloadConfig) -> Result<Self, ConfigError> {
        debug_assert!(seed != 0, "Seed should not be zero");

        let mut master_rng = DeterministicRng::new(seed);
        let workload = WorkloadGenerator::new(master_rng.fork(), config)?;

        Ok(Self { seed, workload })
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn workload(&mut self) -> &mut WorkloadGenerator {
        &mut self.workload
    }

    #[must_use]
    pub fn stats(&self) -> DstStats {
        DstStats {
            seed: self.seed,
            rng_calls: self.workload.rng_calls(),
            workload: self.workload.stats(),
        }
    }
}

/// Statistics about DST execution.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DstStats {
    pub seed: u64,
    pub rng_calls: u64,
    pub workload: WorkloadStats,
}

impl fmt::Display for DstStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DST_SEED={} ops={} pushes={} pops={} peeks={} round_trips={}",
            self.seed,
            self.workload.total(),
            self.workload.pushes_count,
            self.workload.pops_count,
            self.workload.peeks_count,
            self.workload.round_trips_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut env1 = DstEnv::new(42);
        let mut env2 = DstEnv::new(42);

        for _ in 0..100 {
            assert_eq!(env1.workload().next_op(), env2.workload().next_op());
        }
    }

    #[test]
    fn test_new_matches_default_workload() {
        let mut env1 = DstEnv::new(42);
        let mut env2 = DstEnv::with_workload(42, WorkloadConfig::default()).unwrap();

        for _ in 0..20 {
            assert_eq!(env1.workload().next_op(), env2.workload().next_op());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut env1 = DstEnv::new(42);
        let mut env2 = DstEnv::new(43);

        let ops1: Vec<_> = (0..20).map(|_| env1.workload().next_op()).collect();
        let ops2: Vec<_> = (0..20).map(|_| env2.workload().next_op()).collect();
        assert_ne!(ops1, ops2);
    }

    #[test]
    fn test_stats_display() {
        let mut env = DstEnv::with_workload(12345, WorkloadConfig::balanced()).unwrap();
        for _ in 0..10 {
            env.workload().next_op();
        }

        let stats = env.stats();
        assert_eq!(stats.workload.total(), 10);
        assert!(stats.rng_calls >= 10);
        assert!(stats.to_string().starts_with("DST_SEED=12345 ops=10"));
    }

    #[test]
    fn test_invalid_workload_rejected() {
        let config = WorkloadConfig {
            value_max: 0,
            ..WorkloadConfig::default()
        };
        assert_eq!(
            DstEnv::with_workload(12345, config).err(),
            Some(ConfigError::EmptyValueRange)
        );
    }
}
