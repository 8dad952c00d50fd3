//! Deterministic workload generation.
//!
//! A workload is a weighted mix of stack operations:
//! - `Push(v)` with a random value
//! - `Pop`, which underflows when the stack is empty
//! - `Peek`, which underflows when the stack is empty
//! - `RoundTrip(v)`, a push immediately followed by a pop

use serde::Serialize;

use crate::ConfigError;
use crate::random::DeterministicRng;

/// One operation drawn from a workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StackOp {
    Push(u64),
    Pop,
    Peek,
    RoundTrip(u64),
}

/// Relative weights of each operation kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkloadConfig {
    pub push_weight: u32,
    pub pop_weight: u32,
    pub peek_weight: u32,
    pub round_trip_weight: u32,
    /// Values are drawn from `1..=value_max`. Small ranges produce duplicates.
    pub value_max: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            push_weight: 4,
            pop_weight: 3,
            peek_weight: 2,
            round_trip_weight: 1,
            value_max: 1_000,
        }
    }
}

impl WorkloadConfig {
    /// Equal weights.
    #[must_use]
    pub fn balanced() -> Self {
        Self {
            push_weight: 1,
            pop_weight: 1,
            peek_weight: 1,
            round_trip_weight: 1,
            ..Default::default()
        }
    }

    /// Mostly pushes; grows deep stacks.
    #[must_use]
    pub fn push_heavy() -> Self {
        Self {
            push_weight: 6,
            pop_weight: 2,
            peek_weight: 1,
            round_trip_weight: 1,
            ..Default::default()
        }
    }

    /// Mostly pops; spends much of its time at underflow.
    #[must_use]
    pub fn pop_heavy() -> Self {
        Self {
            push_weight: 2,
            pop_weight: 6,
            peek_weight: 1,
            round_trip_weight: 1,
            value_max: 8,
        }
    }

    /// Preset by name, for the runner.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "balanced" => Some(Self::balanced()),
            "push-heavy" => Some(Self::push_heavy()),
            "pop-heavy" => Some(Self::pop_heavy()),
            _ => None,
        }
    }

    /// Sum of the weights. Computed in `u64` so it cannot overflow.
    #[must_use]
    pub fn weight_total(&self) -> u64 {
        u64::from(self.push_weight)
            + u64::from(self.pop_weight)
            + u64::from(self.peek_weight)
            + u64::from(self.round_trip_weight)
    }

    /// # Errors
    ///
    /// All weights are zero, or `value_max` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weight_total() == 0 {
            return Err(ConfigError::NoWeights);
        }
        if self.value_max == 0 {
            return Err(ConfigError::EmptyValueRange);
        }
        Ok(())
    }
}

/// Counts of generated operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkloadStats {
    pub pushes_count: u64,
    pub pops_count: u64,
    pub peeks_count: u64,
    pub round_trips_count: u64,
}

impl WorkloadStats {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.pushes_count + self.pops_count + self.peeks_count + self.round_trips_count
    }
}

/// Draws operations according to a `WorkloadConfig`.
pub struct WorkloadGenerator {
    rng: DeterministicRng,
    config: WorkloadConfig,
    stats: WorkloadStats,
}

impl WorkloadGenerator {
    /// # Errors
    ///
    /// The config has no weights or an empty value range.
    pub fn new(rng: DeterministicRng, config: WorkloadConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            rng,
            config,
            stats: WorkloadStats::default(),
        })
    }

    /// The default config always validates.
    pub(crate) fn with_default_config(rng: DeterministicRng) -> Self {
        Self {
            rng,
            config: WorkloadConfig::default(),
            stats: WorkloadStats::default(),
        }
    }

    /// Random values drawn so far.
    #[must_use]
    pub fn rng_calls(&self) -> u64 {
        self.rng.calls_count()
    }

    fn value(&mut self) -> u64 {
        self.rng.gen_range(1..=self.config.value_max)
    }

    /// Draw the next operation.
    pub fn next_op(&mut self) -> StackOp {
        let c = &self.config;
        let mut pick = self.rng.gen_range(0..c.weight_total());

        if pick < u64::from(c.push_weight) {
            self.stats.pushes_count += 1;
            return StackOp::Push(self.value());
        }
        pick -= u64::from(c.push_weight);

        if pick < u64::from(c.pop_weight) {
            self.stats.pops_count += 1;
            return StackOp::Pop;
        }
        pick -= u64::from(c.pop_weight);

        if pick < u64::from(c.peek_weight) {
            self.stats.peeks_count += 1;
            return StackOp::Peek;
        }

        self.stats.round_trips_count += 1;
        StackOp::RoundTrip(self.value())
    }

    #[must_use]
    pub fn stats(&self) -> WorkloadStats {
        self.stats
    }
}
