//! Deterministic random number generation.
//!
//! A seeded Xoshiro256** generator: the same seed always yields the same
//! operation sequence, so any failing run can be replayed.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Seeded random number generator with call accounting.
///
/// # Example
///
/// ```rust
/// use cs_dst::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(12345);
/// let a: u64 = rng.gen();
///
/// let mut replay = DeterministicRng::new(12345);
/// assert_eq!(replay.gen::<u64>(), a);
/// ```
pub struct DeterministicRng {
    rng: Xoshiro256StarStar,
    calls_count: u64,
}

/// Calls beyond this almost certainly mean a runaway loop.
const RNG_CALLS_WARNING_THRESHOLD: u64 = 1_000_000_000;

impl DeterministicRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        debug_assert!(seed != 0, "Seed should not be zero for better randomness");

        Self {
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            calls_count: 0,
        }
    }

    /// Number of values drawn since creation.
    #[must_use]
    pub fn calls_count(&self) -> u64 {
        self.calls_count
    }

    fn count_call(&mut self) {
        self.calls_count += 1;
        debug_assert!(
            self.calls_count < RNG_CALLS_WARNING_THRESHOLD,
            "Very high number of RNG calls - possible infinite loop"
        );
    }

    pub fn gen<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.count_call();
        self.rng.gen()
    }

    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.count_call();
        self.rng.gen_range(range)
    }

    /// Derive an independent generator, e.g. one per workload.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        let mut seed = self.gen::<u64>();
        if seed == 0 {
            seed = 1;
        }
        Self::new(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = DeterministicRng::new(42);
        let mut rng2 = DeterministicRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = DeterministicRng::new(42);
        let mut rng2 = DeterministicRng::new(43);

        let seq1: Vec<u64> = (0..10).map(|_| rng1.gen()).collect();
        let seq2: Vec<u64> = (0..10).map(|_| rng2.gen()).collect();
        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_gen_range() {
        let mut rng = DeterministicRng::new(12345);
        for _ in 0..100 {
            let val = rng.gen_range(1..=8u64);
            assert!((1..=8).contains(&val));
        }
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(12345);
        let mut forked1 = rng1.fork();
        let mut forked2 = rng2.fork();

        for _ in 0..20 {
            assert_eq!(forked1.gen::<u64>(), forked2.gen::<u64>());
        }
        assert_eq!(forked1.calls_count(), 20);
        // Forking draws one value from the parent
        assert_eq!(rng1.calls_count(), 1);
    }

    #[test]
    fn test_calls_count() {
        let mut rng = DeterministicRng::new(12345);
        let _: u64 = rng.gen();
        let _ = rng.gen_range(0..10);
        assert_eq!(rng.calls_count(), 2);
    }
}
