//! Deterministic RNG for fault injection wrappers.
//!
//! Linear congruential generator so chaos tests are reproducible with the
//! same seed. Shared by the store and device chaos wrappers.

/// Simple deterministic RNG for chaos injection.
#[derive(Debug)]
pub(crate) struct ChaosRng {
    state: u64,
}

impl ChaosRng {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next value in [0.0, 1.0).
    fn next(&mut self) -> f64 {
        // LCG constants from Numerical Recipes
        const A: u64 = 1_664_525;
        const C: u64 = 1_013_904_223;
        const M: u64 = 1u64 << 32;

        self.state = (A.wrapping_mul(self.state).wrapping_add(C)) % M;
        (self.state as f64) / (M as f64)
    }

    /// True with probability `failure_rate`.
    pub(crate) fn should_fail(&mut self, failure_rate: f64) -> bool {
        self.next() < failure_rate
    }
}
