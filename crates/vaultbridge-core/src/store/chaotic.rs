//! Chaotic store wrapper for fault injection testing.
//!
//! Delegates to an underlying store but randomly fails operations based on
//! a configured failure rate. Used to verify that store failures surface
//! verbatim and leave session state intact.

use std::sync::{Arc, Mutex};

use super::{SecureStore, StoreError};
use crate::chaos::ChaosRng;

/// Store wrapper that randomly injects failures.
///
/// Deterministic with a fixed seed so chaos tests are reproducible.
#[derive(Clone)]
pub struct ChaoticStore<S: SecureStore> {
    inner: S,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    rng: Arc<Mutex<ChaosRng>>,
}

impl<S: SecureStore> ChaoticStore<S> {
    /// Wrap a store with the given failure rate.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0].
    pub fn new(inner: S, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, 0x1234_5678_9ABC_DEF0)
    }

    /// Wrap with an explicit seed for reproducible chaos.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0].
    pub fn with_seed(inner: S, failure_rate: f64, seed: u64) -> Self {
        assert!(
            (0.0..=1.0).contains(&failure_rate),
            "failure_rate must be between 0.0 and 1.0, got {failure_rate}"
        );

        Self { inner, failure_rate, rng: Arc::new(Mutex::new(ChaosRng::new(seed))) }
    }

    /// Underlying store (for checking invariants after chaos).
    pub fn inner(&self) -> &S {
        &self.inner
    }

    #[allow(clippy::expect_used)]
    fn should_fail(&self) -> bool {
        self.rng.lock().expect("ChaosRng mutex poisoned").should_fail(self.failure_rate)
    }
}

impl<S: SecureStore> SecureStore for ChaoticStore<S> {
    fn write(&self, id: &str, bytes: &[u8], overwrite: bool) -> Result<(), StoreError> {
        if self.should_fail() {
            return Err(StoreError::Io("chaotic failure injection".to_string()));
        }
        self.inner.write(id, bytes, overwrite)
    }

    fn read(&self, id: &str, dest: &mut [u8]) -> Result<usize, StoreError> {
        if self.should_fail() {
            return Err(StoreError::Io("chaotic failure injection".to_string()));
        }
        self.inner.read(id, dest)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        if self.should_fail() {
            return Err(StoreError::Io("chaotic failure injection".to_string()));
        }
        self.inner.delete(id)
    }
}
