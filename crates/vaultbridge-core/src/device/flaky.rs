//! Flaky device wrapper for fault injection testing.
//!
//! Randomly fails connection opens and transfers so tests can verify that
//! device failures surface verbatim with a device origin and leave session
//! state intact.

use std::sync::{Arc, Mutex};

use super::{DeviceConnection, DeviceError, StorageDevice};
use crate::chaos::ChaosRng;

/// Device wrapper that randomly injects failures.
///
/// Deterministic with a fixed seed so chaos tests are reproducible. The RNG
/// is shared between the factory and its connections: open failures and
/// transfer failures draw from the same sequence.
#[derive(Clone)]
pub struct FlakyDevice<D: StorageDevice> {
    inner: D,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    rng: Arc<Mutex<ChaosRng>>,
}

impl<D: StorageDevice> FlakyDevice<D> {
    /// Wrap a device with the given failure rate.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0].
    pub fn new(inner: D, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, 0x0F1E_2D3C_4B5A_6978)
    }

    /// Wrap with an explicit seed for reproducible chaos.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0].
    pub fn with_seed(inner: D, failure_rate: f64, seed: u64) -> Self {
        assert!(
            (0.0..=1.0).contains(&failure_rate),
            "failure_rate must be between 0.0 and 1.0, got {failure_rate}"
        );

        Self { inner, failure_rate, rng: Arc::new(Mutex::new(ChaosRng::new(seed))) }
    }

    /// Underlying device (for checking invariants after chaos).
    pub fn inner(&self) -> &D {
        &self.inner
    }

    fn should_fail(&self) -> bool {
        should_fail(&self.rng, self.failure_rate)
    }
}

#[allow(clippy::expect_used)]
fn should_fail(rng: &Arc<Mutex<ChaosRng>>, failure_rate: f64) -> bool {
    rng.lock().expect("ChaosRng mutex poisoned").should_fail(failure_rate)
}

impl<D: StorageDevice> StorageDevice for FlakyDevice<D> {
    type Conn = FlakyConnection<D::Conn>;

    fn open(&self) -> Result<Self::Conn, DeviceError> {
        if self.should_fail() {
            return Err(DeviceError::Unavailable("chaotic failure injection".to_string()));
        }
        Ok(FlakyConnection {
            inner: self.inner.open()?,
            failure_rate: self.failure_rate,
            rng: Arc::clone(&self.rng),
        })
    }
}

/// Connection handed out by [`FlakyDevice`].
#[derive(Debug)]
pub struct FlakyConnection<C: DeviceConnection> {
    inner: C,
    failure_rate: f64,
    rng: Arc<Mutex<ChaosRng>>,
}

impl<C: DeviceConnection> DeviceConnection for FlakyConnection<C> {
    fn write(&mut self, select: u8, offset: u16, data: &[u8]) -> Result<(), DeviceError> {
        if should_fail(&self.rng, self.failure_rate) {
            return Err(DeviceError::Bus("chaotic failure injection".to_string()));
        }
        self.inner.write(select, offset, data)
    }

    fn read(&mut self, select: u8, offset: u16, dest: &mut [u8]) -> Result<usize, DeviceError> {
        if should_fail(&self.rng, self.failure_rate) {
            return Err(DeviceError::Bus("chaotic failure injection".to_string()));
        }
        self.inner.read(select, offset, dest)
    }
}
