//! Single-channel scalar estimators.
//!
//! A [`ScalarEstimator`] turns a stream of noisy scalar measurements, each
//! tagged with the elapsed time since the previous one, into a smoothed
//! position and a derived rate of change. The altimeter owns one estimator
//! per sensor channel; estimators are never shared between channels.
//!
//! # Contract
//!
//! - The first `update` initializes `position = measurement`, `rate = 0`.
//!   Callers pass `dt = 0` for it.
//! - Later updates run a predict-then-correct step over `dt` seconds.
//! - `position()` / `rate()` return `None` until the first update.
//! - A negative `dt` is rejected with [`EstimatorError::InvalidTimeStep`]
//!   and leaves the state unchanged.

mod kalman;

pub use kalman::{KalmanConfig, KalmanEstimator};

use thiserror::Error;

/// Errors raised by estimator updates.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EstimatorError {
    /// Elapsed time was negative or not a number.
    #[error("Invalid time step: dt = {dt} s (must be >= 0)")]
    InvalidTimeStep { dt: f64 },
}

/// A single-channel filter producing position and rate estimates.
pub trait ScalarEstimator: Send {
    /// Feed one measurement taken `dt` seconds after the previous one.
    fn update(&mut self, measurement: f64, dt: f64) -> Result<(), EstimatorError>;

    /// Smoothed position, or `None` before the first measurement.
    fn position(&self) -> Option<f64>;

    /// Rate of change per second, or `None` before the first measurement.
    fn rate(&self) -> Option<f64>;

    /// Whether at least one finite measurement has been absorbed.
    fn is_initialized(&self) -> bool {
        self.position().is_some()
    }
}

/// Check that a time step satisfies the estimator contract.
#[inline]
pub(crate) fn validate_dt(dt: f64) -> Result<(), EstimatorError> {
    // Written as a negated comparison so NaN is rejected too
    if !(dt >= 0.0) {
        return Err(EstimatorError::InvalidTimeStep { dt });
    }
    Ok(())
}
