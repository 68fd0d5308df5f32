//! Constant-velocity Kalman filter over a single scalar channel.
//!
//! State vector `x = [position, rate]ᵀ`, measurement `z = position`.
//!
//! ```text
//! F = ⎡1  dt⎤     Q = q · ⎡dt⁴/4  dt³/2⎤     H = ⎡1  0⎤
//!     ⎣0   1⎦             ⎣dt³/2  dt²  ⎦
//! ```
//!
//! `q` is the expected acceleration variance and `R` the measurement
//! variance, both per channel via [`KalmanConfig`].

use super::{validate_dt, EstimatorError, ScalarEstimator};

/// Noise characteristics of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanConfig {
    /// Measurement variance R (m²).
    pub measurement_variance: f64,
    /// Expected acceleration variance q ((m/s²)²).
    pub acceleration_variance: f64,
}

impl KalmanConfig {
    /// Default measurement variance (m²).
    pub const DEFAULT_MEASUREMENT_VARIANCE: f64 = 4.0;

    /// Default acceleration variance ((m/s²)²).
    pub const DEFAULT_ACCELERATION_VARIANCE: f64 = 8.0;

    /// Initial rate variance used when the filter is seeded.
    const INITIAL_RATE_VARIANCE: f64 = 100.0;

    pub fn new(measurement_variance: f64, acceleration_variance: f64) -> Self {
        Self {
            measurement_variance,
            acceleration_variance,
        }
    }
}

impl Default for KalmanConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MEASUREMENT_VARIANCE,
            Self::DEFAULT_ACCELERATION_VARIANCE,
        )
    }
}

/// Seeded filter state. Absent until the first finite measurement.
#[derive(Debug, Clone, Copy)]
struct FilterState {
    x: f64,
    v: f64,
    p11: f64,
    p12: f64,
    p21: f64,
    p22: f64,
}

/// Two-state Kalman filter implementing [`ScalarEstimator`].
#[derive(Debug, Clone)]
pub struct KalmanEstimator {
    config: KalmanConfig,
    state: Option<FilterState>,
}

impl KalmanEstimator {
    /// Create an uninitialized filter with the given noise model.
    pub fn new(config: KalmanConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Noise model in use.
    pub fn config(&self) -> &KalmanConfig {
        &self.config
    }

    /// Position variance, or `None` before the first measurement.
    pub fn position_variance(&self) -> Option<f64> {
        self.state.map(|s| s.p11)
    }

    fn seed(&self, z: f64) -> FilterState {
        FilterState {
            x: z,
            v: 0.0,
            p11: self.config.measurement_variance,
            p12: 0.0,
            p21: 0.0,
            p22: KalmanConfig::INITIAL_RATE_VARIANCE,
        }
    }

    fn predict(s: &mut FilterState, dt: f64, q: f64) {
        let dt2 = dt * dt;
        let dt3 = dt2 * dt;
        let dt4 = dt3 * dt;

        s.x += s.v * dt;

        // P = F P Fᵀ + Q
        let p11 = s.p11 + dt * (s.p12 + s.p21) + dt2 * s.p22 + q * dt4 / 4.0;
        let p12 = s.p12 + dt * s.p22 + q * dt3 / 2.0;
        let p21 = s.p21 + dt * s.p22 + q * dt3 / 2.0;
        let p22 = s.p22 + q * dt2;

        s.p11 = p11;
        s.p12 = p12;
        s.p21 = p21;
        s.p22 = p22;
    }

    fn correct(s: &mut FilterState, z: f64, r: f64) {
        let innovation = z - s.x;
        let innovation_variance = s.p11 + r;
        let k1 = s.p11 / innovation_variance;
        let k2 = s.p21 / innovation_variance;

        s.x += k1 * innovation;
        s.v += k2 * innovation;

        // P = (I - K H) P
        let p11 = (1.0 - k1) * s.p11;
        let p12 = (1.0 - k1) * s.p12;
        let p21 = s.p21 - k2 * s.p11;
        let p22 = s.p22 - k2 * s.p12;

        s.p11 = p11;
        s.p12 = p12;
        s.p21 = p21;
        s.p22 = p22;
    }
}

impl Default for KalmanEstimator {
    fn default() -> Self {
        Self::new(KalmanConfig::default())
    }
}

impl ScalarEstimator for KalmanEstimator {
    fn update(&mut self, measurement: f64, dt: f64) -> Result<(), EstimatorError> {
        validate_dt(dt)?;

        let Some(mut state) = self.state else {
            // Nothing to differentiate against yet
            if measurement.is_finite() {
                self.state = Some(self.seed(measurement));
            }
            return Ok(());
        };

        if dt > 0.0 {
            Self::predict(&mut state, dt, self.config.acceleration_variance);
        }
        if measurement.is_finite() {
            Self::correct(&mut state, measurement, self.config.measurement_variance);
        }

        self.state = Some(state);
        Ok(())
    }

    fn position(&self) -> Option<f64> {
        self.state.map(|s| s.x)
    }

    fn rate(&self) -> Option<f64> {
        self.state.map(|s| s.v)
    }
}
