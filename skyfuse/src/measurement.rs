//! Measurement types shared by the ingest, fusion and flight modules.
//!
//! - [`RawPositionSample`] - One GPS fix (or pre-fused device record)
//! - [`RawPressureSample`] - One barometer reading
//! - [`FusedLocation`] - Canonical output of the track parser
//! - [`AerodynamicState`] - Lift/drag coefficients from an external motion estimator
//!
//! Numeric fields that were missing or unparseable in the source are carried
//! as `f64::NAN` rather than rejected. Comparisons against NaN are false, which
//! the flight classifier relies on.

/// A single satellite position fix as delivered by a transport or a track file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPositionSample {
    /// Epoch milliseconds.
    pub millis: i64,

    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,

    /// Satellite altitude above mean sea level in meters.
    pub altitude_gps: f64,

    /// Velocity north in m/s (NaN if unknown).
    pub vel_north: f64,

    /// Velocity east in m/s (NaN if unknown).
    pub vel_east: f64,

    /// Climb rate already fused by the producing device, in m/s.
    ///
    /// `Some` only for external devices that fuse their own sensors. When
    /// present the sample bypasses altitude fusion entirely.
    pub climb: Option<f64>,
}

impl RawPositionSample {
    /// Create a satellite fix that still needs altitude fusion.
    pub fn new(
        millis: i64,
        latitude: f64,
        longitude: f64,
        altitude_gps: f64,
        vel_north: f64,
        vel_east: f64,
    ) -> Self {
        Self {
            millis,
            latitude,
            longitude,
            altitude_gps,
            vel_north,
            vel_east,
            climb: None,
        }
    }

    /// Attach a device-fused climb rate.
    pub fn with_climb(mut self, climb: f64) -> Self {
        self.climb = Some(climb);
        self
    }

    /// True when both latitude and longitude are real numbers.
    pub fn has_position(&self) -> bool {
        !self.latitude.is_nan() && !self.longitude.is_nan()
    }
}

/// A single barometer reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPressureSample {
    /// Monotonic sensor timestamp in nanoseconds.
    pub nanos: i64,

    /// Pressure in hPa.
    pub pressure: f64,
}

impl RawPressureSample {
    pub fn new(nanos: i64, pressure: f64) -> Self {
        Self { nanos, pressure }
    }
}

/// A fused location sample.
///
/// `altitude` is the integrated (barometer + GPS) altitude and `climb` the
/// fused vertical rate, positive when ascending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusedLocation {
    /// Epoch milliseconds.
    pub millis: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Integrated altitude in meters.
    pub altitude: f64,
    /// Climb rate in m/s.
    pub climb: f64,
    /// Velocity north in m/s.
    pub vel_north: f64,
    /// Velocity east in m/s.
    pub vel_east: f64,
}

impl FusedLocation {
    /// Horizontal speed magnitude in m/s.
    #[inline]
    pub fn ground_speed(&self) -> f64 {
        self.vel_north.hypot(self.vel_east)
    }

    /// Build a sample straight from a pre-fused device record.
    ///
    /// Returns `None` if the record carries no climb rate.
    pub fn from_prefused(sample: &RawPositionSample) -> Option<Self> {
        let climb = sample.climb?;
        Some(Self {
            millis: sample.millis,
            latitude: sample.latitude,
            longitude: sample.longitude,
            altitude: sample.altitude_gps,
            climb,
            vel_north: sample.vel_north,
            vel_east: sample.vel_east,
        })
    }
}

/// Aerodynamic state predicted by an external motion estimator.
///
/// Only the lift-like (`kl`) and drag-like (`kd`) coefficients are consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AerodynamicState {
    pub kl: f64,
    pub kd: f64,
    /// Epoch milliseconds this state is valid for.
    pub millis: i64,
}

impl AerodynamicState {
    pub fn new(kl: f64, kd: f64, millis: i64) -> Self {
        Self { kl, kd, millis }
    }

    /// Derive the sustained velocity pair from the lift/drag coefficients.
    ///
    /// ```text
    /// power    = (kl² + kd²) ^ 0.75
    /// forward  =  kl / power
    /// vertical = -kd / power
    /// ```
    ///
    /// A zero power produces NaN (or infinite) components, which the
    /// classifier then treats as failing every threshold.
    pub fn sustained_velocity(&self) -> SustainedVelocity {
        let power = (self.kl * self.kl + self.kd * self.kd).powf(0.75);
        SustainedVelocity {
            forward: self.kl / power,
            vertical: -self.kd / power,
        }
    }
}

/// Sustained horizontal/vertical velocity from the aerodynamic model (m/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SustainedVelocity {
    pub forward: f64,
    pub vertical: f64,
}
