//! Barometer + GPS altitude fusion.
//!
//! The two channels sample at different, usually unaligned rates and are
//! referenced differently (pressure altitude vs. height above MSL). The
//! fusion engine smooths each channel independently and reconciles them with
//! a single additive offset captured when the second channel comes online.
//! The offset is frozen for the rest of the session.
//!
//! Between barometer samples the integrated altitude holds the barometer's
//! last estimate, so it may lag a faster GPS channel. This is accepted.

use super::pressure::pressure_to_altitude;
use crate::config::AltimeterSettings;
use crate::estimator::{EstimatorError, KalmanConfig, KalmanEstimator, ScalarEstimator};
use crate::measurement::{FusedLocation, RawPositionSample, RawPressureSample};

const MILLIS_TO_SECS: f64 = 1e-3;
const NANOS_TO_SECS: f64 = 1e-9;

/// Altitude and climb produced for one satellite fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusedAltitude {
    /// Integrated altitude in meters.
    pub altitude: f64,
    /// Climb rate in m/s (NaN when neither channel can provide one).
    pub climb: f64,
}

/// Two-channel altitude fusion engine.
///
/// Owns one estimator per channel. Each channel must be fed from a single
/// sequential source; the engine itself is not shared across threads.
#[derive(Debug, Clone)]
pub struct AltitudeFusion<E: ScalarEstimator = KalmanEstimator> {
    baro: E,
    gps: E,
    /// GPS altitude minus pressure altitude, set once.
    offset: Option<f64>,
    /// Last barometer timestamp; `Some` once the channel has been updated.
    last_baro_nanos: Option<i64>,
    /// Last GPS timestamp; `Some` once the channel has been updated.
    last_gps_millis: Option<i64>,
}

impl AltitudeFusion<KalmanEstimator> {
    /// Create a fusion engine with Kalman estimators for both channels.
    pub fn with_configs(baro: KalmanConfig, gps: KalmanConfig) -> Self {
        Self::new(KalmanEstimator::new(baro), KalmanEstimator::new(gps))
    }

    /// Create a fusion engine from the configured noise model.
    pub fn from_settings(settings: &AltimeterSettings) -> Self {
        Self::with_configs(settings.baro_config(), settings.gps_config())
    }
}

impl<E: ScalarEstimator + Default> Default for AltitudeFusion<E> {
    fn default() -> Self {
        Self::new(E::default(), E::default())
    }
}

impl<E: ScalarEstimator> AltitudeFusion<E> {
    /// Create a fusion engine from two fresh estimators.
    pub fn new(baro: E, gps: E) -> Self {
        Self {
            baro,
            gps,
            offset: None,
            last_baro_nanos: None,
            last_gps_millis: None,
        }
    }

    /// The frozen barometer-to-GPS offset, if captured.
    pub fn offset(&self) -> Option<f64> {
        self.offset
    }

    /// Whether the barometer channel has received a sample.
    pub fn baro_initialized(&self) -> bool {
        self.last_baro_nanos.is_some()
    }

    /// Whether the GPS channel has received a sample.
    pub fn gps_initialized(&self) -> bool {
        self.last_gps_millis.is_some()
    }

    /// Barometer channel estimator.
    pub fn baro(&self) -> &E {
        &self.baro
    }

    /// GPS channel estimator.
    pub fn gps(&self) -> &E {
        &self.gps
    }

    /// Feed a satellite altitude sample and return the fused altitude.
    ///
    /// If the barometer is already running and this is the first GPS sample,
    /// the offset is captured from the raw (unsmoothed) GPS altitude.
    pub fn on_gps_altitude(
        &mut self,
        altitude: f64,
        millis: i64,
    ) -> Result<FusedAltitude, EstimatorError> {
        let dt = self
            .last_gps_millis
            .map_or(0.0, |last| (millis - last) as f64 * MILLIS_TO_SECS);
        self.gps.update(altitude, dt)?;

        let baro_initialized = self.baro_initialized();
        let gps_initialized = self.gps_initialized();

        if baro_initialized && !gps_initialized && altitude.is_finite() {
            if let Some(baro_altitude) = self.baro.position() {
                self.capture_offset(altitude - baro_altitude, "gps");
            }
        }

        let integrated = match (self.baro.position(), self.offset) {
            (Some(baro_altitude), Some(offset)) if baro_initialized && gps_initialized => {
                baro_altitude + offset
            }
            _ => altitude,
        };

        let climb = self
            .baro
            .rate()
            .or_else(|| self.gps.rate())
            .unwrap_or(f64::NAN);

        self.last_gps_millis = Some(millis);

        Ok(FusedAltitude {
            altitude: integrated,
            climb,
        })
    }

    /// Feed a satellite fix and build the fused location sample.
    pub fn on_position(
        &mut self,
        sample: &RawPositionSample,
    ) -> Result<FusedLocation, EstimatorError> {
        let fused = self.on_gps_altitude(sample.altitude_gps, sample.millis)?;
        Ok(FusedLocation {
            millis: sample.millis,
            latitude: sample.latitude,
            longitude: sample.longitude,
            altitude: fused.altitude,
            climb: fused.climb,
            vel_north: sample.vel_north,
            vel_east: sample.vel_east,
        })
    }

    /// Feed a barometer reading (hPa).
    pub fn on_pressure(&mut self, sample: &RawPressureSample) -> Result<(), EstimatorError> {
        self.on_pressure_altitude(pressure_to_altitude(sample.pressure), sample.nanos)
    }

    /// Feed an already converted pressure altitude.
    ///
    /// If GPS is already running and this is the first barometer sample, the
    /// offset is captured from the smoothed GPS estimate.
    pub fn on_pressure_altitude(
        &mut self,
        pressure_altitude: f64,
        nanos: i64,
    ) -> Result<(), EstimatorError> {
        let dt = self
            .last_baro_nanos
            .map_or(0.0, |last| (nanos - last) as f64 * NANOS_TO_SECS);
        self.baro.update(pressure_altitude, dt)?;

        if !self.baro_initialized() && self.gps_initialized() {
            if let (Some(gps_altitude), Some(baro_altitude)) =
                (self.gps.position(), self.baro.position())
            {
                self.capture_offset(gps_altitude - baro_altitude, "baro");
            }
        }

        self.last_baro_nanos = Some(nanos);
        Ok(())
    }

    fn capture_offset(&mut self, offset: f64, trigger: &'static str) {
        if self.offset.is_some() {
            return;
        }
        tracing::debug!(offset, trigger, "Captured barometer altitude offset");
        self.offset = Some(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::altimeter::PRESSURE_STANDARD_ATMOSPHERE;

    fn engine() -> AltitudeFusion {
        AltitudeFusion::default()
    }

    #[test]
    fn test_gps_only_passes_raw_altitude_through() {
        let mut fusion = engine();

        let first = fusion.on_gps_altitude(1500.0, 0).unwrap();
        assert_eq!(first.altitude, 1500.0);
        assert_eq!(first.climb, 0.0);

        let second = fusion.on_gps_altitude(1490.0, 1000).unwrap();
        assert_eq!(second.altitude, 1490.0);
        assert!(second.climb < 0.0, "Climb comes from the GPS filter");
        assert!(fusion.offset().is_none());
    }

    #[test]
    fn test_trace_gps_then_baro() {
        let mut fusion = engine();

        // Satellite 100 m at t=0, barometer not yet running
        let fused = fusion.on_gps_altitude(100.0, 0).unwrap();
        assert_eq!(fused.altitude, 100.0);

        // First barometer sample: offset from the smoothed GPS estimate
        fusion.on_pressure_altitude(98.0, 0).unwrap();
        assert_eq!(fusion.offset(), Some(2.0));

        // GPS jumps but the barometer has not moved: integrated altitude holds
        let fused = fusion.on_gps_altitude(105.0, 1000).unwrap();
        assert_eq!(fused.altitude, 100.0);
    }

    #[test]
    fn test_trace_baro_then_gps_uses_raw_gps() {
        let mut fusion = engine();
        fusion.on_pressure_altitude(500.0, 0).unwrap();

        // First GPS sample captures offset from the raw value
        let fused = fusion.on_gps_altitude(620.0, 0).unwrap();
        assert_eq!(fusion.offset(), Some(120.0));
        // Integration only starts once both channels were initialized before the sample
        assert_eq!(fused.altitude, 620.0);

        let fused = fusion.on_gps_altitude(640.0, 1000).unwrap();
        assert_eq!(fused.altitude, 620.0);
    }

    #[test]
    fn test_offset_is_frozen() {
        let mut fusion = engine();
        fusion.on_gps_altitude(100.0, 0).unwrap();
        fusion.on_pressure_altitude(98.0, 0).unwrap();
        let offset = fusion.offset();

        for (i, alt) in [5000.0, -300.0, 42.0, 1e6].iter().enumerate() {
            fusion.on_gps_altitude(*alt, (i as i64 + 1) * 200).unwrap();
            fusion
                .on_pressure_altitude(98.0 + i as f64, (i as i64 + 1) * 100_000_000)
                .unwrap();
        }

        assert_eq!(fusion.offset(), offset);
    }

    #[test]
    fn test_climb_prefers_barometer() {
        let mut fusion = engine();
        fusion.on_gps_altitude(3000.0, 0).unwrap();

        // Barometer falling 50 m/s at 10 Hz, GPS holding still
        for i in 0..100 {
            fusion
                .on_pressure_altitude(2990.0 - i as f64 * 5.0, i * 100_000_000)
                .unwrap();
        }
        let fused = fusion.on_gps_altitude(3000.0, 10_000).unwrap();

        assert!(fused.climb < -40.0, "climb = {}", fused.climb);
    }

    #[test]
    fn test_pressure_sample_converted() {
        let mut fusion = engine();
        fusion
            .on_pressure(&RawPressureSample::new(0, PRESSURE_STANDARD_ATMOSPHERE))
            .unwrap();

        assert!(fusion.baro_initialized());
        assert!(fusion.baro().position().unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_backwards_timestamp_rejected_without_side_effects() {
        let mut fusion = engine();
        fusion.on_gps_altitude(100.0, 5000).unwrap();

        let result = fusion.on_gps_altitude(200.0, 4000);

        assert!(result.is_err());
        assert_eq!(fusion.gps().position(), Some(100.0));
        // Next in-order sample still measures dt from 5000
        assert!(fusion.on_gps_altitude(101.0, 6000).is_ok());
    }

    #[test]
    fn test_nan_gps_altitude_does_not_capture_offset() {
        let mut fusion = engine();
        fusion.on_pressure_altitude(500.0, 0).unwrap();

        let fused = fusion.on_gps_altitude(f64::NAN, 0).unwrap();

        assert!(fused.altitude.is_nan());
        assert!(fusion.offset().is_none());
        // Barometer climb is still reported
        assert_eq!(fused.climb, 0.0);
    }

    #[test]
    fn test_on_position_builds_location() {
        let mut fusion = engine();
        let fix = RawPositionSample::new(1_700_000_000_000, 47.1, 8.2, 4000.0, 3.0, 4.0);

        let loc = fusion.on_position(&fix).unwrap();

        assert_eq!(loc.millis, fix.millis);
        assert_eq!(loc.latitude, 47.1);
        assert_eq!(loc.altitude, 4000.0);
        assert!((loc.ground_speed() - 5.0).abs() < 1e-12);
    }
}
