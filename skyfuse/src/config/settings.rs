//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::estimator::KalmanConfig;
use crate::flight::ClassificationPolicy;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Logging settings
    pub logging: LoggingSettings,
    /// Altimeter filter noise settings
    pub altimeter: AltimeterSettings,
    /// Flight phase classifier settings
    pub classifier: ClassifierSettings,
    /// Track replay settings
    pub replay: ReplaySettings,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

/// Noise model for the two altimeter channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltimeterSettings {
    /// Barometer measurement variance (m²)
    pub baro_measurement_variance: f64,
    /// Barometer acceleration variance ((m/s²)²)
    pub baro_acceleration_variance: f64,
    /// GPS altitude measurement variance (m²)
    pub gps_measurement_variance: f64,
    /// GPS altitude acceleration variance ((m/s²)²)
    pub gps_acceleration_variance: f64,
}

impl AltimeterSettings {
    /// Filter configuration for the barometer channel.
    pub fn baro_config(&self) -> KalmanConfig {
        KalmanConfig::new(
            self.baro_measurement_variance,
            self.baro_acceleration_variance,
        )
    }

    /// Filter configuration for the GPS channel.
    pub fn gps_config(&self) -> KalmanConfig {
        KalmanConfig::new(
            self.gps_measurement_variance,
            self.gps_acceleration_variance,
        )
    }
}

/// Classifier configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierSettings {
    /// Where the aerodynamic sustained velocity is substituted
    pub policy: ClassificationPolicy,
}

/// Replay configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplaySettings {
    /// Capacity of the phase change broadcast channel
    pub channel_capacity: usize,
}
