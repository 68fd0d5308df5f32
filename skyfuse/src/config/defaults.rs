//! Default values and constants for all configuration settings.

use super::settings::*;
use crate::flight::{ClassificationPolicy, DEFAULT_CHANNEL_CAPACITY};

// =============================================================================
// Altimeter
// =============================================================================

/// Barometer noise is around a meter once warmed up.
pub const DEFAULT_BARO_MEASUREMENT_VARIANCE: f64 = 1.0;

pub const DEFAULT_BARO_ACCELERATION_VARIANCE: f64 = 8.0;

/// GPS vertical accuracy is several meters at best.
pub const DEFAULT_GPS_MEASUREMENT_VARIANCE: f64 = 16.0;

pub const DEFAULT_GPS_ACCELERATION_VARIANCE: f64 = 8.0;

// =============================================================================
// Replay
// =============================================================================

/// Smallest accepted broadcast channel capacity.
pub const MIN_CHANNEL_CAPACITY: usize = 1;

/// Largest accepted broadcast channel capacity.
pub const MAX_CHANNEL_CAPACITY: usize = 65_536;

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "skyfuse.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE_NAME),
            },
            altimeter: AltimeterSettings::default(),
            classifier: ClassifierSettings {
                policy: ClassificationPolicy::default(),
            },
            replay: ReplaySettings {
                channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            },
        }
    }
}

impl Default for AltimeterSettings {
    fn default() -> Self {
        Self {
            baro_measurement_variance: DEFAULT_BARO_MEASUREMENT_VARIANCE,
            baro_acceleration_variance: DEFAULT_BARO_ACCELERATION_VARIANCE,
            gps_measurement_variance: DEFAULT_GPS_MEASUREMENT_VARIANCE,
            gps_acceleration_variance: DEFAULT_GPS_ACCELERATION_VARIANCE,
        }
    }
}
