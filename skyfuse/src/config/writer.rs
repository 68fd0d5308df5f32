//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[logging]
; Log file path (cleared at the start of every session)
file = {}

[altimeter]
; Kalman filter noise model per channel.
; measurement_variance  - sensor noise in m² (must be > 0)
; acceleration_variance - expected vertical acceleration in (m/s²)² (>= 0)
; Larger measurement variance smooths more; larger acceleration variance
; follows changes in climb rate faster.
baro_measurement_variance = {}
baro_acceleration_variance = {}
gps_measurement_variance = {}
gps_acceleration_variance = {}

[classifier]
; Where the aerodynamic sustained velocity replaces the measured velocity:
;   canopy-only       - canopy rule only (default)
;   sustained-cascade - every airborne rule; ground rules stay on measured velocity
policy = {}

[replay]
; Capacity of the phase change broadcast channel (1 - 65536)
channel_capacity = {}
"#,
        path_to_string(&config.logging.file),
        config.altimeter.baro_measurement_variance,
        config.altimeter.baro_acceleration_variance,
        config.altimeter.gps_measurement_variance,
        config.altimeter.gps_acceleration_variance,
        config.classifier.policy,
        config.replay.channel_capacity,
    )
}

/// Render a path, collapsing the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
