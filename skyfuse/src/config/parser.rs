//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::defaults::{MAX_CHANNEL_CAPACITY, MIN_CHANNEL_CAPACITY};
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    // [altimeter] section
    if let Some(section) = ini.section(Some("altimeter")) {
        if let Some(v) = section.get("baro_measurement_variance") {
            config.altimeter.baro_measurement_variance =
                parse_variance("baro_measurement_variance", v, false)?;
        }
        if let Some(v) = section.get("baro_acceleration_variance") {
            config.altimeter.baro_acceleration_variance =
                parse_variance("baro_acceleration_variance", v, true)?;
        }
        if let Some(v) = section.get("gps_measurement_variance") {
            config.altimeter.gps_measurement_variance =
                parse_variance("gps_measurement_variance", v, false)?;
        }
        if let Some(v) = section.get("gps_acceleration_variance") {
            config.altimeter.gps_acceleration_variance =
                parse_variance("gps_acceleration_variance", v, true)?;
        }
    }

    // [classifier] section
    if let Some(section) = ini.section(Some("classifier")) {
        if let Some(v) = section.get("policy") {
            config.classifier.policy = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "classifier".to_string(),
                key: "policy".to_string(),
                value: v.to_string(),
                reason: "must be 'canopy-only' or 'sustained-cascade'".to_string(),
            })?;
        }
    }

    // [replay] section
    if let Some(section) = ini.section(Some("replay")) {
        if let Some(v) = section.get("channel_capacity") {
            let capacity: usize = v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "replay".to_string(),
                key: "channel_capacity".to_string(),
                value: v.to_string(),
                reason: "must be a positive integer".to_string(),
            })?;
            config.replay.channel_capacity = clamp_channel_capacity(capacity);
        }
    }

    Ok(config)
}

/// Parse a filter variance, rejecting negative and non-finite values.
fn parse_variance(key: &str, value: &str, allow_zero: bool) -> Result<f64, ConfigFileError> {
    let invalid = |reason: &str| ConfigFileError::InvalidValue {
        section: "altimeter".to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| invalid("must be a number"))?;

    if !parsed.is_finite() || parsed < 0.0 {
        return Err(invalid("must be a finite, non-negative number"));
    }
    if parsed == 0.0 && !allow_zero {
        return Err(invalid("must be greater than zero"));
    }
    Ok(parsed)
}

/// Clamps the phase change channel capacity and logs a warning if clamped.
fn clamp_channel_capacity(value: usize) -> usize {
    let clamped = value.clamp(MIN_CHANNEL_CAPACITY, MAX_CHANNEL_CAPACITY);
    if clamped != value {
        tracing::warn!(
            requested = value,
            min = MIN_CHANNEL_CAPACITY,
            max = MAX_CHANNEL_CAPACITY,
            "channel_capacity out of range, clamping to {}",
            clamped
        );
    }
    clamped
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use crate::flight::ClassificationPolicy;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[altimeter]
gps_measurement_variance = 25

[classifier]
policy = sustained-cascade
"#,
        )
        .unwrap();

        // Specified values
        assert_eq!(config.altimeter.gps_measurement_variance, 25.0);
        assert_eq!(
            config.classifier.policy,
            ClassificationPolicy::SustainedCascade
        );

        // Default values
        assert_eq!(
            config.altimeter.baro_measurement_variance,
            DEFAULT_BARO_MEASUREMENT_VARIANCE
        );
        assert_eq!(
            config.replay.channel_capacity,
            ConfigFile::default().replay.channel_capacity
        );
    }

    #[test]
    fn test_invalid_policy() {
        let err = load(
            r#"
[classifier]
policy = hysteresis
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("classifier.policy"));
        assert!(err.to_string().contains("sustained-cascade"));
    }

    #[test]
    fn test_invalid_variance() {
        let err = load(
            r#"
[altimeter]
baro_measurement_variance = loud
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref key, .. } if key == "baro_measurement_variance"
        ));

        assert!(load("[altimeter]\ngps_measurement_variance = -1\n").is_err());
        assert!(load("[altimeter]\ngps_measurement_variance = 0\n").is_err());
        assert!(load("[altimeter]\ngps_measurement_variance = inf\n").is_err());
    }

    #[test]
    fn test_zero_acceleration_variance_allowed() {
        let config = load("[altimeter]\nbaro_acceleration_variance = 0\n").unwrap();

        assert_eq!(config.altimeter.baro_acceleration_variance, 0.0);
    }

    #[test]
    fn test_channel_capacity_clamped() {
        let config = load("[replay]\nchannel_capacity = 0\n").unwrap();
        assert_eq!(config.replay.channel_capacity, MIN_CHANNEL_CAPACITY);

        let config = load("[replay]\nchannel_capacity = 10000000\n").unwrap();
        assert_eq!(config.replay.channel_capacity, MAX_CHANNEL_CAPACITY);

        assert!(load("[replay]\nchannel_capacity = lots\n").is_err());
    }

    #[test]
    fn test_logging_file() {
        let config = load("[logging]\nfile = /tmp/skyfuse-test.log\n").unwrap();
        assert_eq!(config.logging.file, PathBuf::from("/tmp/skyfuse-test.log"));

        // Empty value keeps the default
        let config = load("[logging]\nfile =\n").unwrap();
        assert_eq!(config.logging.file, ConfigFile::default().logging.file);
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/logs/skyfuse.log");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("logs/skyfuse.log"));

        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }
}
