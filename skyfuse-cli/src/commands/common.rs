//! Common types and utilities shared across CLI commands.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use skyfuse::config::ConfigFile;
use skyfuse::flight::ClassificationPolicy;

/// Classification policy selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum PolicyArg {
    /// Aerodynamic sustained velocity only replaces the canopy check
    CanopyOnly,
    /// Sustained velocity drives every airborne rule
    SustainedCascade,
}

impl From<PolicyArg> for ClassificationPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::CanopyOnly => ClassificationPolicy::CanopyOnly,
            PolicyArg::SustainedCascade => ClassificationPolicy::SustainedCascade,
        }
    }
}

/// Resolve the policy: CLI argument first, then config file.
pub fn resolve_policy(arg: Option<PolicyArg>, config: &ConfigFile) -> ClassificationPolicy {
    arg.map(ClassificationPolicy::from)
        .unwrap_or(config.classifier.policy)
}

/// Format an epoch-millisecond timestamp as UTC wall-clock time.
pub fn format_time(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string(),
        None => format!("{} ms", millis),
    }
}

/// Format a duration in seconds as `1h 02m 03.4s`, `2m 03.4s` or `3.4s`.
pub fn format_duration(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "-".to_string();
    }
    let whole = secs as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let seconds = secs - (hours * 3600 + minutes * 60) as f64;

    if hours > 0 {
        format!("{}h {:02}m {:04.1}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:04.1}s", minutes, seconds)
    } else {
        format!("{:.1}s", seconds)
    }
}
