//! Summary statistics over a parsed track.

use std::fmt;

use crate::measurement::FusedLocation;

/// Closed min/max interval. Empty until the first real value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range {
    bounds: Option<(f64, f64)>,
}

impl Range {
    /// Expand to include `value`. NaN is ignored.
    pub fn expand(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(value), max.max(value)),
            None => (value, value),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn min(&self) -> Option<f64> {
        self.bounds.map(|(min, _)| min)
    }

    pub fn max(&self) -> Option<f64> {
        self.bounds.map(|(_, max)| max)
    }

    /// `max - min`, or `None` when empty.
    pub fn span(&self) -> Option<f64> {
        self.bounds.map(|(min, max)| max - min)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bounds {
            Some((min, max)) => write!(f, "{:.1} .. {:.1}", min, max),
            None => write!(f, "-"),
        }
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    fn point(lat: f64, lon: f64) -> Self {
        Self {
            south: lat,
            west: lon,
            north: lat,
            east: lon,
        }
    }

    fn include(&mut self, lat: f64, lon: f64) {
        self.south = self.south.min(lat);
        self.north = self.north.max(lat);
        self.west = self.west.min(lon);
        self.east = self.east.max(lon);
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }
}

/// Track-level statistics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackStats {
    pub sample_count: usize,
    /// Timestamp of the first sample (epoch ms).
    pub start_millis: Option<i64>,
    /// Timestamp of the last sample (epoch ms).
    pub end_millis: Option<i64>,
    pub altitude: Range,
    /// `None` for an empty track.
    pub bounds: Option<LatLngBounds>,
}

impl TrackStats {
    pub fn from_samples(samples: &[FusedLocation]) -> Self {
        let mut stats = Self {
            sample_count: samples.len(),
            start_millis: samples.first().map(|s| s.millis),
            end_millis: samples.last().map(|s| s.millis),
            ..Self::default()
        };

        for sample in samples {
            stats.altitude.expand(sample.altitude);
            match stats.bounds.as_mut() {
                Some(bounds) => bounds.include(sample.latitude, sample.longitude),
                None => {
                    stats.bounds = Some(LatLngBounds::point(sample.latitude, sample.longitude))
                }
            }
        }

        stats
    }

    pub fn is_defined(&self) -> bool {
        self.bounds.is_some()
    }

    /// Elapsed time between first and last sample in seconds.
    pub fn duration_secs(&self) -> Option<f64> {
        match (self.start_millis, self.end_millis) {
            (Some(start), Some(end)) => Some((end - start) as f64 / 1000.0),
            _ => None,
        }
    }
}
