//! Record stream parser.
//!
//! Reads a header-described CSV stream and drives one [`AltitudeFusion`]
//! engine. Rows are dispatched on the `sensor` column:
//!
//! | `sensor`            | Row kind          | Effect                                  |
//! |---------------------|-------------------|-----------------------------------------|
//! | absent / past end   | pre-fused device  | Sample taken straight from the row      |
//! | `gps`               | satellite fix     | Fused through the GPS channel, emitted  |
//! | `alt`               | pressure          | Fused through the barometer channel     |
//! | anything else       | other sensor      | Ignored                                 |
//!
//! Unparseable numeric fields become NaN. Rows without a real latitude or
//! longitude are dropped but still feed the altimeter.

use std::io::Read;

use chrono::DateTime;
use csv::{ByteRecord, ReaderBuilder};

use super::error::TrackError;
use super::header::TrackHeader;
use crate::altimeter::AltitudeFusion;
use crate::estimator::{EstimatorError, KalmanEstimator, ScalarEstimator};
use crate::measurement::{FusedLocation, RawPositionSample, RawPressureSample};

const SENSOR_GPS: &str = "gps";
const SENSOR_ALTIMETER: &str = "alt";

/// Result of parsing a record stream.
#[derive(Debug, Default)]
pub struct ParsedTrack {
    /// Fused samples in input order.
    pub samples: Vec<FusedLocation>,

    /// Fix rows that produced no sample (missing position, bad timestamp,
    /// out-of-order time).
    pub dropped_rows: usize,

    /// Error that ended parsing early, if any. Samples before it are kept.
    pub error: Option<TrackError>,
}

impl ParsedTrack {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Converts raw records into fused location samples.
///
/// One parser per stream: the altimeter state it owns is specific to the
/// sequence of records it has seen.
#[derive(Debug, Clone, Default)]
pub struct TrackParser<E: ScalarEstimator = KalmanEstimator> {
    fusion: AltitudeFusion<E>,
}

impl<E: ScalarEstimator> TrackParser<E> {
    /// Create a parser around a fresh fusion engine.
    pub fn new(fusion: AltitudeFusion<E>) -> Self {
        Self { fusion }
    }

    /// The fusion engine state.
    pub fn fusion(&self) -> &AltitudeFusion<E> {
        &self.fusion
    }

    /// Ingest one position sample.
    ///
    /// Pre-fused samples (with a climb rate) bypass the altimeter. Returns
    /// `Ok(None)` when the sample carries no real position.
    pub fn ingest_position(
        &mut self,
        sample: &RawPositionSample,
    ) -> Result<Option<FusedLocation>, EstimatorError> {
        let location = match FusedLocation::from_prefused(sample) {
            Some(location) => location,
            None => self.fusion.on_position(sample)?,
        };
        Ok(sample.has_position().then_some(location))
    }

    /// Ingest one barometer sample. Produces no output on its own.
    pub fn ingest_pressure(&mut self, sample: &RawPressureSample) -> Result<(), EstimatorError> {
        self.fusion.on_pressure(sample)
    }

    /// Parse a full record stream, header row first.
    pub fn parse<R: Read>(mut self, reader: R) -> ParsedTrack {
        let mut csv = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut track = ParsedTrack::default();
        let mut record = ByteRecord::new();

        let header = match csv.read_byte_record(&mut record) {
            Ok(true) => TrackHeader::with_standard_aliases(
                record.iter().map(|name| String::from_utf8_lossy(name).into_owned()),
            ),
            Ok(false) => return track,
            Err(e) => {
                track.error = Some(e.into());
                return track;
            }
        };

        if header.is_empty() {
            tracing::warn!("Track has no header columns, nothing to parse");
            return track;
        }

        let mut ignored_rows = 0usize;

        loop {
            match csv.read_byte_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    track.error = Some(e.into());
                    break;
                }
            }

            let row = Row {
                header: &header,
                record: &record,
            };

            match row.kind() {
                RowKind::Prefused => self.parse_prefused(&row, &mut track),
                RowKind::Gps => self.parse_gps(&row, &mut track),
                RowKind::Altimeter => self.parse_pressure(&row),
                RowKind::Other => ignored_rows += 1,
            }
        }

        tracing::debug!(
            samples = track.samples.len(),
            dropped = track.dropped_rows,
            ignored = ignored_rows,
            complete = track.is_complete(),
            "Parsed track records"
        );

        track
    }

    fn parse_prefused(&mut self, row: &Row<'_>, track: &mut ParsedTrack) {
        // FlySight files carry a units row under the header; its time won't parse
        let millis = match row.timestamp("time") {
            Some(millis) if millis > 0 => millis,
            _ => {
                track.dropped_rows += 1;
                return;
            }
        };

        let sample = RawPositionSample::new(
            millis,
            row.float("lat"),
            row.float("lon"),
            row.float("hMSL"),
            row.float("velN"),
            row.float("velE"),
        )
        .with_climb(-row.float("velD"));

        self.push_position(&sample, row, track);
    }

    fn parse_gps(&mut self, row: &Row<'_>, track: &mut ParsedTrack) {
        let Some(millis) = row.integer("millis") else {
            track.dropped_rows += 1;
            return;
        };

        let sample = RawPositionSample::new(
            millis,
            row.float("lat"),
            row.float("lon"),
            row.float("hMSL"),
            row.float("velN"),
            row.float("velE"),
        );

        self.push_position(&sample, row, track);
    }

    fn parse_pressure(&mut self, row: &Row<'_>) {
        let Some(nanos) = row.integer("nano") else {
            return;
        };

        let sample = RawPressureSample::new(nanos, row.float("pressure"));
        if let Err(e) = self.ingest_pressure(&sample) {
            tracing::warn!(line = row.line(), error = %e, "Skipping barometer record");
        }
    }

    fn push_position(&mut self, sample: &RawPositionSample, row: &Row<'_>, track: &mut ParsedTrack) {
        match self.ingest_position(sample) {
            Ok(Some(location)) => track.samples.push(location),
            Ok(None) => track.dropped_rows += 1,
            Err(e) => {
                tracing::warn!(line = row.line(), error = %e, "Skipping position record");
                track.dropped_rows += 1;
            }
        }
    }
}

/// Parse a record stream with default altimeter settings.
pub fn parse_track<R: Read>(reader: R) -> ParsedTrack {
    TrackParser::<KalmanEstimator>::default().parse(reader)
}

enum RowKind {
    Prefused,
    Gps,
    Altimeter,
    Other,
}

/// One data row viewed through the header.
struct Row<'a> {
    header: &'a TrackHeader,
    record: &'a ByteRecord,
}

impl Row<'_> {
    fn kind(&self) -> RowKind {
        let sensor = self
            .header
            .get("sensor")
            .and_then(|index| self.record.get(index));

        match sensor {
            None => RowKind::Prefused,
            Some(value) if value == SENSOR_GPS.as_bytes() => RowKind::Gps,
            Some(value) if value == SENSOR_ALTIMETER.as_bytes() => RowKind::Altimeter,
            Some(_) => RowKind::Other,
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        let index = self.header.get(name)?;
        let bytes = self.record.get(index)?;
        std::str::from_utf8(bytes).ok().map(str::trim)
    }

    /// Numeric field, NaN if missing or unparseable.
    fn float(&self, name: &str) -> f64 {
        self.field(name)
            .and_then(|value| value.parse::<f64>().ok())
            .unwrap_or(f64::NAN)
    }

    fn integer(&self, name: &str) -> Option<i64> {
        self.field(name)?.parse().ok()
    }

    /// ISO-8601 timestamp field as epoch milliseconds.
    fn timestamp(&self, name: &str) -> Option<i64> {
        let value = self.field(name)?;
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|time| time.timestamp_millis())
    }

    fn line(&self) -> u64 {
        self.record.position().map_or(0, |position| position.line())
    }
}
