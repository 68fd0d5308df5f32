//! Track ingestion.
//!
//! Turns recorded (or live) position and pressure records into a sequence of
//! [`FusedLocation`](crate::measurement::FusedLocation) samples.
//!
//! # Components
//!
//! - [`TrackHeader`] - Column lookup with legacy aliases
//! - [`TrackParser`] - Row dispatch and altitude fusion
//! - [`TrackFileReader`] - File access, plain or gzip by suffix
//! - [`TrackStats`] - Altitude range and geographic bounds
//!
//! # Error handling
//!
//! Reading never fails outright. I/O and decompression failures end the
//! stream early; they are logged and the samples parsed so far are kept.
//!
//! # Usage
//!
//! ```ignore
//! use skyfuse::track::{TrackFileReader, TrackStats};
//!
//! let samples = TrackFileReader::new("track.csv.gz").read();
//! let stats = TrackStats::from_samples(&samples);
//! println!("{} samples, altitude {}", stats.sample_count, stats.altitude);
//! ```

mod error;
mod header;
mod parser;
mod reader;
mod stats;

pub use error::TrackError;
pub use header::TrackHeader;
pub use parser::{parse_track, ParsedTrack, TrackParser};
pub use reader::TrackFileReader;
pub use stats::{LatLngBounds, Range, TrackStats};
