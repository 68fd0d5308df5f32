//! Track file reader with transparent gzip support.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use super::error::TrackError;
use super::parser::{ParsedTrack, TrackParser};
use crate::estimator::{KalmanEstimator, ScalarEstimator};
use crate::measurement::FusedLocation;

/// Reads fused samples from a track file on disk.
///
/// Files whose name ends in `.gz` are decompressed on the fly; the record
/// format is identical either way.
#[derive(Debug, Clone)]
pub struct TrackFileReader {
    path: PathBuf,
}

impl TrackFileReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file is read through a gzip decoder.
    pub fn is_gzip(&self) -> bool {
        self.path.extension().is_some_and(|ext| ext == "gz")
    }

    /// Load all samples with default altimeter settings.
    ///
    /// Failures are logged and the samples parsed before them returned.
    pub fn read(&self) -> Vec<FusedLocation> {
        self.read_with(TrackParser::<KalmanEstimator>::default())
            .samples
    }

    /// Load samples through a caller-configured parser.
    ///
    /// Never fails outright: an open or read error is logged and reported in
    /// [`ParsedTrack::error`] alongside whatever was parsed.
    pub fn read_with<E: ScalarEstimator>(&self, parser: TrackParser<E>) -> ParsedTrack {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(source) => {
                let error = TrackError::Open {
                    path: self.path.clone(),
                    source,
                };
                tracing::error!(path = %self.path.display(), error = %error, "Failed to open track file");
                return ParsedTrack {
                    error: Some(error),
                    ..ParsedTrack::default()
                };
            }
        };

        let reader: Box<dyn Read> = if self.is_gzip() {
            tracing::debug!(path = %self.path.display(), "Reading gzip compressed track");
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        let track = parser.parse(reader);

        match &track.error {
            Some(error) if error.is_truncated() => {
                tracing::error!(
                    path = %self.path.display(),
                    samples = track.samples.len(),
                    "Premature end of track file"
                );
            }
            Some(error) => {
                tracing::error!(
                    path = %self.path.display(),
                    samples = track.samples.len(),
                    error = %error,
                    "Error reading track data"
                );
            }
            None => {
                tracing::info!(
                    path = %self.path.display(),
                    samples = track.samples.len(),
                    dropped = track.dropped_rows,
                    "Loaded track file"
                );
            }
        }

        track
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    const TRACK: &str = "\
millis,sensor,lat,lon,hMSL,velN,velE,nano,pressure
0,gps,47.0,8.0,1000.0,10.0,0.0,,
0,alt,,,,,,0,900.0
1000,gps,47.001,8.0,1000.0,10.0,0.0,,
2000,gps,47.002,8.0,1000.0,10.0,0.0,,
";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_plain_and_gzip_are_identical() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("track.csv");
        let packed = dir.path().join("track.csv.gz");
        std::fs::write(&plain, TRACK).unwrap();
        std::fs::write(&packed, gzip(TRACK.as_bytes())).unwrap();

        let a = TrackFileReader::new(&plain).read();
        let b = TrackFileReader::new(&packed).read();

        assert_eq!(a.len(), 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_gzip_selected_by_suffix() {
        assert!(TrackFileReader::new("a/track.csv.gz").is_gzip());
        assert!(!TrackFileReader::new("a/track.csv").is_gzip());
        assert!(!TrackFileReader::new("a/gz").is_gzip());
    }

    #[test]
    fn test_missing_file_yields_empty() {
        let dir = TempDir::new().unwrap();
        let reader = TrackFileReader::new(dir.path().join("nope.csv"));

        let track = reader.read_with(TrackParser::<KalmanEstimator>::default());

        assert!(track.samples.is_empty());
        assert!(matches!(track.error, Some(TrackError::Open { .. })));
    }

    #[test]
    fn test_truncated_gzip_returns_partial_samples() {
        // Enough rows that the cut lands well after the first few
        let mut data = String::from("millis,sensor,lat,lon,hMSL\n");
        for i in 0..2000 {
            data.push_str(&format!("{},gps,47.0,8.0,{}\n", i * 200, 1000 + i));
        }
        let packed = gzip(data.as_bytes());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cut.csv.gz");
        std::fs::write(&path, &packed[..packed.len() / 2]).unwrap();

        let track = TrackFileReader::new(&path).read_with(TrackParser::<KalmanEstimator>::default());

        assert!(track.error.is_some());
        assert!(!track.samples.is_empty());
        assert!(track.samples.len() < 2000);
    }

    #[test]
    fn test_corrupt_gzip_yields_error_not_panic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junk.csv.gz");
        std::fs::write(&path, b"this is not gzip at all").unwrap();

        let track = TrackFileReader::new(&path).read_with(TrackParser::<KalmanEstimator>::default());

        assert!(track.samples.is_empty());
        assert!(track.error.is_some());
    }
}
