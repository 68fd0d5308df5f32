//! Track ingestion errors.

use std::path::PathBuf;

/// Error raised while reading a track file.
///
/// These never abort a replay: the reader logs them and hands back the
/// samples parsed before the failure.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("Failed to open track file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read track data: {0}")]
    Read(#[from] std::io::Error),

    #[error("Malformed track data: {0}")]
    Csv(#[from] csv::Error),
}

impl TrackError {
    /// Whether the stream ended early (truncated file or gzip member).
    pub fn is_truncated(&self) -> bool {
        match self {
            TrackError::Read(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            TrackError::Csv(e) => match e.kind() {
                csv::ErrorKind::Io(io) => io.kind() == std::io::ErrorKind::UnexpectedEof,
                _ => false,
            },
            TrackError::Open { .. } => false,
        }
    }
}
