//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use skyfuse::config::ConfigFileError;
use skyfuse::track::TrackError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Track could not be read at all
    TrackRead { path: String, error: TrackError },
    /// Track was read but contained no usable samples
    EmptyTrack(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Check {} or run 'skyfuse config init' to create a default one.",
                    skyfuse::config::config_file_path().display()
                );
            }
            CliError::EmptyTrack(_) => {
                eprintln!();
                eprintln!("Supported tracks need a header row with 'lat' and 'lon' columns,");
                eprintln!("and either a 'sensor' column (gps/alt rows) or FlySight 'time' rows.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::TrackRead { path, error } => {
                write!(f, "Failed to read track '{}': {}", path, error)
            }
            CliError::EmptyTrack(path) => write!(f, "No samples found in track '{}'", path),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::TrackRead { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_conversion() {
        let err: CliError = ConfigFileError::InvalidValue {
            section: "classifier".to_string(),
            key: "policy".to_string(),
            value: "sometimes".to_string(),
            reason: "unknown policy".to_string(),
        }
        .into();

        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("classifier.policy"));
    }

    #[test]
    fn test_track_read_has_source() {
        let err = CliError::TrackRead {
            path: "jump.csv".to_string(),
            error: TrackError::Read(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "eof",
            )),
        };

        assert!(err.to_string().contains("jump.csv"));
        assert!(err.source().is_some());
        assert!(CliError::EmptyTrack("x".to_string()).source().is_none());
    }
}
