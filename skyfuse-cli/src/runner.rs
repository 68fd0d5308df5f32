//! CLI runner for common setup and operations.
//!
//! Encapsulates configuration loading, logging initialization and track
//! loading to reduce duplication across command handlers.

use std::path::Path;

use skyfuse::altimeter::AltitudeFusion;
use skyfuse::config::ConfigFile;
use skyfuse::logging::{init_logging, LoggingGuard};
use skyfuse::track::{ParsedTrack, TrackFileReader, TrackParser};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    pub fn new() -> Result<Self, CliError> {
        Self::with_debug(false)
    }

    /// Create a new CLI runner with optional debug logging.
    ///
    /// Log lines only go to the log file unless `debug_mode` is set, so
    /// command output on stdout stays readable.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| skyfuse::logging::default_log_file().to_string());

        let logging_guard = init_logging(log_dir, &log_file, debug_mode, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("skyfuse v{}", skyfuse::VERSION);
        info!("skyfuse CLI: {} command", command);
    }

    /// Load a track with the configured altimeter noise model.
    ///
    /// A read failure after some samples is reported on stderr and the
    /// partial track is returned. A track without any samples is an error.
    pub fn load_track(&self, path: &Path) -> Result<ParsedTrack, CliError> {
        let fusion = AltitudeFusion::from_settings(&self.config.altimeter);
        let reader = TrackFileReader::new(path);
        let mut track = reader.read_with(TrackParser::new(fusion));

        if track.samples.is_empty() {
            return Err(match track.error.take() {
                Some(error) => CliError::TrackRead {
                    path: path.display().to_string(),
                    error,
                },
                None => CliError::EmptyTrack(path.display().to_string()),
            });
        }

        if let Some(error) = &track.error {
            eprintln!(
                "Warning: track ended early ({}), using {} samples read before the failure",
                error,
                track.samples.len()
            );
        }

        Ok(track)
    }

    /// Build a multi-threaded runtime for async commands.
    pub fn runtime(&self) -> Result<tokio::runtime::Runtime, CliError> {
        tokio::runtime::Runtime::new().map_err(CliError::Runtime)
    }
}
