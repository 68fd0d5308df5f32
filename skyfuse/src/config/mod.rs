//! User configuration stored in `~/.skyfuse/config.ini`.
//!
//! # Sections
//!
//! | Section        | Keys                                                        |
//! |----------------|-------------------------------------------------------------|
//! | `[logging]`    | `file`                                                      |
//! | `[altimeter]`  | `{baro,gps}_{measurement,acceleration}_variance`            |
//! | `[classifier]` | `policy` (`canopy-only` or `sustained-cascade`)             |
//! | `[replay]`     | `channel_capacity`                                          |
//!
//! A missing file yields defaults; missing keys keep their defaults.
//!
//! # Example
//!
//! ```
//! use skyfuse::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let baro = config.altimeter.baro_config();
//! assert!(baro.measurement_variance > 0.0);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    AltimeterSettings, ClassifierSettings, ConfigFile, LoggingSettings, ReplaySettings,
};
