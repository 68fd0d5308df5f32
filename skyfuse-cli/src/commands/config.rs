//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init` for inspecting
//! and creating the configuration file from the command line.

use clap::Subcommand;
use skyfuse::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// List the effective configuration settings
    Show,

    /// Create the configuration file with default values if it is missing
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init => run_init(),
    }
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

/// List all configuration settings.
fn run_show() -> Result<(), CliError> {
    let path = config_file_path();
    let config = ConfigFile::load()?;

    if path.exists() {
        println!("Configuration from {}", path.display());
    } else {
        println!("No configuration file, showing defaults");
    }
    println!();
    print!("{}", render_settings(&config));

    Ok(())
}

/// Create the default configuration file.
fn run_init() -> Result<(), CliError> {
    let path = config_file_path();

    if ConfigFile::create_default_at(&path)? {
        println!("Created default configuration at {}", path.display());
    } else {
        println!("Configuration already exists at {}", path.display());
    }
    Ok(())
}

/// Settings grouped by INI section.
fn render_settings(config: &ConfigFile) -> String {
    let sections: [(&str, Vec<(&str, String)>); 4] = [
        (
            "logging",
            vec![("file", config.logging.file.display().to_string())],
        ),
        (
            "altimeter",
            vec![
                (
                    "baro_measurement_variance",
                    config.altimeter.baro_measurement_variance.to_string(),
                ),
                (
                    "baro_acceleration_variance",
                    config.altimeter.baro_acceleration_variance.to_string(),
                ),
                (
                    "gps_measurement_variance",
                    config.altimeter.gps_measurement_variance.to_string(),
                ),
                (
                    "gps_acceleration_variance",
                    config.altimeter.gps_acceleration_variance.to_string(),
                ),
            ],
        ),
        (
            "classifier",
            vec![("policy", config.classifier.policy.to_string())],
        ),
        (
            "replay",
            vec![(
                "channel_capacity",
                config.replay.channel_capacity.to_string(),
            )],
        ),
    ];

    let mut out = String::new();
    for (i, (section, keys)) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("[{}]\n", section));
        for (key, value) in keys {
            out.push_str(&format!("  {} = {}\n", key, value));
        }
    }
    out
}
