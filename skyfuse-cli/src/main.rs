//! Skyfuse CLI - Command-line interface
//!
//! Replays recorded skydiving tracks through the altitude fusion and flight
//! phase pipeline of the skyfuse library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::PolicyArg;
use commands::config::ConfigCommands;
use commands::replay::ReplayArgs;
use commands::stats::StatsArgs;

#[derive(Parser)]
#[command(name = "skyfuse")]
#[command(version = skyfuse::VERSION)]
#[command(about = "Altitude fusion and flight phase replay for skydiving tracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a track through the flight computer and print phase changes
    Replay {
        /// Track file (CSV, optionally gzip compressed with a .gz suffix)
        file: PathBuf,

        /// Classification policy (defaults to the configured policy)
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Enable debug logging, mirrored to the console
        #[arg(long)]
        debug: bool,
    },

    /// Print statistics for a track file
    Stats {
        /// Track file (CSV, optionally gzip compressed with a .gz suffix)
        file: PathBuf,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            file,
            policy,
            debug,
        } => commands::replay::run(ReplayArgs {
            file,
            policy,
            debug,
        }),
        Commands::Stats { file } => commands::stats::run(StatsArgs { file }),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
