//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`replay`] - Classify a track through the flight computer
//! - [`stats`] - Track statistics

pub mod common;
pub mod config;
pub mod replay;
pub mod stats;
