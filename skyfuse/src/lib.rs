//! Skyfuse - altitude fusion and flight phase detection for skydiving tracks
//!
//! This library turns a noisy, irregularly sampled stream of GPS fixes and
//! barometric pressure readings into one fused altitude and climb rate per
//! fix, and labels each fused sample with a flight phase (ground, plane,
//! wingsuit, freefall, canopy).
//!
//! # Data Flow
//!
//! ```text
//! track file ──► TrackParser ──► AltitudeFusion ──► FusedLocation
//!                                                        │
//!                     LocationUpdates (mpsc)      ◄──────┘
//!                                │
//!                                ▼
//!                         FlightComputer ──► classify() ──► FlightPhase
//!                                │
//!                                └──► LandingDetector
//! ```
//!
//! # Example
//!
//! ```
//! use skyfuse::flight::{classify, FlightPhase};
//!
//! assert_eq!(classify(40.0, 0.0, None), FlightPhase::Plane);
//! assert_eq!(classify(0.0, 1.0, None), FlightPhase::Ground);
//! ```

pub mod altimeter;
pub mod config;
pub mod estimator;
pub mod flight;
pub mod logging;
pub mod measurement;
pub mod track;

/// Version of the skyfuse library and CLI.
///
/// Synchronized across the workspace via `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
