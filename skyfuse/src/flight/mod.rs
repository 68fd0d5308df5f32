//! Flight phase detection.
//!
//! # Components
//!
//! - [`FlightPhase`] - Phase labels and the `is_flight` gate
//! - [`classify`] / [`FlightPhaseClassifier`] - Pure, reentrant decision cascade
//! - [`FlightComputer`] - Subscribes to fused samples and holds the current phase
//! - [`LocationUpdates`] - Fan-out hub the computer subscribes to
//!
//! The classifier never looks at earlier labels. Smoothing over time is the
//! job of the [`LandingDetector`] collaborator.
//!
//! # Usage
//!
//! ```
//! use skyfuse::flight::{classify, FlightPhase};
//!
//! assert_eq!(classify(40.0, 0.0, None), FlightPhase::Plane);
//! assert_eq!(classify(10.0, -25.0, None), FlightPhase::Freefall);
//! assert!(FlightPhase::Freefall.is_flight());
//! ```

mod classifier;
mod computer;
mod phase;
mod provider;

pub use classifier::{
    classify, classify_sustained, is_canopy, ClassificationPolicy, FlightPhaseClassifier,
};
pub use computer::{FlightComputer, FlightComputerBuilder, PhaseChange};
pub use phase::FlightPhase;
pub use provider::{
    AerodynamicStateProvider, FixedAerodynamics, LandingDetector, LocationBroadcaster,
    LocationUpdates, NoAerodynamics, NoopLandingDetector, DEFAULT_CHANNEL_CAPACITY,
};
