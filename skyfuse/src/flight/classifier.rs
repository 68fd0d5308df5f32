//! Flight phase classification.
//!
//! A strict first-match cascade over `(ground_speed, climb)`:
//!
//! | # | Phase    | Condition                                              |
//! |---|----------|--------------------------------------------------------|
//! | 1 | Plane    | `climb > -0.3·gs + 7` and `gs > 33`                    |
//! | 2 | Freefall | `climb < -13` and `climb < -gs - 10` and `gs < 19`     |
//! | 3 | Wingsuit | `climb < gs - 32` and `climb < -0.3·gs + 5.5`          |
//! | 4 | Wingsuit | `climb < -17`                                          |
//! | 5 | Canopy   | canopy envelope (see [`is_canopy`])                    |
//! | 6 | Ground   | `gs + |climb - 1| < 5`                                 |
//! | 7 | Ground   | `-1 < climb < 2` and not `gs > 10`                     |
//! | 8 | Unknown  | default                                                |
//!
//! Every comparison is a plain float comparison, so a NaN operand fails it
//! and the sample falls through toward `Unknown`. The rules are written so
//! that stays true; do not rewrite `!(gs > 10)` as `gs <= 10`.
//!
//! Classification is pure: no state survives between calls.

use crate::measurement::{AerodynamicState, FusedLocation};

use super::phase::FlightPhase;

/// Where the aerodynamic sustained-velocity pair is substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassificationPolicy {
    /// Sustained velocity replaces the instantaneous pair for the canopy rule only.
    #[default]
    CanopyOnly,
    /// Ground rules run on the instantaneous pair first; the full cascade then
    /// runs on the sustained pair.
    SustainedCascade,
}

impl ClassificationPolicy {
    /// Config / CLI name.
    pub fn as_str(self) -> &'static str {
        match self {
            ClassificationPolicy::CanopyOnly => "canopy-only",
            ClassificationPolicy::SustainedCascade => "sustained-cascade",
        }
    }
}

impl std::str::FromStr for ClassificationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canopy-only" | "canopy_only" => Ok(ClassificationPolicy::CanopyOnly),
            "sustained-cascade" | "sustained_cascade" => Ok(ClassificationPolicy::SustainedCascade),
            other => Err(format!(
                "unknown classification policy '{}' (expected canopy-only or sustained-cascade)",
                other
            )),
        }
    }
}

impl std::fmt::Display for ClassificationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify with the canopy-only substitution.
///
/// When `aerodynamics` is present its sustained velocity replaces
/// `(ground_speed, climb)` in the canopy rule; every other rule sees the
/// instantaneous pair.
pub fn classify(
    ground_speed: f64,
    climb: f64,
    aerodynamics: Option<&AerodynamicState>,
) -> FlightPhase {
    if let Some(phase) = airborne(ground_speed, climb) {
        return phase;
    }

    let canopy = match aerodynamics {
        Some(state) => {
            let sustained = state.sustained_velocity();
            is_canopy(sustained.forward, sustained.vertical)
        }
        None => is_canopy(ground_speed, climb),
    };
    if canopy {
        return FlightPhase::Canopy;
    }

    if is_ground(ground_speed, climb) {
        FlightPhase::Ground
    } else {
        FlightPhase::Unknown
    }
}

/// Classify with the sustained-velocity pair driving the whole cascade.
///
/// Ground is decided on the instantaneous pair. Without an aerodynamic state
/// the cascade runs on the instantaneous pair.
pub fn classify_sustained(
    ground_speed: f64,
    climb: f64,
    aerodynamics: Option<&AerodynamicState>,
) -> FlightPhase {
    if is_ground(ground_speed, climb) {
        return FlightPhase::Ground;
    }

    match aerodynamics {
        Some(state) => {
            let sustained = state.sustained_velocity();
            cascade(sustained.forward, sustained.vertical)
        }
        None => cascade(ground_speed, climb),
    }
}

/// Full cascade on one velocity pair.
fn cascade(ground_speed: f64, climb: f64) -> FlightPhase {
    if let Some(phase) = airborne(ground_speed, climb) {
        phase
    } else if is_canopy(ground_speed, climb) {
        FlightPhase::Canopy
    } else if is_ground(ground_speed, climb) {
        FlightPhase::Ground
    } else {
        FlightPhase::Unknown
    }
}

/// Rules 1-4.
fn airborne(gs: f64, climb: f64) -> Option<FlightPhase> {
    if -0.3 * gs + 7.0 < climb && 33.0 < gs {
        Some(FlightPhase::Plane)
    } else if climb < -13.0 && climb < -gs - 10.0 && gs < 19.0 {
        Some(FlightPhase::Freefall)
    } else if climb < gs - 32.0 && climb < -0.3 * gs + 5.5 {
        Some(FlightPhase::Wingsuit)
    } else if climb < -17.0 {
        Some(FlightPhase::Wingsuit)
    } else {
        None
    }
}

/// Canopy envelope.
///
/// `-18 < climb < -1.1`, `gs - 31 < climb < gs - 4`, `1.1 < gs < 23.5`
/// and `climb < -gs + 20`.
pub fn is_canopy(gs: f64, climb: f64) -> bool {
    -18.0 < climb
        && climb < -1.1
        && gs - 31.0 < climb
        && climb < gs - 4.0
        && 1.1 < gs
        && gs < 23.5
        && climb < -gs + 20.0
}

/// Rules 6-7.
fn is_ground(gs: f64, climb: f64) -> bool {
    // NaN ground speed counts as slow
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    let slow = !(gs > 10.0);
    gs + (climb - 1.0).abs() < 5.0 || (-1.0 < climb && climb < 2.0 && slow)
}

/// Stateless classifier with a fixed substitution policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlightPhaseClassifier {
    policy: ClassificationPolicy,
}

impl FlightPhaseClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ClassificationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ClassificationPolicy {
        self.policy
    }

    /// Classify an explicit velocity pair.
    pub fn classify(
        &self,
        ground_speed: f64,
        climb: f64,
        aerodynamics: Option<&AerodynamicState>,
    ) -> FlightPhase {
        match self.policy {
            ClassificationPolicy::CanopyOnly => classify(ground_speed, climb, aerodynamics),
            ClassificationPolicy::SustainedCascade => {
                classify_sustained(ground_speed, climb, aerodynamics)
            }
        }
    }

    /// Classify a fused sample.
    pub fn classify_location(
        &self,
        location: &FusedLocation,
        aerodynamics: Option<&AerodynamicState>,
    ) -> FlightPhase {
        self.classify(location.ground_speed(), location.climb, aerodynamics)
    }
}
