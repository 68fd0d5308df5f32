//! Flight phase labels.

use std::fmt;

/// Kinematic regime of the current sample.
///
/// Discriminant order mirrors the classification precedence, not severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum FlightPhase {
    #[default]
    Unknown = 0,
    Ground = 1,
    Plane = 2,
    Wingsuit = 3,
    Freefall = 4,
    Canopy = 5,
}

impl FlightPhase {
    /// All phases in discriminant order.
    pub const ALL: [FlightPhase; 6] = [
        FlightPhase::Unknown,
        FlightPhase::Ground,
        FlightPhase::Plane,
        FlightPhase::Wingsuit,
        FlightPhase::Freefall,
        FlightPhase::Canopy,
    ];

    /// Human readable label. Empty for `Unknown`.
    pub fn label(self) -> &'static str {
        match self {
            FlightPhase::Unknown => "",
            FlightPhase::Ground => "Ground",
            FlightPhase::Plane => "Plane",
            FlightPhase::Wingsuit => "Wingsuit",
            FlightPhase::Freefall => "Freefall",
            FlightPhase::Canopy => "Canopy",
        }
    }

    /// True for the airborne phases (plane, wingsuit, freefall, canopy).
    pub fn is_flight(self) -> bool {
        matches!(
            self,
            FlightPhase::Plane | FlightPhase::Wingsuit | FlightPhase::Freefall | FlightPhase::Canopy
        )
    }

    /// Decode a stored discriminant; out-of-range values map to `Unknown`.
    pub fn from_u8(value: u8) -> Self {
        Self::ALL
            .get(value as usize)
            .copied()
            .unwrap_or(FlightPhase::Unknown)
    }
}

impl From<FlightPhase> for u8 {
    fn from(phase: FlightPhase) -> Self {
        phase as u8
    }
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightPhase::Unknown => write!(f, "Unknown"),
            other => write!(f, "{}", other.label()),
        }
    }
}
