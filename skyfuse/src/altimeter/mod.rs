//! Altimeter: barometric conversion and barometer/GPS fusion.
//!
//! # Components
//!
//! - [`pressure_to_altitude`] - Standard atmosphere conversion (hPa → m)
//! - [`AltitudeFusion`] - Two-channel fusion engine with a frozen offset
//!
//! # Usage
//!
//! ```
//! use skyfuse::altimeter::AltitudeFusion;
//!
//! let mut fusion: AltitudeFusion = AltitudeFusion::default();
//! let fused = fusion.on_gps_altitude(100.0, 0).unwrap();
//! assert_eq!(fused.altitude, 100.0);
//!
//! fusion.on_pressure_altitude(98.0, 0).unwrap();
//! assert_eq!(fusion.offset(), Some(2.0));
//! ```

mod fusion;
mod pressure;

pub use fusion::{AltitudeFusion, FusedAltitude};
pub use pressure::{pressure_to_altitude, PRESSURE_STANDARD_ATMOSPHERE};
