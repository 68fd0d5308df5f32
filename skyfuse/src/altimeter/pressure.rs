//! Barometric pressure to pressure-altitude conversion.
//!
//! Uses the international standard atmosphere relation
//! `h = 44330 · (1 − (p / p₀)^(1/5.255))` with `p₀ = 1013.25 hPa`.

/// Standard sea level pressure in hPa.
pub const PRESSURE_STANDARD_ATMOSPHERE: f64 = 1013.25;

const ALTITUDE_SCALE_M: f64 = 44330.0;
const PRESSURE_EXPONENT: f64 = 1.0 / 5.255;

/// Convert a pressure reading (hPa) to pressure altitude (m).
///
/// Non-positive or NaN pressure yields NaN.
pub fn pressure_to_altitude(pressure_hpa: f64) -> f64 {
    if !(pressure_hpa > 0.0) {
        return f64::NAN;
    }
    ALTITUDE_SCALE_M * (1.0 - (pressure_hpa / PRESSURE_STANDARD_ATMOSPHERE).powf(PRESSURE_EXPONENT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_pressure_is_sea_level() {
        assert!(pressure_to_altitude(PRESSURE_STANDARD_ATMOSPHERE).abs() < 1e-9);
    }

    #[test]
    fn test_known_altitudes() {
        // ISA: ~1000 m at 898.7 hPa, ~4000 m at 616.4 hPa
        assert!((pressure_to_altitude(898.76) - 1000.0).abs() < 5.0);
        assert!((pressure_to_altitude(616.40) - 4000.0).abs() < 10.0);
    }

    #[test]
    fn test_lower_pressure_is_higher() {
        assert!(pressure_to_altitude(700.0) > pressure_to_altitude(800.0));
    }

    #[test]
    fn test_invalid_pressure_is_nan() {
        assert!(pressure_to_altitude(0.0).is_nan());
        assert!(pressure_to_altitude(-5.0).is_nan());
        assert!(pressure_to_altitude(f64::NAN).is_nan());
    }
}
