//! Temperature unit conversion.
//!
//! The provider reports every temperature in Kelvin. Conversion happens exactly once,
//! at the point where a raw provider value becomes a domain value.

const KELVIN_OFFSET: f64 = 273.15;

/// Convert Kelvin to Celsius at full precision.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Round to two decimal places, exact ties going to the even neighbour.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Convert Kelvin to Celsius rounded to two decimals, as shown in headline metrics.
pub fn celsius_rounded(kelvin: f64) -> f64 {
    round2(kelvin_to_celsius(kelvin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freezing_point() {
        assert!(kelvin_to_celsius(273.15).abs() < 1e-9);
    }

    #[test]
    fn unrounded_conversion_keeps_precision() {
        let c = kelvin_to_celsius(300.456);
        assert!((c - 27.306).abs() < 1e-9);
    }

    #[test]
    fn rounded_conversion_has_two_decimals() {
        assert_eq!(celsius_rounded(300.456), 27.31);
        assert_eq!(celsius_rounded(298.15), 25.0);
        assert_eq!(celsius_rounded(260.0), -13.15);
    }

    #[test]
    fn exact_ties_round_to_even() {
        // 274.275 K is exactly 1.125 °C in binary.
        assert_eq!(celsius_rounded(274.275), 1.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
    }
}
