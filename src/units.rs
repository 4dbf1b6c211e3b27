use crate::models::SizeUnit;

// Square feet is the pivot unit for all conversions.
pub const MARLA_TO_SQFT: f64 = 272.25;
pub const KANAL_TO_MARLA: f64 = 20.0;
pub const KANAL_TO_SQFT: f64 = KANAL_TO_MARLA * MARLA_TO_SQFT;
pub const SQYD_TO_SQFT: f64 = 9.0;

impl SizeUnit {
    fn sqft_factor(&self) -> f64 {
        match self {
            SizeUnit::Kanal => KANAL_TO_SQFT,
            SizeUnit::Marla => MARLA_TO_SQFT,
            SizeUnit::SquareYards => SQYD_TO_SQFT,
            SizeUnit::SquareFeet => 1.0,
        }
    }
}

/// Converts a measurement between land units through the square-feet
/// pivot, rounding the result to 2 decimal places. Zero, non-finite
/// values, and same-unit conversions pass through unchanged.
pub fn convert(value: f64, from: SizeUnit, to: SizeUnit) -> f64 {
    if value == 0.0 || !value.is_finite() || from == to {
        return value;
    }
    let sqft = value * from.sqft_factor();
    round2(sqft / to.sqft_factor())
}

/// String-keyed variant for values coming straight off a unit selector.
/// An unrecognized unit on either side leaves the value unchanged rather
/// than erroring, so a half-filled size field never breaks the form.
pub fn convert_size(value: f64, from: &str, to: &str) -> f64 {
    match (from.parse::<SizeUnit>(), to.parse::<SizeUnit>()) {
        (Ok(from), Ok(to)) => convert(value, from, to),
        _ => value,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_unit_is_identity() {
        for unit in SizeUnit::ALL {
            assert_eq!(convert(7.3, unit, unit), 7.3);
        }
    }

    #[test]
    fn zero_passes_through() {
        assert_eq!(convert(0.0, SizeUnit::Kanal, SizeUnit::Marla), 0.0);
    }

    #[test]
    fn known_conversion_constants() {
        assert_eq!(convert(1.0, SizeUnit::Kanal, SizeUnit::Marla), 20.0);
        assert_eq!(convert(1.0, SizeUnit::Kanal, SizeUnit::SquareFeet), 5445.0);
        assert_eq!(convert(9.0, SizeUnit::SquareFeet, SizeUnit::SquareYards), 1.0);
        assert_eq!(convert(5.0, SizeUnit::Marla, SizeUnit::SquareFeet), 1361.25);
    }

    #[test]
    fn round_trips_within_unit_quantization() {
        for from in SizeUnit::ALL {
            for to in SizeUnit::ALL {
                let there = convert(3.7, from, to);
                let back = convert(there, to, from);
                // Each hop rounds to 2 dp in its target unit, so the drift
                // is at most half a quantum of the intermediate unit
                // re-expressed in the original unit, plus the final round.
                let tolerance = 0.005 * to.sqft_factor() / from.sqft_factor() + 0.005;
                assert!(
                    (back - 3.7).abs() <= tolerance + 1e-9,
                    "{from} -> {to}: 3.7 came back as {back} (tolerance {tolerance})"
                );
            }
        }
    }

    #[test]
    fn exact_round_trip_when_no_rounding_occurs() {
        let kanal = convert(5.0, SizeUnit::Marla, SizeUnit::Kanal);
        assert_eq!(kanal, 0.25);
        assert_eq!(convert(kanal, SizeUnit::Kanal, SizeUnit::Marla), 5.0);
    }

    #[test]
    fn unknown_unit_string_is_a_no_op() {
        assert_eq!(convert_size(12.5, "Acres", "Marla"), 12.5);
        assert_eq!(convert_size(12.5, "Marla", ""), 12.5);
    }

    #[test]
    fn string_keyed_conversion_uses_form_labels() {
        assert_eq!(convert_size(5.0, "Marla", "Square Feet"), 1361.25);
        assert_eq!(convert_size(1.0, "Square Yards", "Square Feet"), 9.0);
    }
}
