//! Display rounding. Internal arithmetic always uses unrounded values.

use serde::Serializer;

/// Rounds to two decimal places.
#[must_use]
pub fn hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Serializes an `f64` rounded to two decimal places.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn serialize_hundredths<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(hundredths(*value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert!((hundredths(1.005_000_1) - 1.01).abs() < 1e-12);
        assert!((hundredths(4.499_999) - 4.5).abs() < 1e-12);
        assert!((hundredths(-0.126) + 0.13).abs() < 1e-12);
    }
}
