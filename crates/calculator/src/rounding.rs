//! Currency rounding.

/// Round to two decimal places, half away from zero.
///
/// The scaled value is nudged by a few ULPs before rounding so that inputs
/// whose decimal form sits exactly on a half cent (`1.005`, `2.675`) round up
/// even though their binary representation falls just below it.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let scaled = value * 100.0;
    let nudged = scaled + scaled.signum() * scaled.abs() * f64::EPSILON * 4.0;
    let rounded = nudged.round() / 100.0;

    // Normalise negative zero so it serializes as `0.0`.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
