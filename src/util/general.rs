//! General-purpose utility functions.

use crate::prelude::MINUS_INFINITY_DB;

/// Calculates amplitude in decibels from a linear power level.
///
/// Returns `-inf` for a level of `0.0`; see [`gain_to_db()`] for a floored
/// variant.
#[inline]
pub fn level_to_db(level: f64) -> f64 {
    20.0 * level.log10()
}

/// Calculates the linear power level from amplitude as decibels.
#[inline]
pub fn db_to_level(db_value: f64) -> f64 {
    10.0f64.powf(db_value / 20.0)
}

/// Converts a linear gain to decibels, never returning anything lower than
/// `floor_db`. Non-positive and non-finite gains map to `floor_db` exactly.
#[inline]
pub fn gain_to_db_floored(gain: f64, floor_db: f64) -> f64 {
    if !gain.is_finite() || gain <= 0.0 {
        return floor_db;
    }

    level_to_db(gain).max(floor_db)
}

/// [`gain_to_db_floored()`] with the system-wide floor
/// ([`MINUS_INFINITY_DB`]).
#[inline]
pub fn gain_to_db(gain: f64) -> f64 {
    gain_to_db_floored(gain, MINUS_INFINITY_DB)
}

/// Maps a value from the provided input range to the provided output range.
#[inline]
pub fn map(
    value: f64,
    in_min: f64,
    in_max: f64,
    out_min: f64,
    out_max: f64,
) -> f64 {
    scale(normalize(value, in_min, in_max), out_min, out_max)
}

/// Scales a value to a provided range, assuming it is normalised.
///
/// Like `map()`, but with no input range.
#[inline]
pub fn scale(value: f64, min: f64, max: f64) -> f64 {
    value.mul_add(max - min, min)
}

/// Normalizes a value from a provided range.
///
/// Like `map()`, but with the output range set to `0.0 - 1.0`.
#[inline]
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    (value - min) / (max - min)
}

/// Maps `value` from the logarithmic range `min..max` to `0.0..1.0`, such that
/// each decade takes up the same space.
///
/// Values outside the range extrapolate; non-positive values give `-inf` or
/// `NaN`, so callers drawing with this should check the result.
#[inline]
pub fn map_from_log10(value: f64, min: f64, max: f64) -> f64 {
    debug_assert!(min > 0.0 && max > min);
    (value / min).log10() / (max / min).log10()
}

/// Returns whether `value` and `target` are equal, with a tolerance of
/// [`f64::EPSILON`].
pub fn eps_eq(value: f64, target: f64) -> bool {
    (target - value).abs() < f64::EPSILON
}

/// Returns whether the absolute value of `value` is less than the provided
/// `tolerance` value. Useful for checking approximate equality.
pub fn within_tolerance(value: f64, target: f64, tolerance: f64) -> bool {
    (value - target).abs() <= tolerance
}
