//! Project-wide exports for easy access.

pub use crate::error::{Error, Result};
pub use crate::settings::*;
pub use crate::util::*;
pub use atomic_float::AtomicF64;
pub use std::f64::consts::{FRAC_PI_2, PI, SQRT_2, TAU};

/// The system-wide "silence" level. Meters, spectrum frames and level
/// conversions never report anything lower than this.
pub const MINUS_INFINITY_DB: f64 = -72.0;
/// [`MINUS_INFINITY_DB`] as a linear gain.
pub const MINUS_INFINITY_GAIN: f64 = 2.511_886_431_509_58e-4;
