//! Module for spectral analysis.

use super::*;

pub mod fft_data;
pub mod path;

pub use fft_data::{FftDataGenerator, FftOrder};
pub use path::{AnalyzerPath, PathGenerator, PathPoint, Rect};
