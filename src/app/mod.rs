//! All app-related state and logic.

use crate::prelude::*;

pub mod analyzer;
pub mod args;
pub mod audio;
pub mod params;

pub use analyzer::{
    crossover_x, threshold_y, BandLevels, Overlay, PathProducer, SpectrumAnalyzer, ThresholdLine,
};
pub use args::Arguments;
pub use audio::{AudioEngine, AudioPackage};
pub use params::*;
