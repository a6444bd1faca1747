//! Digital signal processors and utilities.

use crate::prelude::*;

pub mod analysis;
pub mod dynamics;
pub mod filtering;
pub mod mixdown;
pub mod spectral;
pub mod util;

pub use analysis::{block_fifo, Channel, FifoConsumer, FifoProducer, SampleAccumulator, SampleTap};
pub use dynamics::{BandMeters, BandSettings, Compressor, CompressorBand};
pub use filtering::{
    BallisticsFilter, BallisticsLevelType, CrossoverNetwork, FilterType, LinkwitzRileyFilter,
};
pub use mixdown::{any_soloed, band_is_audible, BandGate, MixdownStage};
pub use spectral::{AnalyzerPath, FftDataGenerator, FftOrder, PathGenerator, PathPoint, Rect};
pub use util::*;
