//! Module for dynamics processors.

use super::filtering::simple::ballistics::BallisticsFilter;
use super::*;

pub mod band;
pub mod compressor;

pub use band::{BandMeters, BandSettings, CompressorBand};
pub use compressor::Compressor;
