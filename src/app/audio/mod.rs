//! Audio state and processing.

use super::*;
use crate::dsp::*;

use std::sync::Arc;

pub mod engine;
pub mod process;

pub use engine::{AudioEngine, AudioPackage};
