//! Processor parameters: the layout, the shared store and its snapshots.

use crate::prelude::*;

pub mod layout;
pub mod state;
pub mod types;

pub use layout::{layout, ParamId, ParamKind, ParamSpec, NUM_PARAMS};
pub use state::{ParamSnapshot, ParameterStore};
pub use types::*;
