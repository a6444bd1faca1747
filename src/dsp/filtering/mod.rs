//! Module for time domain filters.

pub mod crossover;
pub mod lrf;
pub mod simple;

pub use crossover::CrossoverNetwork;
pub use lrf::LinkwitzRileyFilter;
pub use simple::ballistics::{BallisticsFilter, BallisticsLevelType};

/// An enum which covers the available filter responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterType {
    #[default]
    Lowpass,
    Highpass,
    Allpass,
}
