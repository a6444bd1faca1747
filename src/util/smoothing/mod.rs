//! Value smoothers.

/// Non-atomic linear value smoothing.
pub mod smoother;
pub use smoother::Smoother;
