//! DSP utility types.

pub mod buffer;
pub mod effect_trait;

pub use buffer::AudioBuffer;
pub use effect_trait::Effect;
