//! Lock-free hand-off of audio from the audio thread to analysis.

pub mod accumulator;
pub mod fifo;

pub use accumulator::{Channel, SampleAccumulator, SampleTap};
pub use fifo::{block_fifo, block_fifo_with_capacity, FifoConsumer, FifoProducer};
