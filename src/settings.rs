//! Global constants.
//!
//! The sample rate is not global: every processor stores the rate it was
//! prepared with.

/// The number of audio channels the processor is built for.
pub const NUM_CHANNELS: usize = 2;

/// The number of frequency bands the crossover network produces.
pub const NUM_BANDS: usize = 3;

/// The largest block the host may hand to `process_block()`, and the largest
/// window a sample accumulator may be prepared with.
pub const MAX_BLOCK_SIZE: usize = 1 << 13; // 8192

/// The number of slots in every block FIFO.
pub const FIFO_CAPACITY: usize = 30;

/// The duration of the input/output gain ramps in milliseconds.
pub const GAIN_SMOOTHING_TIME_MS: f64 = 50.0;

/// The lowest frequency shown by the analyzer.
pub const MIN_FREQUENCY: f64 = 20.0;
/// The highest frequency shown by the analyzer.
pub const MAX_FREQUENCY: f64 = 20000.0;

/// The top of the analyzer's decibel scale.
pub const MAX_DECIBELS: f64 = 12.0;

/// The lowest threshold a band may be set to.
pub const MIN_THRESHOLD_DB: f64 = -60.0;

/// The floor used by the analyzer paths unless changed at runtime.
pub const DEFAULT_ANALYZER_FLOOR_DB: f64 = -48.0;

/// How often the analyzer is refreshed on the UI side.
pub const ANALYZER_REFRESH_RATE_HZ: f64 = 60.0;

/// Number of FFT bins skipped between path vertices.
pub const PATH_RESOLUTION: usize = 2;

/// The default sample rate used before the host prepares the engine.
pub const DEFAULT_SAMPLE_RATE: f64 = 48000.0;

/// The default host block size for the demo binary.
pub const DEFAULT_BLOCK_SIZE: usize = 512;
