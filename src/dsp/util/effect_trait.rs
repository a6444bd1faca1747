//! Trait for audio-processing types.

/// Generic trait for per-sample audio processors which keep independent state
/// for each channel.
pub trait Effect: Send + std::fmt::Debug {
    /// Required method to process a single sample of audio on the channel at
    /// `channel_idx`.
    fn process_mono(&mut self, input: f64, channel_idx: usize) -> f64;

    /// Processes every sample of `channel` in place.
    fn process_slice(&mut self, channel: &mut [f64], channel_idx: usize) {
        for x in channel.iter_mut() {
            *x = self.process_mono(*x, channel_idx);
        }
    }

    /// Required method to obtain the sample rate of the processor.
    fn get_sample_rate(&self) -> f64;

    /// Required method to obtain the name of the effect processor.
    fn get_identifier(&self) -> &str;
}
