//! Regroups one channel of a block stream into fixed-size analysis windows.

use super::fifo::{block_fifo, FifoConsumer, FifoProducer};
use crate::dsp::AudioBuffer;
use crate::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize};
use std::sync::Arc;

/// An audio channel selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Channel {
    #[default]
    Left,
    Right,
}

impl Channel {
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

#[derive(Debug, Default)]
struct WindowInfo {
    prepared: AtomicBool,
    size: AtomicUsize,
}

/// The audio-thread side of a sample accumulator: collects the samples of
/// one channel and pushes a copy of the window into a block FIFO each time
/// it fills.
///
/// A full FIFO drops the window.
#[derive(Debug)]
pub struct SampleAccumulator {
    channel: Channel,

    window: Vec<f64>,
    fill_idx: usize,

    producer: FifoProducer<Vec<f64>>,
    info: Arc<WindowInfo>,
}

/// The reading side of a [`SampleAccumulator`].
#[derive(Debug)]
pub struct SampleTap {
    channel: Channel,

    consumer: FifoConsumer<Vec<f64>>,
    info: Arc<WindowInfo>,
}

impl SampleAccumulator {
    /// Creates an unprepared accumulator for `channel` and the tap which
    /// reads its windows.
    pub fn new(channel: Channel) -> (Self, SampleTap) {
        // slots hold the largest window, so pushes never allocate
        let (producer, consumer) = block_fifo(&vec![0.0; MAX_BLOCK_SIZE]);
        let info = Arc::new(WindowInfo::default());

        let accumulator = Self {
            channel,
            window: Vec::new(),
            fill_idx: 0,
            producer,
            info: Arc::clone(&info),
        };

        (accumulator, SampleTap { channel, consumer, info })
    }

    /// (Re-)allocates the window and resets the fill index. `window_size` is
    /// clamped to `1..=MAX_BLOCK_SIZE`.
    ///
    /// # Safety
    ///
    /// This function may reallocate, so should not be used in a real-time context.
    pub fn prepare(&mut self, window_size: usize) {
        let window_size = window_size.clamp(1, MAX_BLOCK_SIZE);
        self.info.prepared.sr(false);

        self.window.clear();
        self.window.resize(window_size, 0.0);
        self.fill_idx = 0;

        self.info.size.sr(window_size);
        self.info.prepared.sr(true);
    }

    /// Feeds this accumulator's channel of `buffer` into the window. Has no
    /// effect if the accumulator is unprepared or `buffer` lacks the channel.
    pub fn update(&mut self, buffer: &AudioBuffer) {
        let ch = self.channel.index();
        if !self.is_prepared() || ch >= buffer.num_channels() {
            return;
        }

        for &sample in buffer.channel(ch) {
            self.push_sample(sample);
        }
    }

    /// The number of samples waiting for the window to fill.
    pub fn num_pending(&self) -> usize {
        self.fill_idx
    }

    pub fn size(&self) -> usize {
        self.window.len()
    }

    pub fn is_prepared(&self) -> bool {
        self.info.prepared.lr()
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    fn push_sample(&mut self, sample: f64) {
        self.window[self.fill_idx] = sample;
        self.fill_idx += 1;

        if self.fill_idx == self.window.len() {
            // dropped if the reader has fallen behind
            _ = self.producer.push(&self.window);
            self.fill_idx = 0;
        }
    }
}

impl SampleTap {
    /// Copies the oldest complete window into `window`. Returns `false` if
    /// none is available.
    pub fn pull(&mut self, window: &mut Vec<f64>) -> bool {
        self.consumer.pull(window)
    }

    /// The number of complete windows waiting to be read.
    pub fn num_complete_buffers_available(&self) -> usize {
        self.consumer.num_available_for_reading()
    }

    /// The accumulator's current window size.
    pub fn size(&self) -> usize {
        self.info.size.lr()
    }

    pub fn is_prepared(&self) -> bool {
        self.info.prepared.lr()
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_buffer(len: usize) -> AudioBuffer {
        let left = (0..len).map(|n| n as f64).collect();
        let right = (0..len).map(|n| -(n as f64)).collect();
        AudioBuffer::from_channels(vec![left, right])
    }

    #[test]
    fn one_window_per_window_size() {
        let (mut acc, tap) = SampleAccumulator::new(Channel::Left);
        acc.prepare(512);

        acc.update(&ramp_buffer(512));
        assert_eq!(tap.num_complete_buffers_available(), 1);
        assert_eq!(acc.num_pending(), 0);
    }

    #[test]
    fn leftover_samples_stay_pending() {
        let (mut acc, tap) = SampleAccumulator::new(Channel::Left);
        acc.prepare(512);

        acc.update(&ramp_buffer(512 + 100));
        assert_eq!(tap.num_complete_buffers_available(), 1);
        assert_eq!(acc.num_pending(), 100);
    }

    #[test]
    fn windows_span_blocks() {
        let (mut acc, mut tap) = SampleAccumulator::new(Channel::Right);
        acc.prepare(300);

        // 4 × 128 = 512 samples: one window and 212 pending
        let block = ramp_buffer(128);
        for _ in 0..4 {
            acc.update(&block);
        }

        assert_eq!(tap.num_complete_buffers_available(), 1);
        assert_eq!(acc.num_pending(), 212);

        let mut window = Vec::new();
        assert!(tap.pull(&mut window));
        assert_eq!(window.len(), 300);
        assert_eq!(window[0], 0.0);
        assert_eq!(window[127], -127.0);
        assert_eq!(window[128], 0.0);
        assert_eq!(window[299], -43.0);
    }

    #[test]
    fn full_fifo_drops_windows() {
        let (mut acc, tap) = SampleAccumulator::new(Channel::Left);
        acc.prepare(64);

        acc.update(&ramp_buffer(64 * (FIFO_CAPACITY + 5)));
        assert_eq!(tap.num_complete_buffers_available(), FIFO_CAPACITY);
        assert_eq!(acc.num_pending(), 0);
    }

    #[test]
    fn unprepared_ignores_input() {
        let (mut acc, tap) = SampleAccumulator::new(Channel::Left);
        assert!(!tap.is_prepared());

        acc.update(&ramp_buffer(1024));
        assert_eq!(tap.num_complete_buffers_available(), 0);
    }

    #[test]
    fn tap_sees_size() {
        let (mut acc, tap) = SampleAccumulator::new(Channel::Left);
        acc.prepare(2048);

        assert!(tap.is_prepared());
        assert_eq!(tap.size(), 2048);

        acc.prepare(MAX_BLOCK_SIZE * 2);
        assert_eq!(tap.size(), MAX_BLOCK_SIZE);
    }

    #[test]
    fn missing_channel_is_ignored() {
        let (mut acc, tap) = SampleAccumulator::new(Channel::Right);
        acc.prepare(4);

        acc.update(&AudioBuffer::from_channels(vec![vec![1.0; 16]]));
        assert_eq!(tap.num_complete_buffers_available(), 0);
    }
}
