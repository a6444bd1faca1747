//! Multi-channel audio buffer.

use crate::util::window::multiply_buffers;

/// A block of audio, stored as one sample vector per channel.
///
/// The buffer is allocated once for `num_channels × capacity` samples and is
/// then "viewed" at the current block length via
/// [`set_num_samples()`](Self::set_num_samples), which never reallocates as
/// long as the length does not exceed the capacity.
#[derive(Debug, Default)]
pub struct AudioBuffer {
    channels: Vec<Vec<f64>>,
    num_samples: usize,
}

impl AudioBuffer {
    /// Creates a zeroed buffer with `num_channels` channels which can hold up
    /// to `capacity` samples per channel. The buffer starts at full length.
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        Self { channels: vec![vec![0.0; capacity]; num_channels], num_samples: capacity }
    }

    /// Creates a buffer from existing channel data. All channels are
    /// truncated to the length of the shortest.
    pub fn from_channels(mut channels: Vec<Vec<f64>>) -> Self {
        let num_samples = channels.iter().map(Vec::len).min().unwrap_or(0);
        channels.iter_mut().for_each(|ch| ch.truncate(num_samples));

        Self { channels, num_samples }
    }

    /// Resizes the buffer's storage and clears it.
    ///
    /// # Safety
    ///
    /// This function may reallocate, so should not be used in a real-time context.
    pub fn resize(&mut self, num_channels: usize, capacity: usize) {
        self.channels.resize_with(num_channels, Vec::new);

        for ch in &mut self.channels {
            ch.clear();
            ch.resize(capacity, 0.0);
        }

        self.num_samples = capacity;
    }

    /// Sets the number of samples in the current view, clamped to the
    /// capacity. Newly exposed samples keep whatever they held before.
    pub fn set_num_samples(&mut self, num_samples: usize) {
        self.num_samples = num_samples.min(self.capacity());
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// The maximum number of samples per channel without reallocating.
    pub fn capacity(&self) -> usize {
        self.channels.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// The current samples of channel `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn channel(&self, idx: usize) -> &[f64] {
        &self.channels[idx][..self.num_samples]
    }

    /// Mutable variant of [`channel()`](Self::channel).
    pub fn channel_mut(&mut self, idx: usize) -> &mut [f64] {
        let n = self.num_samples;
        &mut self.channels[idx][..n]
    }

    pub fn iter_channels(&self) -> impl Iterator<Item = &[f64]> {
        let n = self.num_samples;
        self.channels.iter().map(move |ch| &ch[..n])
    }

    pub fn iter_channels_mut(&mut self) -> impl Iterator<Item = &mut [f64]> {
        let n = self.num_samples;
        self.channels.iter_mut().map(move |ch| &mut ch[..n])
    }

    /// Zeroes the current view.
    pub fn clear(&mut self) {
        self.iter_channels_mut().for_each(|ch| ch.fill(0.0));
    }

    /// Copies `other`'s current view into this buffer and adopts its length.
    /// Channels beyond either buffer's channel count are left alone.
    ///
    /// Does not allocate as long as `other.num_samples() <= self.capacity()`.
    pub fn copy_from(&mut self, other: &Self) {
        self.set_num_samples(other.num_samples);
        let n = self.num_samples;

        for (dst, src) in self.channels.iter_mut().zip(&other.channels) {
            dst[..n].copy_from_slice(&src[..n]);
        }
    }

    /// Adds `other`'s current view into this buffer, sample by sample.
    pub fn add_from(&mut self, other: &Self) {
        let n = self.num_samples.min(other.num_samples);

        for (dst, src) in self.channels.iter_mut().zip(&other.channels) {
            dst[..n].iter_mut().zip(&src[..n]).for_each(|(a, b)| *a += *b);
        }
    }

    /// Copies `len` samples of `other`, starting at `start`, into this buffer
    /// and adopts that length (clamped to the capacity).
    ///
    /// # Panics
    ///
    /// Panics if `start + len` exceeds `other`'s current view.
    pub fn copy_from_range(&mut self, other: &Self, start: usize, len: usize) {
        assert!(start + len <= other.num_samples);
        self.set_num_samples(len);
        let n = self.num_samples;

        for (dst, src) in self.channels.iter_mut().zip(&other.channels) {
            dst[..n].copy_from_slice(&src[start..start + n]);
        }
    }

    /// Writes this buffer's current view into `other`, starting at `start`.
    /// Samples past the end of `other`'s view are not written.
    pub fn copy_into_range(&self, other: &mut Self, start: usize) {
        let n = self.num_samples.min(other.num_samples.saturating_sub(start));

        for (src, dst) in self.channels.iter().zip(other.channels.iter_mut()) {
            dst[start..start + n].copy_from_slice(&src[..n]);
        }
    }

    /// Multiplies each channel's current view by `gains`, sample by sample.
    pub fn apply_gain_ramp(&mut self, gains: &[f64]) {
        for ch in self.iter_channels_mut() {
            multiply_buffers(ch, gains);
        }
    }

    /// Root-mean-square level of the current view, computed per channel and
    /// averaged across channels. Empty buffers give `0.0`.
    pub fn rms_level(&self) -> f64 {
        if self.channels.is_empty() || self.num_samples == 0 {
            return 0.0;
        }

        let n = self.num_samples as f64;
        let sum: f64 = self
            .iter_channels()
            .map(|ch| (ch.iter().map(|x| x * x).sum::<f64>() / n).sqrt())
            .sum();

        sum / self.channels.len() as f64
    }
}

impl Clone for AudioBuffer {
    fn clone(&self) -> Self {
        Self { channels: self.channels.clone(), num_samples: self.num_samples }
    }

    /// Reuses this buffer's allocations where possible.
    fn clone_from(&mut self, source: &Self) {
        self.channels.clone_from(&source.channels);
        self.num_samples = source.num_samples;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_does_not_reallocate() {
        let mut buf = AudioBuffer::new(2, 64);
        let ptr = buf.channel(0).as_ptr();

        buf.set_num_samples(16);
        assert_eq!(buf.num_samples(), 16);
        assert_eq!(buf.channel(1).len(), 16);
        assert_eq!(buf.channel(0).as_ptr(), ptr);

        buf.set_num_samples(1000);
        assert_eq!(buf.num_samples(), 64);
    }

    #[test]
    fn rms_is_averaged_across_channels() {
        let buf = AudioBuffer::from_channels(vec![vec![1.0, -1.0, 1.0, -1.0], vec![0.0; 4]]);
        assert!((buf.rms_level() - 0.5).abs() < 1e-12);

        assert_eq!(AudioBuffer::new(0, 16).rms_level(), 0.0);
        assert_eq!(AudioBuffer::new(2, 0).rms_level(), 0.0);
        assert_eq!(AudioBuffer::new(2, 16).rms_level(), 0.0);
    }

    #[test]
    fn copy_and_add() {
        let src = AudioBuffer::from_channels(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let mut dst = AudioBuffer::new(2, 8);

        dst.copy_from(&src);
        assert_eq!(dst.num_samples(), 2);
        assert_eq!(dst.channel(1), &[3.0, 4.0]);

        dst.add_from(&src);
        assert_eq!(dst.channel(0), &[2.0, 4.0]);

        dst.apply_gain_ramp(&[0.5, 0.25]);
        assert_eq!(dst.channel(0), &[1.0, 1.0]);
    }

    #[test]
    fn range_copies() {
        let src = AudioBuffer::from_channels(vec![(0..10).map(f64::from).collect()]);
        let mut chunk = AudioBuffer::new(1, 4);

        chunk.copy_from_range(&src, 6, 4);
        assert_eq!(chunk.channel(0), &[6.0, 7.0, 8.0, 9.0]);

        let mut dst = AudioBuffer::new(1, 6);
        chunk.copy_into_range(&mut dst, 3);
        assert_eq!(dst.channel(0), &[0.0, 0.0, 0.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn clone_from_keeps_allocation() {
        let src = AudioBuffer::from_channels(vec![vec![1.0; 32]]);
        let mut dst = AudioBuffer::new(1, 32);
        let ptr = dst.channel(0).as_ptr();

        dst.clone_from(&src);
        assert_eq!(dst.channel(0).as_ptr(), ptr);
        assert_eq!(dst.channel(0), src.channel(0));
    }
}
