//! Windowed magnitude spectra in decibels, for display.

use super::*;
use crate::dsp::analysis::{block_fifo, FifoConsumer, FifoProducer};
use crate::util::window::{blackman_harris, multiply_buffers};
use realfft::{num_complex::Complex, RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// The supported transform sizes, as powers of two.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FftOrder {
    #[default]
    Order2048 = 11,
    Order4096 = 12,
    Order8192 = 13,
}

impl FftOrder {
    /// The transform size in samples.
    pub const fn fft_size(self) -> usize {
        1 << self as usize
    }

    /// The number of magnitude bins in each frame.
    pub const fn num_bins(self) -> usize {
        self.fft_size() / 2
    }
}

/// Turns blocks of audio into frames of windowed FFT magnitudes in decibels,
/// queued for rendering.
///
/// Each frame holds `fft_size / 2` values, none lower than the floor passed
/// to [`produce_fft_data_for_rendering()`](Self::produce_fft_data_for_rendering).
pub struct FftDataGenerator {
    order: FftOrder,

    window: Vec<f64>,

    fft: Arc<dyn RealToComplex<f64>>,
    input: Vec<f64>,
    spectrum: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,

    frame: Vec<f64>,
    producer: FifoProducer<Vec<f64>>,
    consumer: FifoConsumer<Vec<f64>>,
}

impl FftDataGenerator {
    pub fn new(order: FftOrder) -> Self {
        let fft = RealFftPlanner::new().plan_fft_forward(order.fft_size());
        let (producer, consumer) = block_fifo(&vec![0.0; order.num_bins()]);

        let mut generator = Self {
            order,
            window: Vec::new(),
            input: fft.make_input_vec(),
            spectrum: fft.make_output_vec(),
            scratch: fft.make_scratch_vec(),
            fft,
            frame: Vec::new(),
            producer,
            consumer,
        };

        generator.change_order(order);
        generator
    }

    /// Reallocates the window, transform and scratch storage for a new
    /// transform size, and empties the output queue.
    ///
    /// # Safety
    ///
    /// This function reallocates, so should not be used in a real-time context.
    pub fn change_order(&mut self, order: FftOrder) {
        let size = order.fft_size();
        self.order = order;

        self.window = blackman_harris(size);

        self.fft = RealFftPlanner::new().plan_fft_forward(size);
        self.input = self.fft.make_input_vec();
        self.spectrum = self.fft.make_output_vec();
        self.scratch = self.fft.make_scratch_vec();

        self.frame = vec![0.0; order.num_bins()];
        (self.producer, self.consumer) = block_fifo(&self.frame);

        log::debug!("FFT data generator resized to {size} samples");
    }

    /// Windows the first `fft_size` samples of `audio` (zero-padding if
    /// shorter), transforms them and queues the magnitudes, normalised by the
    /// bin count and converted to decibels with `floor_db` as the floor.
    ///
    /// Returns `Ok(false)` if the queue was full and the frame was dropped.
    pub fn produce_fft_data_for_rendering(&mut self, audio: &[f64], floor_db: f64) -> Result<bool> {
        let size = self.fft_size();
        let num_bins = self.order.num_bins();

        let len = audio.len().min(size);
        self.input[..len].copy_from_slice(&audio[..len]);
        self.input[len..].fill(0.0);

        multiply_buffers(&mut self.input, &self.window);

        self.fft.process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch)?;

        let norm = (num_bins as f64).recip();

        for (out, bin) in self.frame.iter_mut().zip(&self.spectrum) {
            let magnitude = bin.norm();
            let magnitude = if magnitude.is_finite() { magnitude * norm } else { 0.0 };

            *out = gain_to_db_floored(magnitude, floor_db);
        }

        Ok(self.producer.push(&self.frame))
    }

    /// Pulls the oldest queued frame into `frame`. Returns `false` if none is
    /// available.
    pub fn get_fft_data(&mut self, frame: &mut Vec<f64>) -> bool {
        self.consumer.pull(frame)
    }

    pub fn num_available_fft_data_blocks(&self) -> usize {
        self.consumer.num_available_for_reading()
    }

    pub fn fft_size(&self) -> usize {
        self.order.fft_size()
    }

    pub fn order(&self) -> FftOrder {
        self.order
    }
}

impl std::fmt::Debug for FftDataGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftDataGenerator")
            .field("order", &self.order)
            .field("available", &self.num_available_fft_data_blocks())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 48000.0;

    fn sine(freq: f64, len: usize) -> Vec<f64> {
        (0..len).map(|n| (TAU * freq * n as f64 / SR).sin()).collect()
    }

    #[test]
    fn order_sizes() {
        assert_eq!(FftOrder::Order2048.fft_size(), 2048);
        assert_eq!(FftOrder::Order4096.fft_size(), 4096);
        assert_eq!(FftOrder::Order8192.num_bins(), 4096);
    }

    #[test]
    fn sine_peaks_at_its_bin() {
        let mut generator = FftDataGenerator::new(FftOrder::Order2048);
        // bin 64 of 2048 at 48 kHz
        let freq = 64.0 * SR / 2048.0;

        assert!(generator.produce_fft_data_for_rendering(&sine(freq, 2048), -120.0).unwrap());

        let mut frame = Vec::new();
        assert!(generator.get_fft_data(&mut frame));
        assert_eq!(frame.len(), 1024);

        let peak = frame
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(64));

        // a unit sine reads as the window's coherent gain
        assert!(within_tolerance(frame[64], level_to_db(0.35875), 0.1));
    }

    #[test]
    fn silence_reads_as_floor() {
        let mut generator = FftDataGenerator::new(FftOrder::Order4096);
        generator.produce_fft_data_for_rendering(&[0.0; 4096], -48.0).unwrap();

        let mut frame = Vec::new();
        assert!(generator.get_fft_data(&mut frame));
        assert_eq!(frame.len(), 2048);
        assert!(frame.iter().all(|&db| db == -48.0));
    }

    #[test]
    fn short_input_is_zero_padded() {
        let mut generator = FftDataGenerator::new(FftOrder::Order2048);
        generator.produce_fft_data_for_rendering(&[0.5; 100], -72.0).unwrap();

        let mut frame = Vec::new();
        assert!(generator.get_fft_data(&mut frame));
        assert!(frame.iter().all(|db| db.is_finite() && *db >= -72.0));
    }

    #[test]
    fn change_order_resizes_frames() {
        let mut generator = FftDataGenerator::new(FftOrder::Order2048);
        generator.produce_fft_data_for_rendering(&[0.0; 2048], -48.0).unwrap();

        generator.change_order(FftOrder::Order8192);
        assert_eq!(generator.fft_size(), 8192);
        assert_eq!(generator.num_available_fft_data_blocks(), 0);

        generator.produce_fft_data_for_rendering(&[0.0; 8192], -48.0).unwrap();
        let mut frame = Vec::new();
        assert!(generator.get_fft_data(&mut frame));
        assert_eq!(frame.len(), 4096);
    }

    #[test]
    fn full_queue_drops_frames() {
        let mut generator = FftDataGenerator::new(FftOrder::Order2048);

        for _ in 0..FIFO_CAPACITY {
            assert!(generator.produce_fft_data_for_rendering(&[], -48.0).unwrap());
        }

        assert!(!generator.produce_fft_data_for_rendering(&[], -48.0).unwrap());
        assert_eq!(generator.num_available_fft_data_blocks(), FIFO_CAPACITY);
    }
}
