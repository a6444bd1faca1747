//! Multi-band crossover network built from Linkwitz-Riley filters.

use super::*;
use crate::dsp::{AudioBuffer, Effect};

/// A phase-compensated crossover which splits a signal into
/// `crossovers + 1` bands.
///
/// Each split runs a 4th-order Linkwitz-Riley low/high pair on whatever the
/// previous split passed up. The low output of a split is then run through
/// an allpass at every later crossover frequency so that all bands share the
/// same phase response. Summing the bands therefore gives the input passed
/// through one allpass per crossover, with a flat magnitude response.
///
/// For two crossovers `f0` and `f1` this gives:
///
/// - low = `AP(f1)(LP(f0)(x))`
/// - mid = `LP(f1)(HP(f0)(x))`
/// - high = `HP(f1)(HP(f0)(x))`
#[derive(Clone, Debug)]
pub struct CrossoverNetwork {
    /// One low/high splitter per crossover.
    splits: Vec<LinkwitzRileyFilter>,
    /// For split `i`, the allpasses at crossovers `i + 1 ..`.
    compensation: Vec<Vec<LinkwitzRileyFilter>>,

    bands: Vec<AudioBuffer>,

    sample_rate: f64,
}

impl CrossoverNetwork {
    /// Creates a network with one split per entry of `crossovers_hz`. The band
    /// buffers are empty until [`prepare()`](Self::prepare) is called.
    pub fn new(crossovers_hz: &[f64], num_channels: usize, sample_rate: f64) -> Self {
        let num_crossovers = crossovers_hz.len();

        let splits = crossovers_hz
            .iter()
            .map(|&freq| LinkwitzRileyFilter::new(num_channels, sample_rate).with_cutoff(freq))
            .collect();

        let compensation = (0..num_crossovers)
            .map(|i| {
                crossovers_hz[i + 1..]
                    .iter()
                    .map(|&freq| {
                        LinkwitzRileyFilter::new(num_channels, sample_rate)
                            .with_type(FilterType::Allpass)
                            .with_cutoff(freq)
                    })
                    .collect()
            })
            .collect();

        Self {
            splits,
            compensation,
            bands: (0..=num_crossovers).map(|_| AudioBuffer::default()).collect(),
            sample_rate,
        }
    }

    /// Re-initialises every filter and sizes the band buffers for
    /// `max_block_size` samples per channel.
    ///
    /// # Safety
    ///
    /// This function may reallocate, so should not be used in a real-time context.
    pub fn prepare(&mut self, sample_rate: f64, num_channels: usize, max_block_size: usize) {
        self.sample_rate = sample_rate;

        self.filters_mut().for_each(|f| f.prepare(sample_rate, num_channels));
        self.bands
            .iter_mut()
            .for_each(|band| band.resize(num_channels, max_block_size));
    }

    /// Sets the frequency of crossover `idx`, updating its splitter and every
    /// compensating allpass at that frequency. Filter state is kept.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn set_crossover(&mut self, idx: usize, freq_hz: f64) {
        self.splits[idx].set_cutoff_freq(freq_hz);

        // split `i` holds the allpass for crossover `idx` at position
        // `idx - i - 1`
        for (i, allpasses) in self.compensation.iter_mut().enumerate().take(idx) {
            allpasses[idx - i - 1].set_cutoff_freq(freq_hz);
        }
    }

    /// Sets every crossover frequency in order. Extra values are ignored.
    pub fn set_crossovers(&mut self, crossovers_hz: &[f64]) {
        for (idx, &freq) in crossovers_hz.iter().enumerate().take(self.num_crossovers()) {
            self.set_crossover(idx, freq);
        }
    }

    /// The current (clamped) frequency of crossover `idx`.
    pub fn crossover(&self, idx: usize) -> f64 {
        self.splits[idx].cutoff_freq()
    }

    pub fn num_crossovers(&self) -> usize {
        self.splits.len()
    }

    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    /// Splits `input` into the band buffers. Every band buffer takes the
    /// length of `input`.
    ///
    /// Channels beyond the prepared channel count are ignored, and
    /// `input.num_samples()` must not exceed the prepared block size.
    pub fn process(&mut self, input: &AudioBuffer) {
        let num_samples = input.num_samples();
        let num_channels = input
            .num_channels()
            .min(self.splits.first().map_or(usize::MAX, |f| f.num_channels()));

        for band in &mut self.bands {
            band.set_num_samples(num_samples);
        }

        let last = self.splits.len();

        for ch in 0..num_channels.min(self.bands[0].num_channels()) {
            let samples = input.channel(ch);

            for (n, &sample) in samples.iter().enumerate() {
                let mut remainder = sample;

                for (i, split) in self.splits.iter_mut().enumerate() {
                    let (mut low, high) = split.process_high_low(remainder, ch);

                    for ap in &mut self.compensation[i] {
                        low = ap.process_mono(low, ch);
                    }

                    self.bands[i].channel_mut(ch)[n] = low;
                    remainder = high;
                }

                self.bands[last].channel_mut(ch)[n] = remainder;
            }
        }
    }

    /// The band buffers, lowest band first.
    pub fn bands(&self) -> &[AudioBuffer] {
        &self.bands
    }

    pub fn bands_mut(&mut self) -> &mut [AudioBuffer] {
        &mut self.bands
    }

    fn filters_mut(&mut self) -> impl Iterator<Item = &mut LinkwitzRileyFilter> {
        self.splits
            .iter_mut()
            .chain(self.compensation.iter_mut().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const SR: f64 = 48000.0;
    const LEN: usize = 1 << 15;

    fn noise_buffer(seed: u64) -> AudioBuffer {
        let mut rng = StdRng::seed_from_u64(seed);
        let ch = (0..LEN).map(|_| rng.random_range(-1.0..1.0)).collect();
        AudioBuffer::from_channels(vec![ch])
    }

    fn three_band(f0: f64, f1: f64) -> CrossoverNetwork {
        let mut xover = CrossoverNetwork::new(&[f0, f1], 1, SR);
        xover.prepare(SR, 1, LEN);
        xover
    }

    fn band_sum(xover: &CrossoverNetwork) -> Vec<f64> {
        let mut sum = vec![0.0; xover.bands()[0].num_samples()];

        for band in xover.bands() {
            sum.iter_mut().zip(band.channel(0)).for_each(|(s, x)| *s += x);
        }

        sum
    }

    /// The input passed through an allpass at each crossover.
    fn allpass_reference(input: &[f64], f0: f64, f1: f64) -> Vec<f64> {
        let mut ap0 = LinkwitzRileyFilter::new(1, SR)
            .with_type(FilterType::Allpass)
            .with_cutoff(f0);
        let mut ap1 = LinkwitzRileyFilter::new(1, SR)
            .with_type(FilterType::Allpass)
            .with_cutoff(f1);

        input
            .iter()
            .map(|&x| ap1.process_mono(ap0.process_mono(x, 0), 0))
            .collect()
    }

    fn energy(x: &[f64]) -> f64 {
        x.iter().map(|s| s * s).sum()
    }

    #[test]
    fn band_sum_equals_allpass_chain() {
        let pairs = [(100.0, 1000.0), (450.0, 2000.0), (1000.0, 8000.0), (250.0, 5000.0)];

        for (seed, (f0, f1)) in pairs.into_iter().enumerate() {
            let input = noise_buffer(seed as u64);
            let mut xover = three_band(f0, f1);
            xover.process(&input);

            let sum = band_sum(&xover);
            let reference = allpass_reference(input.channel(0), f0, f1);

            let max_diff = sum
                .iter()
                .zip(&reference)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);

            assert!(max_diff < 1e-9, "{f0}/{f1}: max diff {max_diff}");
        }
    }

    #[test]
    fn band_sum_preserves_energy() {
        for (f0, f1) in [(100.0, 1000.0), (450.0, 2000.0), (1000.0, 8000.0)] {
            let input = noise_buffer(42);
            let mut xover = three_band(f0, f1);
            xover.process(&input);

            let ratio_db = 10.0 * (energy(&band_sum(&xover)) / energy(input.channel(0))).log10();
            assert!(ratio_db.abs() < 0.25, "{f0}/{f1}: {ratio_db} dB");
        }
    }

    #[test]
    fn out_of_order_crossovers_still_reconstruct() {
        let input = noise_buffer(7);
        let mut xover = three_band(900.0, 300.0);
        xover.process(&input);

        let sum = band_sum(&xover);
        assert!(sum.iter().all(|x| x.is_finite()));

        let reference = allpass_reference(input.channel(0), 900.0, 300.0);
        assert!(sum.iter().zip(&reference).all(|(a, b)| (a - b).abs() < 1e-9));
    }

    #[test]
    fn bands_follow_block_length() {
        let mut xover = CrossoverNetwork::new(&[500.0, 5000.0], 2, SR);
        xover.prepare(SR, 2, 512);

        let input = AudioBuffer::from_channels(vec![vec![0.5; 128], vec![-0.5; 128]]);
        xover.process(&input);

        assert_eq!(xover.num_bands(), 3);
        for band in xover.bands() {
            assert_eq!(band.num_samples(), 128);
            assert_eq!(band.num_channels(), 2);
        }
    }

    #[test]
    fn retuning_updates_compensation() {
        let mut xover = three_band(200.0, 2000.0);
        xover.set_crossovers(&[300.0, 3000.0]);

        assert_eq!(xover.crossover(0), 300.0);
        assert_eq!(xover.crossover(1), 3000.0);
        assert_eq!(xover.compensation[0][0].cutoff_freq(), 3000.0);

        let input = noise_buffer(9);
        xover.process(&input);

        let reference = allpass_reference(input.channel(0), 300.0, 3000.0);
        let sum = band_sum(&xover);
        assert!(sum.iter().zip(&reference).all(|(a, b)| (a - b).abs() < 1e-9));
    }

    #[test]
    fn separates_tones() {
        let mut xover = three_band(450.0, 2000.0);
        let tone: Vec<f64> = (0..LEN).map(|n| (TAU * 100.0 * n as f64 / SR).sin()).collect();
        xover.process(&AudioBuffer::from_channels(vec![tone]));

        let tail = LEN - 4800..LEN;
        let level = |b: usize| energy(&xover.bands()[b].channel(0)[tail.clone()]);

        assert!(level(1) < level(0) * 1e-4);
        assert!(level(2) < level(0) * 1e-6);
    }
}
