//! Module for signal compression (dynamics compression).

use super::*;

const DEFAULT_ATTACK_TIME_MS: f64 = 50.0;
const DEFAULT_RELEASE_TIME_MS: f64 = 250.0;

/// A simple feed-forward dynamics compressor. Supports a variable knee width,
/// attack and release times, and ratio.
///
/// The envelope is tracked per channel with a peak [`BallisticsFilter`], and
/// the gain computer works in decibels.
#[derive(Clone, Debug)]
pub struct Compressor {
    sample_rate: f64,

    threshold_db: f64,

    knee_width: f64,
    ratio: f64,

    envelope_filter: BallisticsFilter,
}

impl Compressor {
    pub fn new(num_channels: usize, sample_rate: f64) -> Self {
        let mut envelope_filter = BallisticsFilter::new(num_channels, sample_rate);
        envelope_filter.set_attack_time_ms(DEFAULT_ATTACK_TIME_MS);
        envelope_filter.set_release_time_ms(DEFAULT_RELEASE_TIME_MS);

        Self {
            sample_rate,

            threshold_db: 0.0,

            knee_width: 0.0,

            ratio: 1.0,

            envelope_filter,
        }
    }

    /// Re-initialises the compressor for a new sample rate and channel
    /// count, resetting each channel's envelope.
    ///
    /// # Safety
    ///
    /// This function may reallocate, so should not be used in a real-time context.
    pub fn prepare(&mut self, sample_rate: f64, num_channels: usize) {
        self.sample_rate = sample_rate;
        self.envelope_filter.prepare(sample_rate, num_channels);
    }

    /// Sets the compressor's threshold in decibels.
    pub fn set_threshold_level_db(&mut self, level_db: f64) {
        self.threshold_db = level_db;
    }

    /// Sets the ratio of the compressor, clamped to `1.0..=100.0`.
    pub fn set_ratio(&mut self, ratio: f64) {
        self.ratio = ratio.clamp(1.0, 100.0);
    }

    /// Sets the compressor's knee width in decibels.
    ///
    /// # Panics
    ///
    /// Panics if `width` is negative.
    pub fn set_knee_width(&mut self, width: f64) {
        debug_assert!(width.is_sign_positive());

        self.knee_width = width;
    }

    /// Sets the compressor's attack time in milliseconds.
    pub fn set_attack_time_ms(&mut self, time_ms: f64) {
        self.envelope_filter.set_attack_time_ms(time_ms);
    }

    /// Sets the compressor's release time in milliseconds.
    pub fn set_release_time_ms(&mut self, time_ms: f64) {
        self.envelope_filter.set_release_time_ms(time_ms);
    }

    pub fn threshold_db(&self) -> f64 {
        self.threshold_db
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Standard compression gain function with a rounded knee and, otherwise,
    /// a linear profile. This represents the *amount of gain to apply* for a
    /// given envelope level, not a scale.
    ///
    /// This function may be used to find the compressor's transfer function,
    /// which may be useful if you wish to draw it, for example.
    ///
    /// From *Audio Processes by David Creasey*.
    pub fn gain_function(&self, input: f64) -> f64 {
        let Self { threshold_db: thresh, knee_width: width, ratio, .. } = self;
        let half_width = width / 2.0;

        // below the knee
        if input <= (thresh - half_width) {
            0.0
        }
        // within the knee
        else if input <= (thresh + half_width) {
            (2.0 * width).recip()
                * (ratio.recip() - 1.0)
                * (input - thresh + half_width).powi(2)
        }
        // above the knee
        else {
            (ratio.recip() - 1.0) * (input - thresh)
        }
    }
}

impl Effect for Compressor {
    fn process_mono(&mut self, input: f64, channel_idx: usize) -> f64 {
        let env = self.envelope_filter.process_mono(input, channel_idx);
        let gain = db_to_level(self.gain_function(gain_to_db(env)));

        gain * input
    }

    fn get_sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn get_identifier(&self) -> &str {
        "compressor"
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(NUM_CHANNELS, DEFAULT_SAMPLE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_knee_gain_function() {
        let mut comp = Compressor::default();
        comp.set_threshold_level_db(-20.0);
        comp.set_ratio(4.0);

        assert_eq!(comp.gain_function(-30.0), 0.0);
        assert_eq!(comp.gain_function(-20.0), 0.0);
        // 12 dB over at 4:1 leaves 3 dB over, i.e. 9 dB of reduction
        assert!(within_tolerance(comp.gain_function(-8.0), -9.0, 1e-12));
    }

    #[test]
    fn soft_knee_is_continuous() {
        let mut comp = Compressor::default();
        comp.set_threshold_level_db(-20.0);
        comp.set_ratio(2.0);
        comp.set_knee_width(6.0);

        assert!(within_tolerance(comp.gain_function(-23.0), 0.0, 1e-12));
        let upper = comp.gain_function(-17.0);
        assert!(within_tolerance(upper, (0.5 - 1.0) * 3.0, 1e-12));
        assert!(comp.gain_function(-20.0) < 0.0);
    }

    #[test]
    fn ratio_is_clamped() {
        let mut comp = Compressor::default();
        comp.set_ratio(1000.0);
        assert_eq!(comp.ratio(), 100.0);

        comp.set_ratio(0.25);
        assert_eq!(comp.ratio(), 1.0);
        comp.set_threshold_level_db(-20.0);
        assert_eq!(comp.gain_function(0.0), 0.0);
    }

    #[test]
    fn unity_ratio_passes_signal() {
        let mut comp = Compressor::new(1, 48000.0);
        comp.set_threshold_level_db(-60.0);
        comp.set_ratio(1.0);

        for n in 0..4800 {
            let x = (n as f64 * 0.01).sin();
            assert!(within_tolerance(comp.process_mono(x, 0), x, 1e-12));
        }
    }

    #[test]
    fn steady_state_reduction() {
        let mut comp = Compressor::new(1, 48000.0);
        comp.set_threshold_level_db(-12.0);
        comp.set_ratio(4.0);
        comp.set_attack_time_ms(5.0);
        comp.set_release_time_ms(5.0);

        // a DC level of 0 dBFS settles 12 dB over the threshold
        let mut y = 0.0;
        for _ in 0..48000 {
            y = comp.process_mono(1.0, 0);
        }

        assert!(within_tolerance(gain_to_db(y), -9.0, 1e-6));
    }

    #[test]
    fn silence_stays_silent() {
        let mut comp = Compressor::new(2, 48000.0);
        comp.set_threshold_level_db(-60.0);
        comp.set_ratio(100.0);

        for _ in 0..128 {
            let y = comp.process_mono(0.0, 1);
            assert!(y == 0.0);
        }
    }
}
