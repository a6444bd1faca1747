//! Ballistics filter, used for dynamics.

use crate::dsp::Effect;
use crate::prelude::*;
use BallisticsLevelType as LT;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BallisticsLevelType {
    #[default]
    Peak,
    Rms,
}

/// A filter for measuring attack and release ballistics, most useful for envelope
/// following.
///
/// Based on the JUCE implementation.
#[derive(Clone, Debug)]
pub struct BallisticsFilter {
    /// The last output sample of each channel.
    y_old: Vec<f64>,

    attack_time_ms: f64,
    release_time_ms: f64,

    /// The "constant time envelope" attack level.
    cte_attack: f64,
    /// The "constant time envelope" release level.
    cte_release: f64,

    /// The level calculation type.
    level_type: LT,

    /// The internal sample rate.
    sample_rate: f64,
}

impl BallisticsFilter {
    /// Creates a new `BallisticsFilter` which can store `num_channels` samples.
    pub fn new(num_channels: usize, sample_rate: f64) -> Self {
        Self {
            y_old: vec![0.0; num_channels],

            attack_time_ms: 0.0,
            release_time_ms: 0.0,

            cte_attack: 0.0,
            cte_release: 0.0,

            level_type: LT::Peak,
            sample_rate,
        }
    }

    /// Re-initialises the filter for a new sample rate and channel count.
    /// The envelope of every channel is reset to `0.0`.
    ///
    /// # Safety
    ///
    /// This function may reallocate, so should not be used in a real-time context.
    pub fn prepare(&mut self, sample_rate: f64, num_channels: usize) {
        debug_assert!(sample_rate > 0.0);
        self.sample_rate = sample_rate;

        self.y_old.clear();
        self.y_old.resize(num_channels, 0.0);

        self.cte_attack = self.calculate_cte(self.attack_time_ms);
        self.cte_release = self.calculate_cte(self.release_time_ms);
    }

    /// Sets the attack time of the filter in milliseconds.
    ///
    /// Values less than `0.001` ms (`1.0` µs) are automatically snapped to `0.0`.
    pub fn set_attack_time_ms(&mut self, time_ms: f64) {
        debug_assert!(time_ms.is_sign_positive());
        self.attack_time_ms = time_ms;
        self.cte_attack = self.calculate_cte(time_ms);
    }

    /// Sets the release time of the filter in milliseconds.
    ///
    /// Values less than `0.001` ms (`1.0` µs) are automatically snapped to `0.0`.
    pub fn set_release_time_ms(&mut self, time_ms: f64) {
        debug_assert!(time_ms.is_sign_positive());
        self.release_time_ms = time_ms;
        self.cte_release = self.calculate_cte(time_ms);
    }

    /// Sets the level calculation type for the filter to use (either `Peak` or `RMS`
    /// values).
    ///
    /// Both types yield positive values, but `RMS` may give more weight to larger
    /// input values.
    pub fn set_level_type(&mut self, level_calculation_type: BallisticsLevelType) {
        self.level_type = level_calculation_type;
    }

    /// The current envelope of `channel_idx`, in the filter's level units.
    pub fn envelope(&self, channel_idx: usize) -> f64 {
        match self.level_type {
            LT::Peak => self.y_old[channel_idx],
            LT::Rms => self.y_old[channel_idx].sqrt(),
        }
    }

    /// Calculates the constant time envelope ("CTE") value for the given period.
    ///
    /// Values less than `0.001` ms (`1.0` µs) are automatically snapped to `0.0`.
    fn calculate_cte(&self, time_ms: f64) -> f64 {
        if time_ms < 0.001 {
            0.0
        }
        else {
            ((-TAU * 1000.0 / self.sample_rate) / time_ms).exp()
        }
    }
}

impl Effect for BallisticsFilter {
    fn process_mono(&mut self, input: f64, channel_idx: usize) -> f64 {
        // ready the input sample based on the type of calculation
        let input = match self.level_type {
            LT::Peak => input.abs(),
            LT::Rms => input * input,
        };

        let y_old = self.y_old[channel_idx];
        let cte = if input > y_old { self.cte_attack } else { self.cte_release };

        let out = input + cte * (y_old - input);
        self.y_old[channel_idx] = out;

        match self.level_type {
            LT::Peak => out,
            LT::Rms => out.sqrt(),
        }
    }

    fn get_sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn get_identifier(&self) -> &str {
        "ballistics_filter"
    }
}
