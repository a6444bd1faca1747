//! Non-atomic value smoother.

#![allow(clippy::should_implement_trait)]

/// A linear value smoother, used to ramp gain changes over a fixed period.
///
/// Setting a new target restarts the ramp from the current value, so the
/// ramp always takes the full smoothing period regardless of distance.
#[derive(Debug, Clone)]
pub struct Smoother {
    current_value: f64,
    target_value: f64,

    step: f64,
    steps_remaining: u32,

    duration_ms: f64,
    sample_rate: f64,
}

impl Smoother {
    /// Creates a new `Smoother` which starts (and rests) at `target_value`.
    pub fn new(duration_ms: f64, target_value: f64, sample_rate: f64) -> Self {
        debug_assert!(duration_ms.is_sign_positive() && sample_rate > 0.0);

        Self {
            current_value: target_value,
            target_value,

            step: 0.0,
            steps_remaining: 0,

            duration_ms,
            sample_rate,
        }
    }

    /// Yields the `Smoother`'s next smoothed value, intended to be called
    /// per sample.
    pub fn next(&mut self) -> f64 {
        if self.steps_remaining == 0 {
            return self.current_value;
        }

        self.steps_remaining -= 1;

        if self.steps_remaining == 0 {
            self.current_value = self.target_value;
        }
        else {
            self.current_value += self.step;
        }

        self.current_value
    }

    /// Computes a block of new values and places them into `block`.
    ///
    /// Progresses the `Smoother` by `block.len()` steps.
    pub fn next_block_exact(&mut self, block: &mut [f64]) {
        if !self.is_active() {
            block.fill(self.current_value);
            return;
        }

        for x in block.iter_mut() {
            *x = self.next();
        }
    }

    /// Sets the new target value of the `Smoother`, ramping from the current
    /// value over the smoothing period. Setting the current target again has
    /// no effect.
    pub fn set_target_value(&mut self, target_value: f64) {
        if target_value == self.target_value {
            return;
        }

        self.target_value = target_value;

        let num_steps = self.period_samples();
        if num_steps == 0 {
            self.finish();
            return;
        }

        self.steps_remaining = num_steps;
        self.step = (self.target_value - self.current_value) / f64::from(num_steps);
    }

    /// Forces the `Smoother` to finish smoothing and reach its target value
    /// immediately.
    pub fn finish(&mut self) {
        self.current_value = self.target_value;
        self.steps_remaining = 0;
        self.step = 0.0;
    }

    /// Returns the `Smoother`'s current value, i.e. the last value returned
    /// by its [`next()`][Self::next()] method.
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Returns the current target value of the smoother.
    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    /// Sets the internal sample rate. Any active ramp is finished.
    pub fn reset_sample_rate(&mut self, sample_rate: f64) {
        debug_assert!(sample_rate > 0.0);
        self.sample_rate = sample_rate;
        self.finish();
    }

    /// Returns whether the `Smoother` is actively smoothing or not.
    pub fn is_active(&self) -> bool {
        self.steps_remaining > 0
    }

    fn period_samples(&self) -> u32 {
        (self.duration_ms * 0.001 * self.sample_rate).round() as u32
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(0.0, 0.0, crate::settings::DEFAULT_SAMPLE_RATE)
    }
}
