use super::*;

/// The lowest cutoff the filter accepts.
const MIN_CUTOFF_HZ: f64 = 1.0;
/// The highest cutoff the filter accepts, as a proportion of the sample rate.
/// `tan()` in the pre-warp diverges at Nyquist.
const MAX_CUTOFF_RATIO: f64 = 0.49;

#[derive(Clone, Copy, Default, Debug)]
struct LRFCoefs {
    g: f64,
    h: f64,
    r2: f64,
}

/// Per-channel filter state: two integrator states for each of the two
/// cascaded 2nd-order sections.
type LRFState = [f64; 4];

/// A 4th order Linkwitz-Riley filter, which is commonly used for crossovers. See the
/// [`process_high_low()`](Self::process_high_low) method for obtaining a low- and
/// high-passed output simultaneously.
///
/// The sum of the low- and high-passed outputs (at the same cutoff) are equivalent
/// to an allpass filter at that cutoff with a flat magnitude response, hence why they
/// are favored for crossovers.
///
/// Based on the Topology-Preserving Transform (TPT) filter structure, found in the JUCE
/// framework.
#[derive(Clone, Debug)]
pub struct LinkwitzRileyFilter {
    /// Filter coefficients.
    coefs: LRFCoefs,

    /// Filter state, one set per channel.
    state: Vec<LRFState>,

    /// Filter cutoff frequency.
    cutoff: f64,

    /// Filter type.
    filter_type: FilterType,

    /// The internal sample rate.
    sample_rate: f64,
}

impl LinkwitzRileyFilter {
    pub fn new(num_channels: usize, sample_rate: f64) -> Self {
        let mut s = Self {
            coefs: LRFCoefs::default(),
            state: vec![LRFState::default(); num_channels],
            cutoff: 440.0,
            filter_type: FilterType::Lowpass,
            sample_rate,
        };

        s.update();
        s
    }

    pub fn with_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }

    pub fn with_cutoff(mut self, freq_hz: f64) -> Self {
        self.set_cutoff_freq(freq_hz);
        self
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Sets the cutoff frequency. Only the coefficients change; the filter
    /// state is kept, so this is safe to call between blocks.
    ///
    /// The cutoff is clamped to `1 Hz ..= 0.49 × sample rate`.
    pub fn set_cutoff_freq(&mut self, freq_hz: f64) {
        let max = self.sample_rate * MAX_CUTOFF_RATIO;
        let freq_hz = if freq_hz.is_finite() { freq_hz } else { max };

        self.cutoff = freq_hz.clamp(MIN_CUTOFF_HZ, max.max(MIN_CUTOFF_HZ));
        self.update();
    }

    pub fn cutoff_freq(&self) -> f64 {
        self.cutoff
    }

    /// Re-initialises the filter for a new sample rate and channel count,
    /// clearing all state.
    ///
    /// # Safety
    ///
    /// This function may reallocate, so should not be used in a real-time context.
    pub fn prepare(&mut self, sample_rate: f64, num_channels: usize) {
        debug_assert!(sample_rate > 0.0);

        self.sample_rate = sample_rate;
        self.state.clear();
        self.state.resize(num_channels, LRFState::default());

        // re-clamp against the new Nyquist
        self.set_cutoff_freq(self.cutoff);
    }

    pub fn num_channels(&self) -> usize {
        self.state.len()
    }

    /// Processes one sample on channel `ch`, returning the low- and
    /// high-passed outputs `(low, high)`. The filter type is ignored.
    ///
    /// `low + high` equals the allpass output at the same cutoff.
    pub fn process_high_low(&mut self, input: f64, ch: usize) -> (f64, f64) {
        let LRFCoefs { g, h, r2 } = self.coefs;
        let [s1, s2, s3, s4] = &mut self.state[ch];

        let (high, band, low) = Self::tpt_section(input, g, h, r2, s1, s2);
        let (_, _, low_2) = Self::tpt_section(low, g, h, r2, s3, s4);

        (low_2, low - r2 * band + high - low_2)
    }

    /// One 2nd-order TPT state-variable section, returning `(high, band, low)`.
    #[inline]
    fn tpt_section(
        input: f64,
        g: f64,
        h: f64,
        r2: f64,
        s1: &mut f64,
        s2: &mut f64,
    ) -> (f64, f64, f64) {
        let high = (input - (r2 + g) * *s1 - *s2) * h;

        let band = g * high + *s1;
        *s1 = g * high + band;

        let low = g * band + *s2;
        *s2 = g * band + low;

        (high, band, low)
    }

    fn update(&mut self) {
        let LRFCoefs { g, h, r2 } = &mut self.coefs;

        *g = (PI * self.cutoff / self.sample_rate).tan();
        *r2 = SQRT_2;
        *h = (1.0 + *r2 * *g + *g * *g).recip();
    }
}

impl Effect for LinkwitzRileyFilter {
    fn process_mono(&mut self, input: f64, channel_idx: usize) -> f64 {
        let LRFCoefs { g, h, r2 } = self.coefs;
        let [s1, s2, s3, s4] = &mut self.state[channel_idx];

        let (high, band, low) = Self::tpt_section(input, g, h, r2, s1, s2);

        match self.filter_type {
            FilterType::Allpass => low - r2 * band + high,
            FilterType::Lowpass => Self::tpt_section(low, g, h, r2, s3, s4).2,
            FilterType::Highpass => Self::tpt_section(high, g, h, r2, s3, s4).0,
        }
    }

    fn get_sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn get_identifier(&self) -> &str {
        "linkwitz_riley_filter"
    }
}
