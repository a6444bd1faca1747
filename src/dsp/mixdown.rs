//! Gain staging and solo/mute-aware band summing.

use super::*;

/// The mute and solo state of one band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BandGate {
    pub mute: bool,
    pub solo: bool,
}

impl From<&CompressorBand> for BandGate {
    fn from(band: &CompressorBand) -> Self {
        Self { mute: band.is_muted(), solo: band.is_soloed() }
    }
}

/// Whether any band is soloed.
pub fn any_soloed(gates: &[BandGate]) -> bool {
    gates.iter().any(|gate| gate.solo)
}

/// Whether a band is included in the mix: soloed bands win when any band is
/// soloed, otherwise every unmuted band is heard.
pub fn band_is_audible(gate: BandGate, any_soloed: bool) -> bool {
    if any_soloed { gate.solo } else { !gate.mute }
}

/// Applies the smoothed input gain before the split and sums the audible
/// bands with the smoothed output gain afterwards.
#[derive(Clone, Debug)]
pub struct MixdownStage {
    input_gain: Smoother,
    output_gain: Smoother,

    gain_scratch: Vec<f64>,
}

impl MixdownStage {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            input_gain: Smoother::new(GAIN_SMOOTHING_TIME_MS, 1.0, sample_rate),
            output_gain: Smoother::new(GAIN_SMOOTHING_TIME_MS, 1.0, sample_rate),
            gain_scratch: Vec::new(),
        }
    }

    /// Allocates the gain scratch buffer and snaps both gains to their
    /// targets.
    ///
    /// # Safety
    ///
    /// This function may reallocate, so should not be used in a real-time context.
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) {
        self.input_gain.reset_sample_rate(sample_rate);
        self.output_gain.reset_sample_rate(sample_rate);

        self.gain_scratch.clear();
        self.gain_scratch.resize(max_block_size, 1.0);
    }

    /// Sets the input gain target in decibels.
    pub fn set_input_gain_db(&mut self, gain_db: f64) {
        self.input_gain.set_target_value(db_to_level(gain_db));
    }

    /// Sets the output gain target in decibels.
    pub fn set_output_gain_db(&mut self, gain_db: f64) {
        self.output_gain.set_target_value(db_to_level(gain_db));
    }

    /// Applies the input gain to `buffer` in place.
    pub fn apply_input_gain(&mut self, buffer: &mut AudioBuffer) {
        Self::apply_gain(&mut self.input_gain, &mut self.gain_scratch, buffer);
    }

    /// Sums every audible band into `output` and applies the output gain.
    /// `gates` pairs with `bands` by index.
    pub fn mix(&mut self, bands: &[AudioBuffer], gates: &[BandGate], output: &mut AudioBuffer) {
        debug_assert_eq!(bands.len(), gates.len());

        output.clear();
        let soloing = any_soloed(gates);

        for (band, &gate) in bands.iter().zip(gates) {
            if band_is_audible(gate, soloing) {
                output.add_from(band);
            }
        }

        Self::apply_gain(&mut self.output_gain, &mut self.gain_scratch, output);
    }

    pub fn input_gain(&self) -> f64 {
        self.input_gain.current_value()
    }

    pub fn output_gain(&self) -> f64 {
        self.output_gain.current_value()
    }

    fn apply_gain(smoother: &mut Smoother, scratch: &mut [f64], buffer: &mut AudioBuffer) {
        let num_samples = buffer.num_samples().min(scratch.len());

        if !smoother.is_active() && eps_eq(smoother.current_value(), 1.0) {
            return;
        }

        let gains = &mut scratch[..num_samples];
        smoother.next_block_exact(gains);
        buffer.apply_gain_ramp(gains);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 1000.0;

    #[test]
    fn solo_mute_truth_table() {
        // every combination of mute and solo over three bands
        for bits in 0..64u32 {
            let gates: Vec<BandGate> = (0..3)
                .map(|b| BandGate { mute: (bits >> b) & 1 == 1, solo: (bits >> (b + 3)) & 1 == 1 })
                .collect();

            let soloing = gates.iter().any(|g| g.solo);
            assert_eq!(any_soloed(&gates), soloing);

            for gate in &gates {
                let expected = if soloing { gate.solo } else { !gate.mute };
                assert_eq!(band_is_audible(*gate, soloing), expected);
            }
        }
    }

    #[test]
    fn solo_overrides_mute() {
        let gate = BandGate { mute: true, solo: true };
        assert!(band_is_audible(gate, true));
        assert!(!band_is_audible(BandGate { mute: false, solo: false }, true));
    }

    #[test]
    fn sums_audible_bands() {
        let bands = [
            AudioBuffer::from_channels(vec![vec![1.0; 4]]),
            AudioBuffer::from_channels(vec![vec![10.0; 4]]),
            AudioBuffer::from_channels(vec![vec![100.0; 4]]),
        ];
        let mut output = AudioBuffer::new(1, 4);
        let mut mixdown = MixdownStage::new(SR);
        mixdown.prepare(SR, 4);

        let gates = [BandGate::default(), BandGate { mute: true, solo: false }, BandGate::default()];
        mixdown.mix(&bands, &gates, &mut output);
        assert_eq!(output.channel(0), &[101.0; 4]);

        let gates = [BandGate::default(), BandGate { mute: true, solo: true }, BandGate::default()];
        mixdown.mix(&bands, &gates, &mut output);
        assert_eq!(output.channel(0), &[10.0; 4]);
    }

    #[test]
    fn gain_changes_are_ramped() {
        let mut mixdown = MixdownStage::new(SR);
        mixdown.prepare(SR, 100);

        // -inf-ish target: the ramp runs over 50 samples at 1 kHz
        mixdown.set_input_gain_db(-120.0);

        let mut buffer = AudioBuffer::from_channels(vec![vec![1.0; 100]]);
        mixdown.apply_input_gain(&mut buffer);

        let ch = buffer.channel(0);
        assert!(ch[0] < 1.0 && ch[0] > 0.9);
        assert!(ch.windows(2).take(49).all(|w| w[1] < w[0]));
        assert!(ch[49] < 1e-5);
        assert!(ch[99] < 1e-5);
    }

    #[test]
    fn prepare_snaps_gains() {
        let mut mixdown = MixdownStage::new(SR);
        mixdown.set_output_gain_db(6.0);
        mixdown.prepare(SR, 16);

        assert!(within_tolerance(mixdown.output_gain(), db_to_level(6.0), 1e-12));
    }

    #[test]
    fn unity_gain_leaves_buffer_untouched() {
        let mut mixdown = MixdownStage::new(SR);
        mixdown.prepare(SR, 8);

        let mut buffer = AudioBuffer::from_channels(vec![vec![0.3; 8]]);
        mixdown.apply_input_gain(&mut buffer);
        assert_eq!(buffer.channel(0), &[0.3; 8]);
    }
}
