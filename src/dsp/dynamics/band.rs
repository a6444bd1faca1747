//! A single band of the multiband compressor.

use super::*;
use std::sync::Arc;

/// The per-block settings of one compressor band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandSettings {
    pub threshold_db: f64,
    pub attack_ms: f64,
    pub release_ms: f64,
    pub ratio: f64,

    pub bypassed: bool,
    pub mute: bool,
    pub solo: bool,
}

impl Default for BandSettings {
    fn default() -> Self {
        Self {
            threshold_db: 0.0,
            attack_ms: 50.0,
            release_ms: 250.0,
            ratio: 3.0,

            bypassed: false,
            mute: false,
            solo: false,
        }
    }
}

/// Input and output RMS levels of a band in decibels, written by the audio
/// thread and read by the UI thread.
///
/// Levels never read lower than [`MINUS_INFINITY_DB`].
#[derive(Debug)]
pub struct BandMeters {
    input_db: AtomicF64,
    output_db: AtomicF64,
}

impl BandMeters {
    pub fn input_db(&self) -> f64 {
        self.input_db.lr()
    }

    pub fn output_db(&self) -> f64 {
        self.output_db.lr()
    }

    /// Resets both meters to [`MINUS_INFINITY_DB`].
    pub fn reset(&self) {
        self.input_db.sr(MINUS_INFINITY_DB);
        self.output_db.sr(MINUS_INFINITY_DB);
    }

    fn set_input_level(&self, rms: f64) {
        self.input_db.sr(gain_to_db(rms));
    }

    fn set_output_level(&self, rms: f64) {
        self.output_db.sr(gain_to_db(rms));
    }
}

impl Default for BandMeters {
    fn default() -> Self {
        Self {
            input_db: AtomicF64::new(MINUS_INFINITY_DB),
            output_db: AtomicF64::new(MINUS_INFINITY_DB),
        }
    }
}

/// A [`Compressor`] with the bypass, mute and solo state of its band, and
/// its level meters.
///
/// The band only exposes mute and solo; whether it is heard is decided when
/// the bands are summed.
#[derive(Debug)]
pub struct CompressorBand {
    compressor: Compressor,
    settings: BandSettings,

    meters: Arc<BandMeters>,
}

impl CompressorBand {
    pub fn new(num_channels: usize, sample_rate: f64) -> Self {
        let mut band = Self {
            compressor: Compressor::new(num_channels, sample_rate),
            settings: BandSettings::default(),
            meters: Arc::new(BandMeters::default()),
        };

        band.apply_settings();
        band
    }

    /// Re-initialises the compressor state and meters.
    ///
    /// # Safety
    ///
    /// This function may reallocate, so should not be used in a real-time context.
    pub fn prepare(&mut self, sample_rate: f64, num_channels: usize) {
        self.compressor.prepare(sample_rate, num_channels);
        self.meters.reset();
    }

    /// Copies the band's settings for the next block.
    pub fn update_settings(&mut self, settings: &BandSettings) {
        if self.settings != *settings {
            self.settings = *settings;
            self.apply_settings();
        }
    }

    /// Meters the buffer, compresses it in place unless bypassed, and
    /// meters the result.
    pub fn process(&mut self, buffer: &mut AudioBuffer) {
        self.meters.set_input_level(buffer.rms_level());

        if !self.settings.bypassed {
            for (ch, samples) in buffer.iter_channels_mut().enumerate() {
                self.compressor.process_slice(samples, ch);
            }
        }

        self.meters.set_output_level(buffer.rms_level());
    }

    /// A handle to this band's meters, for reading from another thread.
    pub fn meters(&self) -> Arc<BandMeters> {
        Arc::clone(&self.meters)
    }

    pub fn settings(&self) -> &BandSettings {
        &self.settings
    }

    pub fn is_bypassed(&self) -> bool {
        self.settings.bypassed
    }

    pub fn is_muted(&self) -> bool {
        self.settings.mute
    }

    pub fn is_soloed(&self) -> bool {
        self.settings.solo
    }

    fn apply_settings(&mut self) {
        let BandSettings { threshold_db, attack_ms, release_ms, ratio, .. } = self.settings;

        self.compressor.set_threshold_level_db(threshold_db);
        self.compressor.set_attack_time_ms(attack_ms);
        self.compressor.set_release_time_ms(release_ms);
        self.compressor.set_ratio(ratio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loud_buffer() -> AudioBuffer {
        AudioBuffer::from_channels(vec![vec![0.9; 4800], vec![-0.9; 4800]])
    }

    fn squashing() -> BandSettings {
        BandSettings {
            threshold_db: -40.0,
            attack_ms: 5.0,
            ratio: 20.0,
            ..BandSettings::default()
        }
    }

    #[test]
    fn silent_buffer_meters_at_floor() {
        let mut band = CompressorBand::new(2, 48000.0);
        let mut buffer = AudioBuffer::new(2, 512);

        band.process(&mut buffer);

        assert_eq!(band.meters().input_db(), MINUS_INFINITY_DB);
        assert_eq!(band.meters().output_db(), MINUS_INFINITY_DB);
    }

    #[test]
    fn compression_lowers_output_meter() {
        let mut band = CompressorBand::new(2, 48000.0);
        band.update_settings(&squashing());

        let mut buffer = loud_buffer();
        band.process(&mut buffer);

        let meters = band.meters();
        assert!(within_tolerance(meters.input_db(), gain_to_db(0.9), 1e-9));
        assert!(meters.output_db() < meters.input_db() - 20.0);
    }

    #[test]
    fn bypass_passes_through_and_still_meters() {
        let mut band = CompressorBand::new(2, 48000.0);
        band.update_settings(&BandSettings { bypassed: true, ..squashing() });

        let mut buffer = loud_buffer();
        band.process(&mut buffer);

        assert!(buffer.channel(0).iter().all(|&x| x == 0.9));
        assert!(buffer.channel(1).iter().all(|&x| x == -0.9));

        let meters = band.meters();
        assert!(within_tolerance(meters.input_db(), gain_to_db(0.9), 1e-9));
        assert!(within_tolerance(meters.output_db(), meters.input_db(), 1e-12));
    }

    #[test]
    fn flags_are_exposed() {
        let mut band = CompressorBand::new(2, 48000.0);
        band.update_settings(&BandSettings { mute: true, solo: true, ..Default::default() });

        assert!(band.is_muted());
        assert!(band.is_soloed());
        assert!(!band.is_bypassed());
    }

    #[test]
    fn prepare_resets_meters() {
        let mut band = CompressorBand::new(2, 48000.0);
        band.process(&mut loud_buffer());
        assert!(band.meters().input_db() > MINUS_INFINITY_DB);

        band.prepare(44100.0, 2);
        assert_eq!(band.meters().input_db(), MINUS_INFINITY_DB);
    }
}
