//! The audio-side processing chain and its construction.

use super::*;

/// The engine, together with the handles the analysis side needs to read
/// from it.
pub struct AudioPackage {
    pub engine: AudioEngine,
    /// One window tap per analysed channel, left first.
    pub taps: Vec<SampleTap>,
    /// Meter handles, lowest band first.
    pub meters: [Arc<BandMeters>; NUM_BANDS],
    pub sample_rate_ref: Arc<AtomicF64>,
}

/// The program's audio state: a crossover network feeding one compressor
/// per band, summed by the mixdown stage, with the raw input tapped for
/// spectrum analysis.
pub struct AudioEngine {
    pub(super) params: Arc<ParameterStore>,

    pub(super) crossover: CrossoverNetwork,
    pub(super) bands: [CompressorBand; NUM_BANDS],
    pub(super) mixdown: MixdownStage,

    pub(super) accumulators: Vec<SampleAccumulator>,

    /// Holds one chunk of a host block which is longer than the prepared
    /// block size.
    pub(super) scratch: AudioBuffer,

    pub(super) sample_rate: Arc<AtomicF64>,
    pub(super) max_block_size: usize,
    pub(super) num_channels: usize,
}

impl AudioEngine {
    /// Builds an engine for `num_channels` channels, prepared at the default
    /// sample rate and block size.
    ///
    /// At most two channels are tapped for analysis.
    pub fn build(params: Arc<ParameterStore>, num_channels: usize) -> AudioPackage {
        let sample_rate = DEFAULT_SAMPLE_RATE;
        let crossovers = params.snapshot().crossovers();

        let (accumulators, taps): (Vec<_>, Vec<_>) = [Channel::Left, Channel::Right]
            .into_iter()
            .take(num_channels)
            .map(SampleAccumulator::new)
            .unzip();

        let mut engine = Self {
            params,
            crossover: CrossoverNetwork::new(&crossovers, num_channels, sample_rate),
            bands: std::array::from_fn(|_| CompressorBand::new(num_channels, sample_rate)),
            mixdown: MixdownStage::new(sample_rate),
            accumulators,
            scratch: AudioBuffer::default(),
            sample_rate: Arc::new(AtomicF64::new(sample_rate)),
            max_block_size: 0,
            num_channels,
        };

        engine.prepare(sample_rate, DEFAULT_BLOCK_SIZE);

        AudioPackage {
            meters: std::array::from_fn(|i| engine.bands[i].meters()),
            sample_rate_ref: Arc::clone(&engine.sample_rate),
            taps,
            engine,
        }
    }

    /// Re-initialises every processor for a new sample rate and maximum block
    /// size. The current parameter values are applied without smoothing.
    ///
    /// A non-positive or non-finite `sample_rate` falls back to
    /// [`DEFAULT_SAMPLE_RATE`], and `max_block_size` is clamped to
    /// `1..=MAX_BLOCK_SIZE`.
    ///
    /// # Safety
    ///
    /// This function reallocates, so should not be used in a real-time context.
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) {
        let sample_rate = if sample_rate.is_finite() && sample_rate > 0.0 {
            sample_rate
        }
        else {
            log::warn!("invalid sample rate {sample_rate}, using {DEFAULT_SAMPLE_RATE}");
            DEFAULT_SAMPLE_RATE
        };
        let max_block_size = max_block_size.clamp(1, MAX_BLOCK_SIZE);
        let num_channels = self.num_channels;

        self.sample_rate.sr(sample_rate);
        self.max_block_size = max_block_size;

        let snapshot = self.params.snapshot();
        self.update_state(&snapshot);

        self.crossover.prepare(sample_rate, num_channels, max_block_size);
        for band in &mut self.bands {
            band.prepare(sample_rate, num_channels);
        }
        self.mixdown.prepare(sample_rate, max_block_size);

        for acc in &mut self.accumulators {
            acc.prepare(max_block_size);
        }

        self.scratch.resize(num_channels, max_block_size);

        log::info!(
            "audio engine prepared: {sample_rate} Hz, {max_block_size} samples, {num_channels} channels"
        );
    }

    /// Pushes a parameter snapshot into every processor.
    pub(super) fn update_state(&mut self, snapshot: &ParamSnapshot) {
        self.crossover.set_crossovers(&snapshot.crossovers());

        for (band, settings) in self.bands.iter_mut().zip(&snapshot.bands) {
            band.update_settings(settings);
        }

        self.mixdown.set_input_gain_db(snapshot.input_gain_db);
        self.mixdown.set_output_gain_db(snapshot.output_gain_db);
    }

    /// A handle to `band`'s meters.
    pub fn band_meters(&self, band: Band) -> Arc<BandMeters> {
        self.bands[band.index()].meters()
    }

    pub fn params(&self) -> &Arc<ParameterStore> {
        &self.params
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate.lr()
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }
}

impl std::fmt::Debug for AudioEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioEngine")
            .field("sample_rate", &self.sample_rate())
            .field("max_block_size", &self.max_block_size)
            .field("num_channels", &self.num_channels)
            .finish_non_exhaustive()
    }
}
