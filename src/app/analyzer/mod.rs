//! The UI-side spectrum analyzer and band meters.

use super::*;
use crate::dsp::*;

use std::sync::Arc;
use triple_buffer::triple_buffer;

pub mod path_producer;

pub use path_producer::PathProducer;

/// The input and output levels of one band, in decibels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandLevels {
    pub input_db: f64,
    pub output_db: f64,
}

impl BandLevels {
    /// The gain reduction applied to the band, in decibels.
    pub fn gain_reduction_db(&self) -> f64 {
        self.input_db - self.output_db
    }
}

/// A band's threshold, spanning the band's frequency range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdLine {
    pub band: Band,
    pub y: f64,
    pub x_start: f64,
    pub x_end: f64,
}

/// Geometry drawn over the spectrum: a vertical line at each crossover and a
/// horizontal line at each band's threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlay {
    pub crossover_x: [f64; NUM_BANDS - 1],
    pub thresholds: [ThresholdLine; NUM_BANDS],
}

/// The x position of `freq_hz` on the analyzer's log-frequency axis.
pub fn crossover_x(freq_hz: f64, bounds: Rect) -> f64 {
    bounds.x + bounds.width * map_from_log10(freq_hz, MIN_FREQUENCY, MAX_FREQUENCY)
}

/// The y position of `level_db` on the meter scale, which spans
/// [`MINUS_INFINITY_DB`] at the bottom to [`MAX_DECIBELS`] at the top.
pub fn threshold_y(level_db: f64, bounds: Rect) -> f64 {
    map(level_db, MINUS_INFINITY_DB, MAX_DECIBELS, bounds.bottom(), bounds.top())
}

/// Owns one [`PathProducer`] per analysed channel and the band meter
/// handles. Intended to be updated periodically from a non-audio thread,
/// e.g. at [`ANALYZER_REFRESH_RATE_HZ`].
pub struct SpectrumAnalyzer {
    producers: Vec<PathProducer>,
    meters: [Arc<BandMeters>; NUM_BANDS],

    params: Arc<ParameterStore>,
    sample_rate: Arc<AtomicF64>,

    bounds: Rect,
    enabled: bool,
}

impl SpectrumAnalyzer {
    /// Creates an analyzer from the handles of an
    /// [`AudioPackage`](crate::app::audio::AudioPackage), and the
    /// outputs a render thread reads each channel's path from.
    pub fn new(
        taps: Vec<SampleTap>,
        meters: [Arc<BandMeters>; NUM_BANDS],
        params: Arc<ParameterStore>,
        sample_rate: Arc<AtomicF64>,
    ) -> (Self, Vec<triple_buffer::Output<AnalyzerPath>>) {
        let (producers, outputs): (Vec<_>, Vec<_>) = taps
            .into_iter()
            .map(|tap| PathProducer::new(tap, FftOrder::default()))
            .unzip();

        let analyzer = Self {
            producers,
            meters,
            params,
            sample_rate,
            bounds: Rect::new(0.0, 0.0, 1.0, 1.0),
            enabled: true,
        };

        (analyzer, outputs)
    }

    /// Pulls every pending window through each channel's path producer.
    /// Does nothing while analysis is disabled.
    ///
    /// Returns the number of channels which published a new path.
    pub fn update(&mut self) -> Result<usize> {
        if !self.enabled {
            return Ok(0);
        }

        let sample_rate = self.sample_rate.lr();
        let mut num_updated = 0;

        for producer in &mut self.producers {
            if producer.process(self.bounds, sample_rate)? {
                num_updated += 1;
            }
        }

        Ok(num_updated)
    }

    /// The newest path of `channel`, if it is analysed.
    pub fn path(&self, channel: Channel) -> Option<&AnalyzerPath> {
        self.producer(channel).map(PathProducer::path)
    }

    /// The number of windows waiting to be drawn for `channel`.
    pub fn num_pending_windows(&self, channel: Channel) -> usize {
        self.producer(channel).map_or(0, PathProducer::num_pending_windows)
    }

    /// The current levels of `band`, clamped to the displayable range.
    pub fn band_levels(&self, band: Band) -> BandLevels {
        let meters = &self.meters[band.index()];
        let clamp = |db: f64| db.clamp(MINUS_INFINITY_DB, MAX_DECIBELS);

        BandLevels {
            input_db: clamp(meters.input_db()),
            output_db: clamp(meters.output_db()),
        }
    }

    /// Every band's levels, lowest band first.
    pub fn all_band_levels(&self) -> [BandLevels; NUM_BANDS] {
        Band::ALL.map(|band| self.band_levels(band))
    }

    pub fn selected_band(&self) -> Band {
        self.params.selected_band()
    }

    pub fn set_selected_band(&self, band: Band) {
        self.params.set_selected_band(band);
    }

    /// Sets the area paths are laid out in.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Sets the analysis floor from a drawing area which extends below the
    /// level grid: the level at `bounds.bottom()` on a grid spanning
    /// [`MINUS_INFINITY_DB`]..[`MAX_DECIBELS`] over `grid`.
    pub fn fit_floor_to(&mut self, bounds: Rect, grid: Rect) {
        let floor_db = map(bounds.bottom(), grid.bottom(), grid.top(), MINUS_INFINITY_DB, MAX_DECIBELS);
        self.set_negative_infinity(floor_db);
    }

    /// The crossover and threshold lines for the current parameter values,
    /// laid out in the analyzer's bounds.
    pub fn overlay(&self) -> Overlay {
        let bounds = self.bounds;
        let crossover_x = [
            crossover_x(self.params.get(ParamId::LowMidCrossover), bounds),
            crossover_x(self.params.get(ParamId::MidHighCrossover), bounds),
        ];

        let edges = [bounds.x, crossover_x[0], crossover_x[1], bounds.x + bounds.width];
        let thresholds = Band::ALL.map(|band| ThresholdLine {
            band,
            y: threshold_y(self.params.get(ParamId::Threshold(band)), bounds),
            x_start: edges[band.index()],
            x_end: edges[band.index() + 1],
        });

        Overlay { crossover_x, thresholds }
    }

    /// Sets the level drawn at the bottom of the bounds, for every channel.
    pub fn set_negative_infinity(&mut self, floor_db: f64) {
        for producer in &mut self.producers {
            producer.set_negative_infinity(floor_db);
        }

        log::debug!("analyzer floor set to {floor_db:.1} dB");
    }

    /// Changes every channel's transform size.
    ///
    /// # Safety
    ///
    /// This function reallocates, so should not be used in a real-time context.
    pub fn change_order(&mut self, order: FftOrder) {
        for producer in &mut self.producers {
            producer.change_order(order);
        }

        log::info!("analyzer transform size set to {}", order.fft_size());
    }

    /// Enables or disables path production. Meters are unaffected.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn num_channels(&self) -> usize {
        self.producers.len()
    }

    fn producer(&self, channel: Channel) -> Option<&PathProducer> {
        self.producers.iter().find(|p| p.channel() == channel)
    }
}

impl std::fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("producers", &self.producers)
            .field("bounds", &self.bounds)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
