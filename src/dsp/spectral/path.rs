//! Log-frequency display paths built from spectrum frames.

use super::*;
use crate::dsp::analysis::{block_fifo, FifoConsumer, FifoProducer};

/// Only every `PATH_RESOLUTION`-th bin becomes a vertex.
const PATH_RESOLUTION: usize = crate::settings::PATH_RESOLUTION;

/// A point in screen space. `y` grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

/// A screen-space rectangle. `y` is the top edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// A polyline through the vertices of a spectrum, ready for drawing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalyzerPath {
    points: Vec<PathPoint>,
}

impl AnalyzerPath {
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    fn start_new_sub_path(&mut self, x: f64, y: f64) {
        self.points.clear();
        self.points.push(PathPoint { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.points.push(PathPoint { x, y });
    }
}

/// Converts spectrum frames into [`AnalyzerPath`]s, with bins placed on a
/// logarithmic frequency axis and levels on a linear decibel axis.
pub struct PathGenerator {
    path: AnalyzerPath,

    producer: FifoProducer<AnalyzerPath>,
    consumer: FifoConsumer<AnalyzerPath>,
}

impl PathGenerator {
    pub fn new() -> Self {
        let (producer, consumer) = block_fifo(&AnalyzerPath::default());

        Self { path: AnalyzerPath::default(), producer, consumer }
    }

    /// Builds a path from a frame of decibel values and queues it.
    ///
    /// The first vertex sits on the left edge at bin 0's level. After that
    /// every other bin is placed at `x = floor(log_position(bin_freq) ×
    /// width)` from the left edge, and `y` maps `floor_db..0 dB` onto
    /// `bottom..top`. Vertices with a non-finite `y` are skipped.
    ///
    /// Returns `false` if the queue was full and the path was dropped.
    pub fn generate_path(
        &mut self,
        frame: &[f64],
        bounds: Rect,
        fft_size: usize,
        bin_width: f64,
        floor_db: f64,
    ) -> bool {
        let top = bounds.top();
        let bottom = bounds.bottom();
        let width = bounds.width;

        let num_bins = (fft_size / 2).min(frame.len());
        let map_y = |db: f64| map(db, floor_db, 0.0, bottom, top);

        let first = frame.first().map_or(f64::NAN, |&db| map_y(db));
        let first = if first.is_finite() { first } else { bottom };
        self.path.start_new_sub_path(bounds.x, first);

        for bin in (1..num_bins).step_by(PATH_RESOLUTION) {
            let y = map_y(frame[bin]);

            if y.is_finite() {
                let bin_freq = bin as f64 * bin_width;
                let norm_x = map_from_log10(bin_freq, MIN_FREQUENCY, MAX_FREQUENCY);
                let x = (norm_x * width).floor();

                self.path.line_to(bounds.x + x, y);
            }
        }

        self.producer.push(&self.path)
    }

    pub fn num_paths_available(&self) -> usize {
        self.consumer.num_available_for_reading()
    }

    /// Pulls the oldest queued path into `path`. Returns `false` if none is
    /// available.
    pub fn get_path(&mut self, path: &mut AnalyzerPath) -> bool {
        self.consumer.pull(path)
    }
}

impl Default for PathGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PathGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathGenerator")
            .field("available", &self.num_paths_available())
            .finish_non_exhaustive()
    }
}
