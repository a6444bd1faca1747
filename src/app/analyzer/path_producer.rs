//! Per-channel spectrum path production.

use super::*;

/// Turns one channel's analysis windows into display paths.
///
/// Each window is slid into a mono buffer of the current transform size, so
/// every transform sees the newest `fft_size` samples. Every frame becomes a
/// path, and the newest path is kept and published to the render thread.
pub struct PathProducer {
    tap: SampleTap,
    incoming: Vec<f64>,
    mono_buffer: Vec<f64>,

    fft_data_generator: FftDataGenerator,
    fft_frame: Vec<f64>,

    path_generator: PathGenerator,
    path: AnalyzerPath,
    path_input: triple_buffer::Input<AnalyzerPath>,

    negative_infinity_db: f64,
}

impl PathProducer {
    /// Creates a producer reading from `tap`, and the output the render
    /// thread reads its paths from.
    pub fn new(tap: SampleTap, order: FftOrder) -> (Self, triple_buffer::Output<AnalyzerPath>) {
        let (path_input, path_output) = triple_buffer(&AnalyzerPath::default());

        let producer = Self {
            tap,
            incoming: Vec::with_capacity(MAX_BLOCK_SIZE),
            mono_buffer: vec![0.0; order.fft_size()],

            fft_data_generator: FftDataGenerator::new(order),
            fft_frame: Vec::with_capacity(order.num_bins()),

            path_generator: PathGenerator::new(),
            path: AnalyzerPath::default(),
            path_input,

            negative_infinity_db: DEFAULT_ANALYZER_FLOOR_DB,
        };

        (producer, path_output)
    }

    /// Drains the tap and updates the current path. `bounds` is the area
    /// the path is laid out in.
    ///
    /// Returns `Ok(true)` if a new path was published.
    pub fn process(&mut self, bounds: Rect, sample_rate: f64) -> Result<bool> {
        let floor_db = self.negative_infinity_db;

        while self.tap.num_complete_buffers_available() > 0 {
            if !self.tap.pull(&mut self.incoming) {
                break;
            }

            self.slide_into_mono_buffer();
            self.fft_data_generator
                .produce_fft_data_for_rendering(&self.mono_buffer, floor_db)?;
        }

        let fft_size = self.fft_data_generator.fft_size();
        let bin_width = sample_rate / fft_size as f64;

        while self.fft_data_generator.get_fft_data(&mut self.fft_frame) {
            self.path_generator.generate_path(
                &self.fft_frame,
                bounds,
                fft_size,
                bin_width,
                floor_db,
            );
        }

        let mut updated = false;
        while self.path_generator.get_path(&mut self.path) {
            updated = true;
        }

        if updated {
            self.path_input.write(self.path.clone());
        }

        Ok(updated)
    }

    /// The newest path.
    pub fn path(&self) -> &AnalyzerPath {
        &self.path
    }

    /// Sets the level drawn at the bottom of the bounds.
    pub fn set_negative_infinity(&mut self, floor_db: f64) {
        self.negative_infinity_db = floor_db;
    }

    pub fn negative_infinity(&self) -> f64 {
        self.negative_infinity_db
    }

    /// Changes the transform size, clearing the mono buffer and any queued
    /// frames.
    ///
    /// # Safety
    ///
    /// This function reallocates, so should not be used in a real-time context.
    pub fn change_order(&mut self, order: FftOrder) {
        self.fft_data_generator.change_order(order);

        self.mono_buffer.clear();
        self.mono_buffer.resize(order.fft_size(), 0.0);
    }

    pub fn order(&self) -> FftOrder {
        self.fft_data_generator.order()
    }

    pub fn channel(&self) -> Channel {
        self.tap.channel()
    }

    /// The number of analysis windows waiting to be drawn.
    pub fn num_pending_windows(&self) -> usize {
        self.tap.num_complete_buffers_available()
    }

    /// Shifts the mono buffer left by the incoming window's length and
    /// appends the window. Windows longer than the buffer keep only their
    /// newest samples.
    fn slide_into_mono_buffer(&mut self) {
        let mono_len = self.mono_buffer.len();
        let size = self.incoming.len().min(mono_len);
        let newest = &self.incoming[self.incoming.len() - size..];

        self.mono_buffer.copy_within(size.., 0);
        self.mono_buffer[mono_len - size..].copy_from_slice(newest);
    }
}

impl std::fmt::Debug for PathProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathProducer")
            .field("channel", &self.channel())
            .field("order", &self.order())
            .field("negative_infinity_db", &self.negative_infinity_db)
            .finish_non_exhaustive()
    }
}
