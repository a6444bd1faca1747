//! Audio processing callback.

use super::*;

impl AudioEngine {
    /// The main audio processing callback. Processes `buffer` in place.
    ///
    /// The parameters are read once, the raw input is tapped for analysis,
    /// and the signal then runs through the input gain, the crossover, the
    /// band compressors and the mixdown stage.
    ///
    /// Never allocates, locks or logs.
    pub fn process_block(&mut self, buffer: &mut AudioBuffer) {
        let snapshot = self.params.snapshot();
        self.update_state(&snapshot);

        let buffer_len = buffer.num_samples();

        if buffer_len <= self.max_block_size {
            self.process_sub_block(buffer);
            return;
        }

        // hosts may hand over more than they promised in `prepare()`, so the
        // buffer is broken down into chunks of at most `max_block_size`
        let mut scratch = std::mem::take(&mut self.scratch);
        let mut block_start = 0;

        while block_start < buffer_len {
            let block_len = (buffer_len - block_start).min(self.max_block_size);

            scratch.copy_from_range(buffer, block_start, block_len);
            self.process_sub_block(&mut scratch);
            scratch.copy_into_range(buffer, block_start);

            block_start += block_len;
        }

        self.scratch = scratch;
    }

    fn process_sub_block(&mut self, buffer: &mut AudioBuffer) {
        for acc in &mut self.accumulators {
            acc.update(buffer);
        }

        self.mixdown.apply_input_gain(buffer);

        self.crossover.process(buffer);

        for (band, band_buffer) in self.bands.iter_mut().zip(self.crossover.bands_mut()) {
            band.process(band_buffer);
        }

        let gates: [BandGate; NUM_BANDS] = std::array::from_fn(|i| BandGate::from(&self.bands[i]));
        self.mixdown.mix(self.crossover.bands(), &gates, buffer);
    }
}
