//! The shared parameter store and its per-block snapshot.

use super::*;
use crate::dsp::BandSettings;
use atomic::Atomic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current values of every parameter, shared between the UI thread (which
/// writes) and the audio thread (which reads a [`ParamSnapshot`] once per
/// block).
///
/// Values are stored as they appear in the layout: floats in their units,
/// choices as an index, bools as `0.0`/`1.0`.
#[derive(Debug)]
pub struct ParameterStore {
    values: Vec<AtomicF64>,

    /// The band shown in the UI. Has no effect on audio.
    selected_band: Atomic<Band>,
}

/// A plain copy of every parameter, taken at the start of a block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSnapshot {
    pub low_mid_crossover_hz: f64,
    pub mid_high_crossover_hz: f64,

    pub bands: [BandSettings; NUM_BANDS],

    pub input_gain_db: f64,
    pub output_gain_db: f64,
}

impl ParamSnapshot {
    pub fn crossovers(&self) -> [f64; NUM_BANDS - 1] {
        [self.low_mid_crossover_hz, self.mid_high_crossover_hz]
    }

    pub fn band(&self, band: Band) -> &BandSettings {
        &self.bands[band.index()]
    }
}

/// The on-disk form of the store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    selected_band: Option<usize>,
    params: BTreeMap<String, f64>,
}

impl ParameterStore {
    /// Creates a store with every parameter at its default.
    pub fn new() -> Self {
        Self {
            values: layout()
                .iter()
                .map(|spec| AtomicF64::new(spec.kind.default_value()))
                .collect(),
            selected_band: Atomic::new(Band::default()),
        }
    }

    /// The stored value of `id`.
    pub fn get(&self, id: ParamId) -> f64 {
        self.values[id.index()].lr()
    }

    /// Sets `id` to `value`, constrained to its range.
    pub fn set(&self, id: ParamId, value: f64) {
        self.values[id.index()].sr(id.kind().constrain(value));
    }

    pub fn get_bool(&self, id: ParamId) -> bool {
        self.get(id) != 0.0
    }

    pub fn set_bool(&self, id: ParamId, value: bool) {
        self.set(id, f64::from(u8::from(value)));
    }

    /// The ratio of `band`, resolved from its choice index.
    pub fn ratio(&self, band: Band) -> f64 {
        let idx = self.get(ParamId::Ratio(band)) as usize;
        RATIO_CHOICES[idx.min(RATIO_CHOICES.len() - 1)]
    }

    /// Looks up a value by its key.
    pub fn get_by_key(&self, key: &str) -> Result<f64> {
        ParamId::from_key(key).map(|id| self.get(id))
    }

    /// Sets a value by its key.
    pub fn set_by_key(&self, key: &str, value: f64) -> Result<()> {
        ParamId::from_key(key).map(|id| self.set(id, value))
    }

    pub fn selected_band(&self) -> Band {
        self.selected_band.lr()
    }

    pub fn set_selected_band(&self, band: Band) {
        self.selected_band.sr(band);
    }

    /// Reads every parameter once.
    pub fn snapshot(&self) -> ParamSnapshot {
        let band = |b: Band| BandSettings {
            threshold_db: self.get(ParamId::Threshold(b)),
            attack_ms: self.get(ParamId::Attack(b)),
            release_ms: self.get(ParamId::Release(b)),
            ratio: self.ratio(b),

            bypassed: self.get_bool(ParamId::Bypassed(b)),
            mute: self.get_bool(ParamId::Mute(b)),
            solo: self.get_bool(ParamId::Solo(b)),
        };

        ParamSnapshot {
            low_mid_crossover_hz: self.get(ParamId::LowMidCrossover),
            mid_high_crossover_hz: self.get(ParamId::MidHighCrossover),

            bands: Band::ALL.map(band),

            input_gain_db: self.get(ParamId::InputGain),
            output_gain_db: self.get(ParamId::OutputGain),
        }
    }

    /// Serialises every parameter as a JSON map of key to value.
    pub fn save_state(&self) -> Result<String> {
        let state = PersistedState {
            selected_band: Some(self.selected_band().index()),
            params: layout()
                .iter()
                .map(|spec| (spec.key.clone(), self.get(spec.id)))
                .collect(),
        };

        Ok(serde_json::to_string_pretty(&state)?)
    }

    /// Restores parameters from [`save_state()`](Self::save_state) output.
    ///
    /// Unknown keys are skipped with a warning, and parameters missing from
    /// `json` keep their current values. Nothing is changed if `json` is
    /// malformed.
    pub fn load_state(&self, json: &str) -> Result<()> {
        let state: PersistedState = serde_json::from_str(json)?;
        let mut num_loaded = 0;

        for (key, value) in &state.params {
            match ParamId::from_key(key) {
                Ok(id) => {
                    self.set(id, *value);
                    num_loaded += 1;
                }
                Err(e) => log::warn!("skipping saved parameter: {e}"),
            }
        }

        if let Some(band) = state.selected_band.and_then(Band::from_index) {
            self.set_selected_band(band);
        }

        log::debug!("loaded {num_loaded} of {NUM_PARAMS} parameters");
        Ok(())
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}
