//! The parameter layout: every parameter's key, kind, range and default.

use super::*;
use lazy_static::lazy_static;
use std::collections::HashMap;

pub const NUM_PARAMS: usize = 25;

/// Identifies a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamId {
    LowMidCrossover,
    MidHighCrossover,

    Threshold(Band),
    Attack(Band),
    Release(Band),
    Ratio(Band),

    Bypassed(Band),
    Mute(Band),
    Solo(Band),

    InputGain,
    OutputGain,
}

/// How a parameter's value is interpreted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamKind {
    /// A continuous value in `min..=max`.
    Float { min: f64, max: f64, default: f64 },
    /// An index into `choices`.
    Choice { choices: &'static [f64], default_index: usize },
    /// On or off, stored as `1.0` or `0.0`.
    Bool { default: bool },
}

impl ParamKind {
    /// The default value, as stored.
    pub fn default_value(&self) -> f64 {
        match *self {
            Self::Float { default, .. } => default,
            Self::Choice { default_index, .. } => default_index as f64,
            Self::Bool { default } => f64::from(u8::from(default)),
        }
    }

    /// Brings `value` into the parameter's range. Choices are rounded to the
    /// nearest valid index, and any non-zero value is `true` for bools.
    /// Non-finite values give the default.
    pub fn constrain(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default_value();
        }

        match *self {
            Self::Float { min, max, .. } => value.clamp(min, max),
            Self::Choice { choices, .. } => {
                value.round().clamp(0.0, (choices.len() - 1) as f64)
            }
            Self::Bool { .. } => f64::from(u8::from(value != 0.0)),
        }
    }
}

/// A parameter's entry in the layout.
#[derive(Clone, Debug)]
pub struct ParamSpec {
    pub id: ParamId,
    pub key: String,
    pub kind: ParamKind,
}

const CROSSOVER_LOW_MID: ParamKind =
    ParamKind::Float { min: MIN_FREQUENCY, max: 999.0, default: 400.0 };
const CROSSOVER_MID_HIGH: ParamKind =
    ParamKind::Float { min: 1000.0, max: MAX_FREQUENCY, default: 2000.0 };
const THRESHOLD: ParamKind =
    ParamKind::Float { min: MIN_THRESHOLD_DB, max: MAX_DECIBELS, default: 0.0 };
const ATTACK: ParamKind = ParamKind::Float { min: 5.0, max: 500.0, default: 50.0 };
const RELEASE: ParamKind = ParamKind::Float { min: 5.0, max: 500.0, default: 250.0 };
const RATIO: ParamKind =
    ParamKind::Choice { choices: &RATIO_CHOICES, default_index: DEFAULT_RATIO_INDEX };
const TOGGLE: ParamKind = ParamKind::Bool { default: false };
const GAIN: ParamKind = ParamKind::Float { min: -24.0, max: 24.0, default: 0.0 };

lazy_static! {
    static ref PARAMETER_LAYOUT: Vec<ParamSpec> = (0..NUM_PARAMS)
        .filter_map(ParamId::from_index)
        .map(|id| ParamSpec { id, key: id.build_key(), kind: id.build_kind() })
        .collect();

    static ref KEY_LOOKUP: HashMap<&'static str, ParamId> = PARAMETER_LAYOUT
        .iter()
        .map(|spec| (spec.key.as_str(), spec.id))
        .collect();
}

/// Every parameter, in index order.
pub fn layout() -> &'static [ParamSpec] {
    &PARAMETER_LAYOUT
}

impl ParamId {
    /// The parameter's position in the layout.
    pub const fn index(self) -> usize {
        use ParamId as P;

        match self {
            P::LowMidCrossover => 0,
            P::MidHighCrossover => 1,
            P::Threshold(b) => 2 + b.index(),
            P::Attack(b) => 5 + b.index(),
            P::Release(b) => 8 + b.index(),
            P::Ratio(b) => 11 + b.index(),
            P::Bypassed(b) => 14 + b.index(),
            P::Mute(b) => 17 + b.index(),
            P::Solo(b) => 20 + b.index(),
            P::InputGain => 23,
            P::OutputGain => 24,
        }
    }

    /// The inverse of [`index()`](Self::index).
    pub const fn from_index(idx: usize) -> Option<Self> {
        use ParamId as P;

        let band = match Band::from_index((idx + 1) % 3) {
            Some(b) => b,
            None => return None,
        };

        Some(match idx {
            0 => P::LowMidCrossover,
            1 => P::MidHighCrossover,
            2..=4 => P::Threshold(band),
            5..=7 => P::Attack(band),
            8..=10 => P::Release(band),
            11..=13 => P::Ratio(band),
            14..=16 => P::Bypassed(band),
            17..=19 => P::Mute(band),
            20..=22 => P::Solo(band),
            23 => P::InputGain,
            24 => P::OutputGain,
            _ => return None,
        })
    }

    /// Looks a parameter up by its key.
    pub fn from_key(key: &str) -> Result<Self> {
        KEY_LOOKUP
            .get(key)
            .copied()
            .ok_or_else(|| Error::UnknownParameter(key.to_owned()))
    }

    /// The parameter's stable key, as used in saved state.
    pub fn key(self) -> &'static str {
        &PARAMETER_LAYOUT[self.index()].key
    }

    pub fn kind(self) -> ParamKind {
        PARAMETER_LAYOUT[self.index()].kind
    }

    fn build_key(self) -> String {
        use ParamId as P;

        match self {
            P::LowMidCrossover => "Low-Mid Crossover Freq".into(),
            P::MidHighCrossover => "Mid-High Crossover Freq".into(),
            P::Threshold(b) => format!("Threshold {b} Band"),
            P::Attack(b) => format!("Attack {b} Band"),
            P::Release(b) => format!("Release {b} Band"),
            P::Ratio(b) => format!("Ratio {b} Band"),
            P::Bypassed(b) => format!("Bypassed {b} Band"),
            P::Mute(b) => format!("Mute {b} Band"),
            P::Solo(b) => format!("Solo {b} Band"),
            P::InputGain => "Input Gain".into(),
            P::OutputGain => "Output Gain".into(),
        }
    }

    fn build_kind(self) -> ParamKind {
        use ParamId as P;

        match self {
            P::LowMidCrossover => CROSSOVER_LOW_MID,
            P::MidHighCrossover => CROSSOVER_MID_HIGH,
            P::Threshold(_) => THRESHOLD,
            P::Attack(_) => ATTACK,
            P::Release(_) => RELEASE,
            P::Ratio(_) => RATIO,
            P::Bypassed(_) | P::Mute(_) | P::Solo(_) => TOGGLE,
            P::InputGain | P::OutputGain => GAIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_complete_and_ordered() {
        let layout = layout();
        assert_eq!(layout.len(), NUM_PARAMS);

        for (i, spec) in layout.iter().enumerate() {
            assert_eq!(spec.id.index(), i);
            assert_eq!(ParamId::from_index(i), Some(spec.id));
        }

        assert_eq!(ParamId::from_index(NUM_PARAMS), None);
    }

    #[test]
    fn band_params_map_to_their_band() {
        assert_eq!(ParamId::from_index(2), Some(ParamId::Threshold(Band::Low)));
        assert_eq!(ParamId::from_index(4), Some(ParamId::Threshold(Band::High)));
        assert_eq!(ParamId::from_index(12), Some(ParamId::Ratio(Band::Mid)));
        assert_eq!(ParamId::from_index(22), Some(ParamId::Solo(Band::High)));
    }

    #[test]
    fn keys_round_trip() {
        for spec in layout() {
            assert_eq!(ParamId::from_key(&spec.key).ok(), Some(spec.id));
        }

        assert_eq!(ParamId::Attack(Band::Mid).key(), "Attack Mid Band");
        assert_eq!(ParamId::LowMidCrossover.key(), "Low-Mid Crossover Freq");
    }

    #[test]
    fn unknown_key_is_an_error() {
        let err = ParamId::from_key("Wobble Amount");
        assert!(matches!(err, Err(Error::UnknownParameter(key)) if key == "Wobble Amount"));
    }

    #[test]
    fn constrain() {
        let threshold = ParamId::Threshold(Band::Low).kind();
        assert_eq!(threshold.constrain(-100.0), -60.0);
        assert_eq!(threshold.constrain(f64::NAN), 0.0);

        let ratio = ParamId::Ratio(Band::Low).kind();
        assert_eq!(ratio.default_value(), 3.0);
        assert_eq!(ratio.constrain(2.6), 3.0);
        assert_eq!(ratio.constrain(99.0), 13.0);

        let solo = ParamId::Solo(Band::Low).kind();
        assert_eq!(solo.constrain(0.2), 1.0);
        assert_eq!(solo.constrain(0.0), 0.0);
    }
}
