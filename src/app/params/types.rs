//! All the custom parameter types.

use bytemuck::NoUninit;
use std::fmt::{Display, Formatter, Result};

/// The ratio choices offered for each band, as `n:1`.
pub const RATIO_CHOICES: [f64; 14] =
    [1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, 15.0, 20.0, 50.0, 100.0];

/// 3:1.
pub const DEFAULT_RATIO_INDEX: usize = 3;

/// One of the compressor's frequency bands.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Band {
    #[default]
    Low,
    Mid,
    High,
}

impl Band {
    /// Every band, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Mid, Self::High];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Self::Low),
            1 => Some(Self::Mid),
            2 => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for Band {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.pad(match self {
            Self::Low => "Low",
            Self::Mid => "Mid",
            Self::High => "High",
        })
    }
}

unsafe impl NoUninit for Band {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_indices() {
        for (i, band) in Band::ALL.into_iter().enumerate() {
            assert_eq!(band.index(), i);
            assert_eq!(Band::from_index(i), Some(band));
        }
        assert_eq!(Band::from_index(3), None);
    }

    #[test]
    fn band_names_pad() {
        assert_eq!(format!("{:>4}", Band::Mid), " Mid");
        assert_eq!(Band::High.to_string(), "High");
    }
}
