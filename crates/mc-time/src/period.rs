//! `Period` — a time span expressed in a [`TimeUnit`].

use std::str::FromStr;

use mc_core::errors::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::frequency::Frequency;
use crate::time_unit::TimeUnit;

/// A signed length of calendar time, e.g. `3M` or `-2D`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Number of units.
    pub length: i32,
    /// The unit.
    pub unit: TimeUnit,
}

impl Period {
    /// Create a period.
    pub const fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// The coupon period of a frequency (`EveryFourthWeek` → `4W`).
    pub fn from_frequency(freq: Frequency) -> Result<Self> {
        match freq {
            Frequency::Once => Err(Error::InvalidArgument(format!(
                "{freq} has no coupon period"
            ))),
            Frequency::Annual => Ok(Period::new(1, TimeUnit::Years)),
            Frequency::Semiannual => Ok(Period::new(6, TimeUnit::Months)),
            Frequency::Quarterly => Ok(Period::new(3, TimeUnit::Months)),
            Frequency::Monthly => Ok(Period::new(1, TimeUnit::Months)),
            Frequency::EveryFourthWeek => Ok(Period::new(4, TimeUnit::Weeks)),
            Frequency::Weekly => Ok(Period::new(1, TimeUnit::Weeks)),
            Frequency::Daily => Ok(Period::new(1, TimeUnit::Days)),
        }
    }

    /// `n` repetitions of this period.
    pub fn times(self, n: i32) -> Self {
        Period::new(self.length * n, self.unit)
    }
}

impl FromStr for Period {
    type Err = Error;

    /// Parses `"1D"`, `"2w"`, `"18M"`, `"10Y"`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let malformed = || Error::Configuration(format!("malformed period '{s}'"));
        let unit_char = s.chars().last().ok_or_else(malformed)?;
        let unit = TimeUnit::from_suffix(unit_char).ok_or_else(malformed)?;
        let digits = &s[..s.len() - unit_char.len_utf8()];
        let length: i32 = digits.parse().map_err(|_| malformed())?;
        Ok(Period::new(length, unit))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.length, self.unit.suffix())
    }
}

impl std::fmt::Debug for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Period({self})")
    }
}
