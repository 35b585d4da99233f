//! `DayCounter` trait and the actual-day conventions the money markets use.
//!
//! A day counter turns a pair of dates into the year fraction used to
//! accrue interest or to place a date on a curve's time axis.

use std::sync::Arc;

use mc_core::{Real, Time};
use serde::{Deserialize, Serialize};

use crate::date::Date;

/// A convention for counting the fraction of a year between two dates.
pub trait DayCounter: std::fmt::Debug + Send + Sync {
    /// Human-readable name (e.g. `"Actual/360"`).
    fn name(&self) -> &str;

    /// Days between `d1` and `d2` under this convention.
    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        d1.days_between(d2)
    }

    /// Fraction of a year between `d1` and `d2` (negative if `d2 < d1`).
    fn year_fraction(&self, d1: Date, d2: Date) -> Time;
}

/// Actual/360: actual days over 360.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual360;

impl DayCounter for Actual360 {
    fn name(&self) -> &str {
        "Actual/360"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 360.0
    }
}

/// Actual/365 (Fixed): actual days over 365.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual365Fixed;

impl DayCounter for Actual365Fixed {
    fn name(&self) -> &str {
        "Actual/365 (Fixed)"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 365.0
    }
}

/// Serialisable name of a day-count convention, for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// [`Actual360`].
    #[default]
    Actual360,
    /// [`Actual365Fixed`].
    Actual365Fixed,
}

impl DayCountConvention {
    /// The day counter this name stands for.
    pub fn day_counter(self) -> Arc<dyn DayCounter> {
        match self {
            DayCountConvention::Actual360 => Arc::new(Actual360),
            DayCountConvention::Actual365Fixed => Arc::new(Actual365Fixed),
        }
    }
}
