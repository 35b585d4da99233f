//! `OvernightIndex` — a daily published rate such as SOFR or F-TIIE.
//!
//! Compounded coupons on an overnight index accrue one step per fixing:
//! the rate published on a business day accrues until the next business
//! day. [`OvernightIndex::accrual_steps`] lays those steps out over a
//! period, clipping the first and last step to the period boundaries.

use std::sync::Arc;

use mc_core::errors::Result;
use mc_core::{Rate, Time};
use mc_time::{Actual360, BusinessDayConvention, Calendar, Date, DayCounter, Mexico, UnitedStates};

use crate::fixings::FixingSeries;

/// One compounding step of an overnight coupon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OvernightStep {
    /// Business day whose fixing applies.
    pub fixing_date: Date,
    /// Start of accrual (the fixing date, or the period start if later).
    pub accrual_start: Date,
    /// End of accrual (the next business day, or the period end if earlier).
    pub accrual_end: Date,
    /// Year fraction of the accrual.
    pub tau: Time,
}

/// An overnight rate index.
#[derive(Debug, Clone)]
pub struct OvernightIndex {
    name: String,
    calendar: Arc<dyn Calendar>,
    day_counter: Arc<dyn DayCounter>,
    fixings: Arc<FixingSeries>,
}

impl OvernightIndex {
    /// Create an index with no fixings.
    pub fn new(
        name: impl Into<String>,
        calendar: Arc<dyn Calendar>,
        day_counter: Arc<dyn DayCounter>,
    ) -> Self {
        let name = name.into();
        Self {
            fixings: Arc::new(FixingSeries::new(name.clone())),
            name,
            calendar,
            day_counter,
        }
    }

    /// SOFR: Federal Reserve calendar, Actual/360.
    pub fn sofr() -> Self {
        Self::new("SOFR", Arc::new(UnitedStates::federal_reserve()), Arc::new(Actual360))
    }

    /// Banxico's overnight funding rate (F-TIIE): Mexico calendar, Actual/360.
    pub fn f_tiie() -> Self {
        Self::new("F-TIIE", Arc::new(Mexico), Arc::new(Actual360))
    }

    /// Attach the published fixings.
    pub fn with_fixings(mut self, fixings: FixingSeries) -> Self {
        self.fixings = Arc::new(fixings);
        self
    }

    /// Index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fixing calendar.
    pub fn calendar(&self) -> &dyn Calendar {
        self.calendar.as_ref()
    }

    /// Accrual day counter.
    pub fn day_counter(&self) -> &dyn DayCounter {
        self.day_counter.as_ref()
    }

    /// Published fixings.
    pub fn fixings(&self) -> &FixingSeries {
        &self.fixings
    }

    /// Published fixing on `date`, or `MissingFixing`.
    pub fn past_fixing(&self, date: Date) -> Result<Rate> {
        self.fixings.fixing(date)
    }

    /// Compounding steps covering `[start, end)`.
    ///
    /// The first fixing is the business day on or before `start`, so a
    /// period starting on a holiday picks up the previous publication.
    pub fn accrual_steps(&self, start: Date, end: Date) -> Result<Vec<OvernightStep>> {
        mc_core::ensure!(start < end, "overnight period [{start}, {end}) is empty");
        let mut steps = Vec::new();
        let mut fixing_date = self.calendar.adjust(start, BusinessDayConvention::Preceding)?;
        while fixing_date < end {
            let next = self.calendar.advance_business_days(fixing_date, 1)?;
            let accrual_start = fixing_date.max(start);
            let accrual_end = next.min(end);
            if accrual_start < accrual_end {
                steps.push(OvernightStep {
                    fixing_date,
                    accrual_start,
                    accrual_end,
                    tau: self.day_counter.year_fraction(accrual_start, accrual_end),
                });
            }
            fixing_date = next;
        }
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn february_window_starts_with_january_fixing() {
        let index = OvernightIndex::f_tiie();
        let steps = index.accrual_steps(date(2025, 2, 1), date(2025, 3, 1)).unwrap();
        let first = steps[0];
        assert_eq!(first.fixing_date, date(2025, 1, 31));
        assert_eq!(first.accrual_start, date(2025, 2, 1));
        assert_eq!(first.accrual_end, date(2025, 2, 4));
        assert_abs_diff_eq!(first.tau, 3.0 / 360.0, epsilon = 1e-15);

        let last = steps[steps.len() - 1];
        assert_eq!(last.fixing_date, date(2025, 2, 28));
        assert_eq!(last.accrual_end, date(2025, 3, 1));

        let total: f64 = steps.iter().map(|s| s.tau).sum();
        assert_abs_diff_eq!(total, 28.0 / 360.0, epsilon = 1e-14);
        // 31 Jan plus the 19 business days of February 2025.
        assert_eq!(steps.len(), 20);
    }

    #[test]
    fn steps_are_contiguous() {
        let index = OvernightIndex::sofr();
        let steps = index.accrual_steps(date(2025, 2, 21), date(2025, 5, 21)).unwrap();
        assert_eq!(steps[0].accrual_start, date(2025, 2, 21));
        for w in steps.windows(2) {
            assert_eq!(w[0].accrual_end, w[1].accrual_start);
        }
        assert_eq!(steps[steps.len() - 1].accrual_end, date(2025, 5, 21));
    }

    #[test]
    fn empty_period_rejected() {
        let index = OvernightIndex::sofr();
        assert!(index.accrual_steps(date(2025, 2, 21), date(2025, 2, 21)).is_err());
    }
}
