//! `Schedule` — the accrual dates of a swap leg.
//!
//! A schedule is generated from an effective date, a termination date and a
//! coupon tenor, either forwards from the start or backwards from the end,
//! and every date is then rolled to a business day.

use mc_core::errors::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::business_day_convention::BusinessDayConvention;
use crate::calendar::Calendar;
use crate::date::Date;
use crate::period::Period;
use crate::time_unit::TimeUnit;

/// Date generation rule for schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateGeneration {
    /// Roll backwards from the termination date; any stub is at the front.
    Backward,
    /// Roll forwards from the effective date; any stub is at the back.
    Forward,
    /// Only the effective and termination dates.
    Zero,
}

/// An ordered sequence of adjusted accrual dates.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    dates: Vec<Date>,
}

impl Schedule {
    /// Build a schedule from explicit, strictly increasing dates.
    pub fn from_dates(dates: Vec<Date>) -> Result<Self> {
        if dates.len() < 2 {
            return Err(Error::InvalidArgument(
                "a schedule needs at least two dates".into(),
            ));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidArgument(format!(
                "schedule dates must be strictly increasing: {dates:?}"
            )));
        }
        Ok(Self { dates })
    }

    /// All dates, effective date first.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false for a built schedule; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Effective date.
    pub fn start_date(&self) -> Date {
        self.dates[0]
    }

    /// Termination date.
    pub fn end_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Consecutive `(accrual start, accrual end)` pairs.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Builder for [`Schedule`].
#[derive(Debug)]
pub struct ScheduleBuilder<'a> {
    effective_date: Date,
    termination_date: Date,
    tenor: Period,
    calendar: &'a dyn Calendar,
    convention: BusinessDayConvention,
    termination_convention: BusinessDayConvention,
    rule: DateGeneration,
    end_of_month: bool,
}

impl<'a> ScheduleBuilder<'a> {
    /// Begin building a schedule.
    pub fn new(
        effective_date: Date,
        termination_date: Date,
        tenor: Period,
        calendar: &'a dyn Calendar,
    ) -> Self {
        Self {
            effective_date,
            termination_date,
            tenor,
            calendar,
            convention: BusinessDayConvention::ModifiedFollowing,
            termination_convention: BusinessDayConvention::ModifiedFollowing,
            rule: DateGeneration::Backward,
            end_of_month: false,
        }
    }

    /// Convention for the effective and intermediate dates.
    pub fn with_convention(mut self, c: BusinessDayConvention) -> Self {
        self.convention = c;
        self
    }

    /// Convention for the termination date.
    pub fn with_termination_convention(mut self, c: BusinessDayConvention) -> Self {
        self.termination_convention = c;
        self
    }

    /// Date-generation rule.
    pub fn with_rule(mut self, rule: DateGeneration) -> Self {
        self.rule = rule;
        self
    }

    /// Snap month-based dates to month ends when the seed is a month end.
    pub fn end_of_month(mut self, flag: bool) -> Self {
        self.end_of_month = flag;
        self
    }

    /// Build the `Schedule`.
    pub fn build(self) -> Result<Schedule> {
        let start = self.effective_date;
        let end = self.termination_date;
        if start >= end {
            return Err(Error::InvalidArgument(format!(
                "effective date {start} must be before termination date {end}"
            )));
        }
        if self.tenor.length <= 0 && self.rule != DateGeneration::Zero {
            return Err(Error::InvalidArgument(format!(
                "schedule tenor must be positive, got {}",
                self.tenor
            )));
        }

        let mut unadjusted = match self.rule {
            DateGeneration::Zero => vec![start, end],
            DateGeneration::Forward => {
                let mut dates = vec![start];
                for i in 1.. {
                    let next = start.advance(self.tenor.length * i, self.tenor.unit)?;
                    if next >= end {
                        break;
                    }
                    dates.push(next);
                }
                dates.push(end);
                dates
            }
            DateGeneration::Backward => {
                let mut dates = vec![end];
                for i in 1.. {
                    let prev = end.advance(-self.tenor.length * i, self.tenor.unit)?;
                    if prev <= start {
                        break;
                    }
                    dates.push(prev);
                }
                dates.push(start);
                dates.reverse();
                dates
            }
        };

        let month_based = matches!(self.tenor.unit, TimeUnit::Months | TimeUnit::Years);
        let seed = match self.rule {
            DateGeneration::Backward => end,
            _ => start,
        };
        let snap = self.end_of_month && month_based && self.calendar.is_end_of_month(seed)?;

        let last = unadjusted.len() - 1;
        let mut adjusted = Vec::with_capacity(unadjusted.len());
        for (i, d) in unadjusted.drain(..).enumerate() {
            let convention = if i == last {
                self.termination_convention
            } else {
                self.convention
            };
            let rolled = if snap && i != 0 && i != last {
                self.calendar.end_of_month(d)?
            } else {
                self.calendar.adjust(d, convention)?
            };
            if adjusted.last().map_or(true, |prev: &Date| rolled > *prev) {
                adjusted.push(rolled);
            }
        }
        Schedule::from_dates(adjusted)
    }
}
