//! `Calendar` trait and the two holiday-free calendars.
//!
//! A calendar knows which dates are business days; the provided methods
//! adjust and advance dates according to a [`BusinessDayConvention`].

use mc_core::errors::Result;

use crate::business_day_convention::BusinessDayConvention;
use crate::date::Date;
use crate::period::Period;
use crate::time_unit::TimeUnit;

/// A financial calendar.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Human-readable name (e.g. `"Mexico"`).
    fn name(&self) -> &str;

    /// Whether `date` is a business day in this calendar.
    fn is_business_day(&self, date: Date) -> bool;

    /// Whether `date` is a holiday (non-business) day.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Last business day of the month containing `date`.
    fn end_of_month(&self, date: Date) -> Result<Date> {
        self.adjust(date.end_of_month(), BusinessDayConvention::Preceding)
    }

    /// Whether `date` is the last business day of its month.
    fn is_end_of_month(&self, date: Date) -> Result<bool> {
        Ok(date == self.end_of_month(date)?)
    }

    /// Roll `date` to a business day.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Result<Date> {
        match convention {
            BusinessDayConvention::Unadjusted => Ok(date),
            BusinessDayConvention::Following => roll(self, date, 1),
            BusinessDayConvention::Preceding => roll(self, date, -1),
            BusinessDayConvention::ModifiedFollowing => {
                let adjusted = roll(self, date, 1)?;
                if adjusted.month() != date.month() {
                    roll(self, date, -1)
                } else {
                    Ok(adjusted)
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let adjusted = roll(self, date, -1)?;
                if adjusted.month() != date.month() {
                    roll(self, date, 1)
                } else {
                    Ok(adjusted)
                }
            }
        }
    }

    /// Move `date` by `n` business days; `n == 0` rolls forward to a
    /// business day.
    fn advance_business_days(&self, date: Date, n: i32) -> Result<Date> {
        if n == 0 {
            return self.adjust(date, BusinessDayConvention::Following);
        }
        let step = n.signum() as i64;
        let mut remaining = n.unsigned_abs();
        let mut d = date;
        while remaining > 0 {
            d = d.add_days(step)?;
            if self.is_business_day(d) {
                remaining -= 1;
            }
        }
        Ok(d)
    }

    /// Move `date` by `period`. Day periods count business days; longer
    /// periods move in calendar time and are then adjusted, snapping to the
    /// month end when `end_of_month` is set and `date` is a month end.
    fn advance(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
        end_of_month: bool,
    ) -> Result<Date> {
        match period.unit {
            TimeUnit::Days => self.advance_business_days(date, period.length),
            TimeUnit::Weeks => {
                let moved = date.advance(period.length, period.unit)?;
                self.adjust(moved, convention)
            }
            TimeUnit::Months | TimeUnit::Years => {
                let moved = date.advance(period.length, period.unit)?;
                if end_of_month && self.is_end_of_month(date)? {
                    self.end_of_month(moved)
                } else {
                    self.adjust(moved, convention)
                }
            }
        }
    }

    /// Business days `d` with `from <= d < to`, in order.
    fn business_days(&self, from: Date, to: Date) -> Result<Vec<Date>> {
        let mut days = Vec::new();
        let mut d = from;
        while d < to {
            if self.is_business_day(d) {
                days.push(d);
            }
            d = d.add_days(1)?;
        }
        Ok(days)
    }
}

fn roll<C: Calendar + ?Sized>(calendar: &C, mut date: Date, step: i64) -> Result<Date> {
    while calendar.is_holiday(date) {
        date = date.add_days(step)?;
    }
    Ok(date)
}

/// Every day is a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }
}

/// Saturdays and Sundays are the only holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendsOnly;

impl Calendar for WeekendsOnly {
    fn name(&self) -> &str {
        "Weekends Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn null_calendar_always_business() {
        assert!(NullCalendar.is_business_day(date(2023, 12, 25)));
        assert!(NullCalendar.is_business_day(date(2023, 9, 2)));
    }

    #[test]
    fn adjust_rules() {
        let cal = WeekendsOnly;
        let sat = date(2023, 9, 2);
        assert_eq!(cal.adjust(sat, BusinessDayConvention::Following).unwrap(), date(2023, 9, 4));
        assert_eq!(cal.adjust(sat, BusinessDayConvention::Preceding).unwrap(), date(2023, 9, 1));
        // 30 Sep 2023 is a Saturday: Following crosses into October.
        let end = date(2023, 9, 30);
        assert_eq!(
            cal.adjust(end, BusinessDayConvention::ModifiedFollowing).unwrap(),
            date(2023, 9, 29)
        );
        // 1 Oct 2023 is a Sunday: Preceding crosses into September.
        assert_eq!(
            cal.adjust(date(2023, 10, 1), BusinessDayConvention::ModifiedPreceding).unwrap(),
            date(2023, 10, 2)
        );
    }

    #[test]
    fn advance_business_days_skips_weekends() {
        let cal = WeekendsOnly;
        let thu = date(2025, 2, 20);
        assert_eq!(cal.advance_business_days(thu, 2).unwrap(), date(2025, 2, 24));
        assert_eq!(cal.advance_business_days(thu, -4).unwrap(), date(2025, 2, 14));
    }

    #[test]
    fn advance_end_of_month() {
        let cal = WeekendsOnly;
        let p = Period::new(1, TimeUnit::Months);
        let d = cal
            .advance(date(2025, 2, 28), p, BusinessDayConvention::ModifiedFollowing, true)
            .unwrap();
        assert_eq!(d, date(2025, 3, 31));
        let d = cal
            .advance(date(2025, 2, 28), p, BusinessDayConvention::ModifiedFollowing, false)
            .unwrap();
        assert_eq!(d, date(2025, 3, 28));
    }

    #[test]
    fn business_days_half_open() {
        let days = WeekendsOnly
            .business_days(date(2025, 2, 14), date(2025, 2, 18))
            .unwrap();
        assert_eq!(days, vec![date(2025, 2, 14), date(2025, 2, 17)]);
    }
}
