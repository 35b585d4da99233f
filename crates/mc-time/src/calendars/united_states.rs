//! United States calendars.

use chrono::Weekday;

use crate::calendar::Calendar;
use crate::date::Date;

/// Which US calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UsMarket {
    /// Federal holidays, with Saturday holidays observed on Friday.
    #[default]
    Settlement,
    /// Federal Reserve Bankwire: Saturday holidays are not moved.
    FederalReserve,
}

/// United States calendar for a given [`UsMarket`].
///
/// Holidays: New Year's Day, Martin Luther King Jr. Day (third Monday of
/// January), Presidents' Day (third Monday of February), Memorial Day
/// (last Monday of May), Juneteenth (from 2022), Independence Day, Labor
/// Day (first Monday of September), Columbus Day (second Monday of
/// October), Veterans' Day, Thanksgiving (fourth Thursday of November) and
/// Christmas. Fixed-date holidays on a Sunday move to Monday.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitedStates {
    market: UsMarket,
}

impl UnitedStates {
    /// Calendar for `market`.
    pub fn new(market: UsMarket) -> Self {
        Self { market }
    }

    /// The Federal Reserve calendar SOFR is published on.
    pub fn federal_reserve() -> Self {
        Self::new(UsMarket::FederalReserve)
    }

    fn fixed_holiday(&self, month: u32, day: u32, m: u32, d: u32, w: Weekday) -> bool {
        if m != month {
            return false;
        }
        d == day
            || (d == day + 1 && w == Weekday::Mon)
            || (self.market == UsMarket::Settlement && day > 1 && d == day - 1 && w == Weekday::Fri)
    }
}

impl Calendar for UnitedStates {
    fn name(&self) -> &str {
        match self.market {
            UsMarket::Settlement => "US settlement",
            UsMarket::FederalReserve => "Federal Reserve Bankwire",
        }
    }

    fn is_business_day(&self, date: Date) -> bool {
        if date.is_weekend() {
            return false;
        }
        let w = date.weekday();
        let (y, m, d) = (date.year(), date.month(), date.day_of_month());
        let monday = w == Weekday::Mon;

        let new_year = (d == 1 && m == 1)
            || (d == 2 && m == 1 && monday)
            || (self.market == UsMarket::Settlement && d == 31 && m == 12 && w == Weekday::Fri);
        let holiday = new_year
            || (y >= 1983 && m == 1 && monday && (15..=21).contains(&d))
            || (m == 2 && monday && (15..=21).contains(&d))
            || (m == 5 && monday && d >= 25)
            || (y >= 2022 && self.fixed_holiday(6, 19, m, d, w))
            || self.fixed_holiday(7, 4, m, d, w)
            || (m == 9 && monday && d <= 7)
            || (m == 10 && monday && (8..=14).contains(&d))
            || self.fixed_holiday(11, 11, m, d, w)
            || (m == 11 && w == Weekday::Thu && (22..=28).contains(&d))
            || self.fixed_holiday(12, 25, m, d, w);
        !holiday
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn federal_reserve_2025() {
        let cal = UnitedStates::federal_reserve();
        for (m, d) in [(1, 1), (1, 20), (2, 17), (5, 26), (6, 19), (7, 4), (9, 1), (10, 13), (11, 11), (11, 27), (12, 25)] {
            assert!(!cal.is_business_day(date(2025, m, d)), "2025-{m:02}-{d:02}");
        }
        assert!(cal.is_business_day(date(2025, 2, 21)));
    }

    #[test]
    fn saturday_holidays_differ_by_market() {
        // 4 Jul 2026 is a Saturday.
        let fri = date(2026, 7, 3);
        assert!(!UnitedStates::new(UsMarket::Settlement).is_business_day(fri));
        assert!(UnitedStates::federal_reserve().is_business_day(fri));
    }

    #[test]
    fn sunday_holiday_moves_to_monday() {
        // 25 Dec 2022 is a Sunday.
        assert!(!UnitedStates::federal_reserve().is_business_day(date(2022, 12, 26)));
    }
}
