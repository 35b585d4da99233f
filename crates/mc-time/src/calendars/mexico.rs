//! Mexico calendar (Bolsa Mexicana de Valores settlement, also used for
//! Banxico fixings).

use chrono::Weekday;

use super::easter_sunday_ordinal;
use crate::calendar::Calendar;
use crate::date::Date;

/// Mexico (BMV) calendar.
///
/// Weekends plus New Year's Day, Constitution Day (first Monday of
/// February), Benito Juárez's birthday (third Monday of March), Holy
/// Thursday, Good Friday, Labour Day, Independence Day (16 Sep), the
/// presidential inauguration (1 Oct every six years from 2024), All Souls'
/// Day, Revolution Day (third Monday of November), Our Lady of Guadalupe
/// (12 Dec) and Christmas.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mexico;

impl Calendar for Mexico {
    fn name(&self) -> &str {
        "Mexico"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if date.is_weekend() {
            return false;
        }
        let w = date.weekday();
        let (y, m, d) = (date.year(), date.month(), date.day_of_month());
        let easter = easter_sunday_ordinal(y);
        let dd = date.day_of_year();
        let third_monday = w == Weekday::Mon && (15..=21).contains(&d);

        let holiday = (d == 1 && m == 1)
            || (m == 2 && w == Weekday::Mon && d <= 7)
            || (m == 3 && third_monday)
            || dd + 3 == easter
            || dd + 2 == easter
            || (d == 1 && m == 5)
            || (d == 16 && m == 9)
            || (d == 1 && m == 10 && y >= 2024 && (y - 2024) % 6 == 0)
            || (d == 2 && m == 11)
            || (m == 11 && third_monday)
            || (d == 12 && m == 12)
            || (d == 25 && m == 12);
        !holiday
    }
}
