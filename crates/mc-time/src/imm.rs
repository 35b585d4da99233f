//! IMM futures dates.
//!
//! IMM dates are the third Wednesday of the contract month; the main
//! quarterly cycle is March, June, September and December. Contract codes
//! pair a month letter with the last digit of the year (`H5` = March 2025).

use chrono::Weekday;
use mc_core::errors::{Error, Result};

use crate::date::Date;

/// Futures month letters, January to December.
const MONTH_LETTERS: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];

/// IMM date utilities.
#[derive(Debug, Clone, Copy)]
pub struct Imm;

impl Imm {
    /// Whether `date` is the third Wednesday of its month; with
    /// `main_cycle` only March/June/September/December qualify.
    pub fn is_imm_date(date: Date, main_cycle: bool) -> bool {
        let in_cycle = !main_cycle || date.month() % 3 == 0;
        in_cycle && date.weekday() == Weekday::Wed && (15..=21).contains(&date.day_of_month())
    }

    /// Third Wednesday of `month` in `year`.
    pub fn third_wednesday(year: i32, month: u32) -> Result<Date> {
        Date::nth_weekday(3, Weekday::Wed, year, month)
    }

    /// First main-cycle IMM date strictly after `date`.
    pub fn next_date(date: Date) -> Result<Date> {
        let (mut y, mut m) = (date.year(), date.month());
        m = m.div_ceil(3) * 3;
        loop {
            let candidate = Self::third_wednesday(y, m)?;
            if candidate > date {
                return Ok(candidate);
            }
            m += 3;
            if m > 12 {
                m -= 12;
                y += 1;
            }
        }
    }

    /// Month number (1–12) of a futures month letter.
    pub fn month_of_letter(letter: char) -> Option<u32> {
        let upper = letter.to_ascii_uppercase();
        MONTH_LETTERS
            .iter()
            .position(|&c| c == upper)
            .map(|i| i as u32 + 1)
    }

    /// Resolve a contract month and year digit to the first matching IMM
    /// date not before `reference`.
    pub fn date_for(month: u32, year_digit: u8, reference: Date) -> Result<Date> {
        if year_digit > 9 || !(1..=12).contains(&month) {
            return Err(Error::Configuration(format!(
                "invalid IMM contract month {month} / year digit {year_digit}"
            )));
        }
        let decade = reference.year() - reference.year().rem_euclid(10);
        let year = decade + i32::from(year_digit);
        let candidate = Self::third_wednesday(year, month)?;
        if candidate < reference {
            Self::third_wednesday(year + 10, month)
        } else {
            Ok(candidate)
        }
    }

    /// Contract code of an IMM date (`"H5"` for 19 March 2025).
    pub fn code(date: Date) -> Option<String> {
        if !Self::is_imm_date(date, false) {
            return None;
        }
        let letter = MONTH_LETTERS[date.month() as usize - 1];
        Some(format!("{letter}{}", date.year().rem_euclid(10)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn sofr_strip_after_spot() {
        let mut dates = Vec::new();
        let mut current = date(2025, 2, 21);
        for _ in 0..5 {
            current = Imm::next_date(current).unwrap();
            dates.push(current);
        }
        assert_eq!(
            dates,
            vec![
                date(2025, 3, 19),
                date(2025, 6, 18),
                date(2025, 9, 17),
                date(2025, 12, 17),
                date(2026, 3, 18),
            ]
        );
    }

    #[test]
    fn next_date_is_strict() {
        assert_eq!(Imm::next_date(date(2025, 3, 19)).unwrap(), date(2025, 6, 18));
        assert_eq!(Imm::next_date(date(2025, 12, 18)).unwrap(), date(2026, 3, 18));
    }

    #[test]
    fn codes() {
        assert_eq!(Imm::code(date(2025, 3, 19)).as_deref(), Some("H5"));
        assert_eq!(Imm::code(date(2025, 3, 20)), None);
        assert_eq!(Imm::date_for(3, 5, date(2025, 2, 19)).unwrap(), date(2025, 3, 19));
        // H4 seen from 2025 wraps to 2034.
        assert_eq!(Imm::date_for(3, 4, date(2025, 2, 19)).unwrap(), date(2034, 3, 15));
        assert_eq!(Imm::month_of_letter('z'), Some(12));
        assert_eq!(Imm::month_of_letter('A'), None);
    }
}
