//! Tenor codes attached to market quotes.
//!
//! Quotes name their maturity in one of four ways: a count of 28-day
//! periods (`"13"`, `"13L"`), a plain period (`"3M"`), an IMM contract code
//! (`"H5"`) or a contract month (`"Feb2025"`, or the Spanish `"Ene2025"`).
//! Parsing produces a structured [`TenorCode`]; resolving it into dates
//! needs a reference date and lives in the methods below.

use std::str::FromStr;

use mc_core::errors::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::date::Date;
use crate::imm::Imm;
use crate::period::Period;
use crate::time_unit::TimeUnit;

const ENGLISH_MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const SPANISH_MONTHS: [&str; 12] = [
    "ENE", "FEB", "MAR", "ABR", "MAY", "JUN", "JUL", "AGO", "SEP", "OCT", "NOV", "DIC",
];

/// A parsed tenor code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenorCode {
    /// `n` periods of 28 days.
    TwentyEightDay(u32),
    /// An explicit period such as `1D` or `10Y`.
    Period(Period),
    /// IMM contract: month (1–12) and last digit of the year.
    Imm {
        /// Contract month.
        month: u32,
        /// Last digit of the contract year.
        year_digit: u8,
    },
    /// A calendar month.
    MonthYear {
        /// Month (1–12).
        month: u32,
        /// Four-digit year.
        year: i32,
    },
}

impl TenorCode {
    /// The tenor as a period, for codes that have one.
    pub fn period(&self) -> Result<Period> {
        match *self {
            TenorCode::TwentyEightDay(n) => i32::try_from(n)
                .ok()
                .and_then(|n| n.checked_mul(4))
                .map(|weeks| Period::new(weeks, TimeUnit::Weeks))
                .ok_or_else(|| {
                    Error::Configuration(format!("{n} periods of 28 days is out of range"))
                }),
            TenorCode::Period(p) => Ok(p),
            _ => Err(Error::Configuration(format!("tenor {self} is not a period"))),
        }
    }

    /// The IMM date of a contract code, the first one not before `reference`.
    pub fn imm_date(&self, reference: Date) -> Result<Date> {
        match *self {
            TenorCode::Imm { month, year_digit } => Imm::date_for(month, year_digit, reference),
            _ => Err(Error::Configuration(format!("tenor {self} is not an IMM code"))),
        }
    }

    /// `[first day of the month, first day of the next month)` for a
    /// contract month.
    pub fn month_window(&self) -> Result<(Date, Date)> {
        match *self {
            TenorCode::MonthYear { month, year } => {
                let start = Date::from_ymd(year, month, 1)
                    .map_err(|e| Error::Configuration(e.to_string()))?;
                Ok((start, start.first_of_next_month()?))
            }
            _ => Err(Error::Configuration(format!("tenor {self} is not a contract month"))),
        }
    }
}

fn month_from_abbreviation(abbr: &str) -> Option<u32> {
    let upper = abbr.to_ascii_uppercase();
    ENGLISH_MONTHS
        .iter()
        .position(|m| *m == upper)
        .or_else(|| SPANISH_MONTHS.iter().position(|m| *m == upper))
        .map(|i| i as u32 + 1)
}

impl FromStr for TenorCode {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let s = text.trim();
        let malformed = || Error::Configuration(format!("malformed tenor code '{text}'"));
        if s.is_empty() || !s.is_ascii() {
            return Err(malformed());
        }

        if s.bytes().all(|b| b.is_ascii_digit()) {
            let n: u32 = s.parse().map_err(|_| malformed())?;
            return if n > 0 { Ok(TenorCode::TwentyEightDay(n)) } else { Err(malformed()) };
        }

        let first = s.as_bytes()[0];
        if first.is_ascii_digit() {
            if let Some(count) = s.strip_suffix(|c: char| c == 'L' || c == 'l') {
                let n: u32 = count.parse().map_err(|_| malformed())?;
                return if n > 0 { Ok(TenorCode::TwentyEightDay(n)) } else { Err(malformed()) };
            }
            return s.parse::<Period>().map(TenorCode::Period).map_err(|_| malformed());
        }

        if s.len() == 2 {
            let mut chars = s.chars();
            let (letter, digit) = (chars.next(), chars.next());
            if let (Some(letter), Some(digit)) = (letter, digit.and_then(|d| d.to_digit(10))) {
                let month = Imm::month_of_letter(letter).ok_or_else(malformed)?;
                return Ok(TenorCode::Imm { month, year_digit: digit as u8 });
            }
            return Err(malformed());
        }

        if s.len() == 7 {
            let (abbr, year) = s.split_at(3);
            let month = month_from_abbreviation(abbr).ok_or_else(malformed)?;
            if !year.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            let year: i32 = year.parse().map_err(|_| malformed())?;
            return Ok(TenorCode::MonthYear { month, year });
        }

        Err(malformed())
    }
}

impl std::fmt::Display for TenorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TenorCode::TwentyEightDay(n) => write!(f, "{n}x28D"),
            TenorCode::Period(p) => write!(f, "{p}"),
            TenorCode::Imm { month, year_digit } => {
                let letter = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z']
                    [(*month as usize).saturating_sub(1) % 12];
                write!(f, "{letter}{year_digit}")
            }
            TenorCode::MonthYear { month, year } => {
                let abbr = ENGLISH_MONTHS[(*month as usize).saturating_sub(1) % 12];
                write!(f, "{}{}{year}", &abbr[..1], abbr[1..].to_ascii_lowercase())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn twenty_eight_day_counts() {
        assert_eq!("13".parse::<TenorCode>().unwrap(), TenorCode::TwentyEightDay(13));
        assert_eq!("390L".parse::<TenorCode>().unwrap(), TenorCode::TwentyEightDay(390));
        let p = TenorCode::TwentyEightDay(3).period().unwrap();
        assert_eq!(p, Period::new(12, TimeUnit::Weeks));
    }

    #[test]
    fn oversized_twenty_eight_day_counts_are_rejected() {
        for code in ["1000000000L", "4000000000"] {
            let tenor: TenorCode = code.parse().unwrap();
            let err = tenor.period().unwrap_err();
            assert!(err.is_configuration(), "{code}: {err}");
        }
    }

    #[test]
    fn periods() {
        assert_eq!(
            "1W".parse::<TenorCode>().unwrap(),
            TenorCode::Period(Period::new(1, TimeUnit::Weeks))
        );
        assert_eq!(
            "30Y".parse::<TenorCode>().unwrap().period().unwrap(),
            Period::new(30, TimeUnit::Years)
        );
    }

    #[test]
    fn imm_codes() {
        let code: TenorCode = "H5".parse().unwrap();
        assert_eq!(code, TenorCode::Imm { month: 3, year_digit: 5 });
        assert_eq!(code.imm_date(date(2025, 2, 19)).unwrap(), date(2025, 3, 19));
        assert_eq!(code.to_string(), "H5");
        assert!(code.period().is_err());
    }

    #[test]
    fn contract_months_in_either_language() {
        let feb: TenorCode = "Feb2025".parse().unwrap();
        assert_eq!(feb.month_window().unwrap(), (date(2025, 2, 1), date(2025, 3, 1)));
        let dic: TenorCode = "Dic2025".parse().unwrap();
        assert_eq!(dic.month_window().unwrap(), (date(2025, 12, 1), date(2026, 1, 1)));
        assert_eq!("ene2026".parse::<TenorCode>().unwrap(), TenorCode::MonthYear { month: 1, year: 2026 });
        assert_eq!(feb.to_string(), "Feb2025");
    }

    #[test]
    fn malformed_codes_are_configuration_errors() {
        for bad in ["", "0", "0L", "A5", "H", "Xyz2025", "Feb20x5", "3Q", "13LL", "Février"] {
            let err = bad.parse::<TenorCode>().unwrap_err();
            assert!(err.is_configuration(), "{bad}: {err}");
        }
    }
}
