//! `Date` type.
//!
//! A calendar date without time of day, stored as a `chrono::NaiveDate` and
//! exposing the serial-number view (days since 31 December 1899) that the
//! curve arithmetic works with.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use mc_core::errors::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::time_unit::TimeUnit;

/// `num_days_from_ce()` of 31 December 1899, the serial epoch.
const SERIAL_EPOCH: i32 = 693_595;

/// A calendar date.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Create a date from year, month (1–12) and day-of-month (1–31).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| Error::Date(format!("invalid date {year}-{month:02}-{day:02}")))
    }

    /// Create a date from its serial number (1 = 1 January 1900).
    pub fn from_serial(serial: i32) -> Result<Self> {
        NaiveDate::from_num_days_from_ce_opt(serial + SERIAL_EPOCH)
            .map(Date)
            .ok_or_else(|| Error::Date(format!("serial {serial} out of range")))
    }

    /// Parse a date with a `chrono` format string, e.g. `"%d/%m/%Y"`.
    pub fn parse(text: &str, format: &str) -> Result<Self> {
        NaiveDate::parse_from_str(text.trim(), format)
            .map(Date)
            .map_err(|e| Error::Date(format!("cannot parse '{text}' as {format}: {e}")))
    }

    /// Wrap a `chrono` date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Date(date)
    }

    /// The underlying `chrono` date.
    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Days since 31 December 1899.
    pub fn serial(&self) -> i32 {
        self.0.num_days_from_ce() - SERIAL_EPOCH
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month (1–12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of the month (1–31).
    pub fn day_of_month(&self) -> u32 {
        self.0.day()
    }

    /// Day of the year (1–366).
    pub fn day_of_year(&self) -> u32 {
        self.0.ordinal()
    }

    /// Day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    // ── Arithmetic ────────────────────────────────────────────────────────────

    /// Move by `n` calendar days (negative moves backwards).
    pub fn add_days(self, n: i64) -> Result<Self> {
        let moved = if n >= 0 {
            self.0.checked_add_days(Days::new(n.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(n.unsigned_abs()))
        };
        moved
            .map(Date)
            .ok_or_else(|| Error::Date(format!("{self} moved by {n} days is out of range")))
    }

    /// Move by `n` units. Month and year moves clamp to the end of the
    /// target month (31 Jan + 1M = 28/29 Feb).
    pub fn advance(self, n: i32, unit: TimeUnit) -> Result<Self> {
        match unit {
            TimeUnit::Days => self.add_days(i64::from(n)),
            TimeUnit::Weeks => self.add_days(7 * i64::from(n)),
            TimeUnit::Months => {
                let months = Months::new(n.unsigned_abs());
                let moved = if n >= 0 {
                    self.0.checked_add_months(months)
                } else {
                    self.0.checked_sub_months(months)
                };
                moved
                    .map(Date)
                    .ok_or_else(|| Error::Date(format!("{self} moved by {n} months is out of range")))
            }
            TimeUnit::Years => self.advance(n * 12, TimeUnit::Months),
        }
    }

    /// Calendar days from `self` to `other` (positive if `other` is later).
    pub fn days_between(self, other: Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Last calendar day of this date's month.
    pub fn end_of_month(self) -> Self {
        let first = self.0.with_day(1).unwrap_or(self.0);
        match first.checked_add_months(Months::new(1)) {
            Some(next) => Date(next.pred_opt().unwrap_or(self.0)),
            None => self,
        }
    }

    /// Whether this is the last calendar day of its month.
    pub fn is_end_of_month(self) -> bool {
        self == self.end_of_month()
    }

    /// First calendar day of the following month.
    pub fn first_of_next_month(self) -> Result<Self> {
        self.end_of_month().add_days(1)
    }

    /// The `n`-th occurrence of `weekday` in `month` of `year`, e.g. the
    /// third Wednesday of March.
    pub fn nth_weekday(n: u8, weekday: Weekday, year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
            .map(Date)
            .ok_or_else(|| {
                Error::Date(format!("no {n}-th {weekday} in {year}-{month:02}"))
            })
    }

    /// Whether `self` falls on Saturday or Sunday.
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

impl std::ops::Sub<Date> for Date {
    type Output = i64;
    fn sub(self, rhs: Date) -> i64 {
        rhs.days_between(self)
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl std::fmt::Debug for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Date({})", self.0.format("%Y-%m-%d"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
