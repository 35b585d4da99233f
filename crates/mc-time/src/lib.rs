//! # mc-time
//!
//! Dates, calendars, day counters, schedules, IMM rules and the tenor-code
//! parser used to turn market quotes into instrument dates.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Business-day adjustment conventions.
pub mod business_day_convention;

/// Calendar trait and the holiday-free calendars.
pub mod calendar;

/// Country calendars.
pub mod calendars;

/// `Date` type.
pub mod date;

/// `DayCounter` trait and the actual-day conventions.
pub mod day_counter;

/// Coupon frequency.
pub mod frequency;

/// IMM futures dates and contract codes.
pub mod imm;

/// `Period` — a time span in a `TimeUnit`.
pub mod period;

/// `Schedule` — accrual dates of a swap leg.
pub mod schedule;

/// Tenor codes attached to market quotes.
pub mod tenor;

/// `TimeUnit` — days, weeks, months, years.
pub mod time_unit;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use business_day_convention::BusinessDayConvention;
pub use calendar::{Calendar, NullCalendar, WeekendsOnly};
pub use calendars::mexico::Mexico;
pub use calendars::united_states::{UnitedStates, UsMarket};
pub use chrono::Weekday;
pub use date::Date;
pub use day_counter::{Actual360, Actual365Fixed, DayCountConvention, DayCounter};
pub use frequency::Frequency;
pub use imm::Imm;
pub use period::Period;
pub use schedule::{DateGeneration, Schedule, ScheduleBuilder};
pub use tenor::TenorCode;
pub use time_unit::TimeUnit;
