//! Country calendars used by the market recipes.

/// Mexico (BMV / Banxico settlement).
pub mod mexico;

/// United States (Settlement, Federal Reserve).
pub mod united_states;

/// Day of the year (1-based) of Easter Sunday, anonymous Gregorian
/// algorithm. Easter always falls in March or April.
pub fn easter_sunday_ordinal(year: i32) -> u32 {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    let march_start = if leap { 60 } else { 59 };
    let ordinal = if month == 3 { march_start + day } else { march_start + 31 + day };
    ordinal as u32
}
