//! `FixingSeries` — published overnight rates by date.

use std::collections::BTreeMap;

use mc_core::errors::{Error, Result};
use mc_core::{Rate, Real};
use mc_time::{Calendar, Date};

/// Published fixings of one index, as decimals.
///
/// Append-only: a date, once recorded, cannot be rewritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixingSeries {
    index: String,
    data: BTreeMap<Date, Rate>,
}

impl FixingSeries {
    /// An empty series for `index`.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            data: BTreeMap::new(),
        }
    }

    /// Build from `(date, rate)` pairs; duplicates are rejected.
    pub fn from_pairs(index: impl Into<String>, pairs: impl IntoIterator<Item = (Date, Rate)>) -> Result<Self> {
        let mut series = Self::new(index);
        for (date, rate) in pairs {
            series.append(date, rate)?;
        }
        Ok(series)
    }

    /// Parse rows of `(date text, rate in percent)` with dates formatted as
    /// `dd/mm/YYYY`, the layout central-bank fixing tables are published in.
    pub fn from_text_rows<'a>(
        index: impl Into<String>,
        rows: impl IntoIterator<Item = (&'a str, Real)>,
    ) -> Result<Self> {
        let mut series = Self::new(index);
        for (text, percent) in rows {
            let date = Date::parse(text, "%d/%m/%Y")
                .map_err(|e| Error::Configuration(e.to_string()))?;
            series.append(date, percent / 100.0)?;
        }
        Ok(series)
    }

    /// Record a fixing.
    pub fn append(&mut self, date: Date, rate: Rate) -> Result<()> {
        if !rate.is_finite() {
            return Err(Error::Configuration(format!(
                "{} fixing for {date} is not finite",
                self.index
            )));
        }
        if let Some(existing) = self.data.get(&date) {
            return Err(Error::Configuration(format!(
                "{} fixing for {date} already recorded ({existing})",
                self.index
            )));
        }
        self.data.insert(date, rate);
        Ok(())
    }

    /// Index name.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// The fixing on `date`, if published.
    pub fn get(&self, date: Date) -> Option<Rate> {
        self.data.get(&date).copied()
    }

    /// The fixing on `date`, or [`Error::MissingFixing`].
    pub fn fixing(&self, date: Date) -> Result<Rate> {
        self.get(date).ok_or_else(|| Error::MissingFixing {
            index: self.index.clone(),
            date: date.to_string(),
        })
    }

    /// Check that every business day in `[from, to)` has a fixing.
    pub fn ensure_covers(&self, calendar: &dyn Calendar, from: Date, to: Date) -> Result<()> {
        for day in calendar.business_days(from, to)? {
            self.fixing(day)?;
        }
        Ok(())
    }

    /// Number of fixings.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `(date, rate)` in date order.
    pub fn iter(&self) -> impl Iterator<Item = (Date, Rate)> + '_ {
        self.data.iter().map(|(d, r)| (*d, *r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_time::Mexico;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn banxico() -> FixingSeries {
        FixingSeries::from_text_rows(
            "F-TIIE",
            [
                ("31/01/2025", 10.03),
                ("04/02/2025", 10.02),
                ("05/02/2025", 10.05),
                ("06/02/2025", 10.00),
                ("07/02/2025", 9.49),
            ],
        )
        .unwrap()
    }

    #[test]
    fn parses_percent_rows() {
        let s = banxico();
        assert_eq!(s.len(), 5);
        assert_eq!(s.iter().next(), Some((date(2025, 1, 31), 10.03 / 100.0)));
        assert_eq!(s.get(date(2025, 2, 7)), Some(9.49 / 100.0));
        assert_eq!(s.get(date(2025, 2, 3)), None);
    }

    #[test]
    fn missing_fixing_names_index_and_date() {
        let err = banxico().fixing(date(2025, 2, 10)).unwrap_err();
        assert_eq!(
            err,
            Error::MissingFixing {
                index: "F-TIIE".into(),
                date: "2025-02-10".into()
            }
        );
    }

    #[test]
    fn append_only() {
        let mut s = banxico();
        assert!(s.append(date(2025, 2, 4), 0.1).unwrap_err().is_configuration());
        s.append(date(2025, 2, 10), 0.095).unwrap();
        assert_eq!(s.iter().last(), Some((date(2025, 2, 10), 0.095)));
        assert!(s.append(date(2025, 2, 11), f64::NAN).is_err());
    }

    #[test]
    fn coverage_skips_holidays() {
        let s = banxico();
        // 1-3 Feb 2025 are a weekend and Constitution Day.
        assert!(s.ensure_covers(&Mexico, date(2025, 1, 31), date(2025, 2, 8)).is_ok());
        assert!(matches!(
            s.ensure_covers(&Mexico, date(2025, 1, 31), date(2025, 2, 11)),
            Err(Error::MissingFixing { .. })
        ));
    }

    #[test]
    fn malformed_dates_are_configuration_errors() {
        let err = FixingSeries::from_text_rows("F-TIIE", [("2025-02-04", 10.0)]).unwrap_err();
        assert!(err.is_configuration());
    }
}
