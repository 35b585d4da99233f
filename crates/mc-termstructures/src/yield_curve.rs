//! `YieldCurve` — the query side of a discount curve.
//!
//! Implementors provide the discount factor for a date; zero and forward
//! rates follow algebraically from it:
//!
//! * **zero rate** — the rate that grows `1/P(T)` over `[valuation, T]`
//! * **forward rate** — the rate that grows `P(d1)/P(d2)` over `[d1, d2]`

use mc_core::errors::Result;
use mc_core::{Compounding, DiscountFactor, Rate};
use mc_time::{Date, DayCounter, Frequency};

/// A discount curve anchored at its valuation date.
pub trait YieldCurve: std::fmt::Debug + Send + Sync {
    /// Date at which the discount factor is one.
    fn valuation_date(&self) -> Date;

    /// Discount factor for `date`.
    ///
    /// # Errors
    /// `OutOfRange` before the valuation date, or past the last node when
    /// the curve does not extrapolate.
    fn discount(&self, date: Date) -> Result<DiscountFactor>;

    /// Zero rate from the valuation date to `date` under the given
    /// conventions.
    ///
    /// At the valuation date itself the one-day forward is returned.
    fn zero_rate(
        &self,
        date: Date,
        dc: &dyn DayCounter,
        comp: Compounding,
        freq: Frequency,
    ) -> Result<Rate> {
        let valuation = self.valuation_date();
        if date == valuation {
            return self.forward_rate(valuation, valuation.add_days(1)?, dc, comp, freq);
        }
        let t = dc.year_fraction(valuation, date);
        let df = self.discount(date)?;
        comp.implied_rate(1.0 / df, t, freq.periods_per_year())
    }

    /// Forward rate over `[d1, d2]` under the given conventions.
    fn forward_rate(
        &self,
        d1: Date,
        d2: Date,
        dc: &dyn DayCounter,
        comp: Compounding,
        freq: Frequency,
    ) -> Result<Rate> {
        mc_core::ensure!(d1 < d2, "forward period [{d1}, {d2}] is empty");
        let compound = self.discount(d1)? / self.discount(d2)?;
        comp.implied_rate(compound, dc.year_fraction(d1, d2), freq.periods_per_year())
    }
}
