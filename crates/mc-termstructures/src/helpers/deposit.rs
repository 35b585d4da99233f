//! Money-market deposit.
//!
//! A deposit over `[start, maturity]` at simple rate `r` pins
//! `P(start)/P(maturity) = 1 + r·τ`. When it starts on the valuation date
//! the pillar follows in closed form, `P(maturity) = 1/(1 + r·τ)`.

use mc_core::errors::Result;
use mc_core::{DiscountFactor, Rate, Real, Time};
use mc_time::{Date, DayCounter, Period};

use super::conventions::{settlement_date, DepositConventions};
use super::PricingContext;
use crate::curve_id::CurveRef;
use crate::yield_curve::YieldCurve;

/// A deposit quote.
#[derive(Debug, Clone)]
pub struct ZeroDeposit {
    rate: Rate,
    start: Date,
    maturity: Date,
    tau: Time,
    description: String,
}

impl ZeroDeposit {
    /// A deposit of `tenor` starting `settlement_days` after `valuation`.
    pub fn new(
        rate: Rate,
        valuation: Date,
        tenor: Period,
        conventions: &DepositConventions,
    ) -> Result<Self> {
        let calendar = conventions.calendar.as_ref();
        let start = settlement_date(calendar, valuation, conventions.settlement_days)?;
        let maturity = calendar.advance(
            start,
            tenor,
            conventions.convention,
            conventions.end_of_month,
        )?;
        let mut deposit =
            Self::from_dates(rate, start, maturity, conventions.day_counter.as_ref())?;
        deposit.description = format!("deposit {tenor} to {maturity}");
        Ok(deposit)
    }

    /// A deposit over explicit dates.
    pub fn from_dates(
        rate: Rate,
        start: Date,
        maturity: Date,
        day_counter: &dyn DayCounter,
    ) -> Result<Self> {
        mc_core::configuration!(rate.is_finite(), "deposit rate {rate} is not finite");
        mc_core::configuration!(
            start < maturity,
            "deposit start {start} is not before maturity {maturity}"
        );
        Ok(Self {
            rate,
            start,
            maturity,
            tau: day_counter.year_fraction(start, maturity),
            description: format!("deposit {start} to {maturity}"),
        })
    }

    /// Quoted simple rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Accrual start.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Accrual end.
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Accrual year fraction.
    pub fn tau(&self) -> Time {
        self.tau
    }

    /// The maturity.
    pub fn pillar(&self) -> Date {
        self.maturity
    }

    /// Description for reports.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// `1/(1 + r·τ)` when the deposit starts at `valuation`.
    pub fn closed_form(&self, valuation: Date) -> Option<DiscountFactor> {
        (self.start == valuation).then(|| 1.0 / (1.0 + self.rate * self.tau))
    }

    /// Simple rate implied by `curve` over the deposit period.
    pub fn implied_rate(&self, curve: &dyn YieldCurve) -> Result<Rate> {
        Ok((curve.discount(self.start)? / curve.discount(self.maturity)? - 1.0) / self.tau)
    }

    /// Implied rate minus quoted rate.
    pub fn residual(&self, ctx: &PricingContext<'_>) -> Result<Real> {
        Ok(self.implied_rate(ctx.curve())? - self.rate)
    }

    pub(crate) fn curve_refs(&self) -> Vec<CurveRef> {
        vec![CurveRef::UnderConstruction]
    }
}
