//! Interest-rate futures, quoted as `100 − rate`.

use mc_core::errors::Result;
use mc_core::{Price, Rate, Real, Time};
use mc_indexes::{OvernightIndex, OvernightStep};
use mc_time::{Date, Imm, Period, TimeUnit};

use super::conventions::FuturesConventions;
use super::{compounded_growth, PricingContext};
use crate::curve_id::CurveRef;

fn rate_of_price(price: Price) -> Rate {
    (100.0 - price) / 100.0
}

/// Future settling on the compounded overnight rate over a window,
/// typically one calendar month.
///
/// Published fixings inside the window are compounded as they are; the
/// rest are forecast from the curve.
#[derive(Debug, Clone)]
pub struct OvernightIndexFuture {
    price: Price,
    start: Date,
    end: Date,
    tau: Time,
    steps: Vec<OvernightStep>,
    index: OvernightIndex,
    forecast: CurveRef,
    description: String,
}

impl OvernightIndexFuture {
    /// A future on `index` compounded over `[start, end)`.
    pub fn new(
        price: Price,
        start: Date,
        end: Date,
        index: &OvernightIndex,
        forecast: CurveRef,
    ) -> Result<Self> {
        mc_core::configuration!(price.is_finite(), "futures price {price} is not finite");
        mc_core::configuration!(
            start < end,
            "futures window [{start}, {end}) is empty"
        );
        Ok(Self {
            price,
            start,
            end,
            tau: index.day_counter().year_fraction(start, end),
            steps: index.accrual_steps(start, end)?,
            index: index.clone(),
            forecast,
            description: format!("{} future {start} to {end}", index.name()),
        })
    }

    /// Quoted price.
    pub fn price(&self) -> Price {
        self.price
    }

    /// Window start.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Window end (exclusive).
    pub fn end(&self) -> Date {
        self.end
    }

    /// The window end.
    pub fn pillar(&self) -> Date {
        self.end
    }

    /// Description for reports.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Average compounded rate over the window.
    pub fn implied_rate(&self, ctx: &PricingContext<'_>) -> Result<Rate> {
        let forecast = ctx.resolve(self.forecast)?;
        let growth = compounded_growth(&self.index, &self.steps, 0.0, forecast)?;
        Ok((growth - 1.0) / self.tau)
    }

    /// Implied rate minus the rate the price quotes.
    pub fn residual(&self, ctx: &PricingContext<'_>) -> Result<Real> {
        Ok(self.implied_rate(ctx)? - rate_of_price(self.price))
    }

    pub(crate) fn curve_refs(&self) -> Vec<CurveRef> {
        vec![self.forecast]
    }
}

/// Future on the simple forward rate from an IMM date.
///
/// No convexity adjustment is applied.
#[derive(Debug, Clone)]
pub struct ImmFuture {
    price: Price,
    start: Date,
    end: Date,
    tau: Time,
    forecast: CurveRef,
    description: String,
}

impl ImmFuture {
    /// A future starting on `imm_date`.
    pub fn new(price: Price, imm_date: Date, conventions: &FuturesConventions) -> Result<Self> {
        mc_core::configuration!(price.is_finite(), "futures price {price} is not finite");
        let Some(code) = Imm::code(imm_date) else {
            return Err(mc_core::Error::Configuration(format!(
                "{imm_date} is not an IMM date"
            )));
        };
        let end = conventions.calendar.advance(
            imm_date,
            Period::new(conventions.months, TimeUnit::Months),
            conventions.convention,
            conventions.end_of_month,
        )?;
        mc_core::configuration!(end > imm_date, "future {code} has an empty window");
        Ok(Self {
            price,
            start: imm_date,
            end,
            tau: conventions.day_counter.year_fraction(imm_date, end),
            forecast: conventions.forecast,
            description: format!("future {code} ({imm_date} to {end})"),
        })
    }

    /// Quoted price.
    pub fn price(&self) -> Price {
        self.price
    }

    /// The IMM start date.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Window end.
    pub fn end(&self) -> Date {
        self.end
    }

    /// The window end.
    pub fn pillar(&self) -> Date {
        self.end
    }

    /// Description for reports.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Simple forward rate over the window.
    pub fn implied_rate(&self, ctx: &PricingContext<'_>) -> Result<Rate> {
        let curve = ctx.resolve(self.forecast)?;
        Ok((curve.discount(self.start)? / curve.discount(self.end)? - 1.0) / self.tau)
    }

    /// Implied rate minus the rate the price quotes.
    pub fn residual(&self, ctx: &PricingContext<'_>) -> Result<Real> {
        Ok(self.implied_rate(ctx)? - rate_of_price(self.price))
    }

    pub(crate) fn curve_refs(&self) -> Vec<CurveRef> {
        vec![self.forecast]
    }
}
