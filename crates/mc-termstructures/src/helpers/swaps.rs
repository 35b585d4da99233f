//! Swap helpers.
//!
//! All three swaps are quoted by a fixed rate and calibrate the pillar at
//! their last payment date:
//!
//! * [`ParSwap`] — fixed against a term rate forecast as simple forwards;
//! * [`OvernightIndexedSwap`] — fixed against a compounded overnight rate,
//!   optionally plus a spread;
//! * [`CrossCurrencyBasisSwap`] — domestic fixed with notional exchanges
//!   against the foreign overnight rate plus a spread, also with notional
//!   exchanges. The domestic leg is discounted on the curve being built and
//!   the foreign leg on the foreign curve.

use mc_core::errors::Result;
use mc_core::{Rate, Real, Spread};
use mc_indexes::OvernightIndex;
use mc_time::{Date, Period};

use super::conventions::{
    settlement_date, BasisSwapConventions, OisConventions, SwapConventions,
};
use super::{compounded_growth, leg_coupons, overnight_coupons, Coupon, OvernightCoupon};
use super::PricingContext;
use crate::curve_id::CurveRef;
use crate::yield_curve::YieldCurve;

fn last_payment(coupons: &[Coupon]) -> Result<Date> {
    coupons
        .iter()
        .map(|c| c.payment)
        .max()
        .ok_or_else(|| mc_core::Error::Configuration("swap has no coupons".into()))
}

fn annuity(coupons: &[Coupon], discount: &dyn YieldCurve) -> Result<Real> {
    coupons
        .iter()
        .try_fold(0.0, |acc, c| Ok(acc + c.tau * discount.discount(c.payment)?))
}

// ── ParSwap ───────────────────────────────────────────────────────────────────

/// Fixed against a term rate.
#[derive(Debug, Clone)]
pub struct ParSwap {
    rate: Rate,
    fixed: Vec<Coupon>,
    floating: Vec<Coupon>,
    pillar: Date,
    discount: CurveRef,
    forecast: CurveRef,
    description: String,
}

impl ParSwap {
    /// A spot-starting swap of `tenor`.
    pub fn new(
        rate: Rate,
        valuation: Date,
        tenor: Period,
        conventions: &SwapConventions,
    ) -> Result<Self> {
        mc_core::configuration!(rate.is_finite(), "swap rate {rate} is not finite");
        let calendar = conventions.calendar.as_ref();
        let start = settlement_date(calendar, valuation, conventions.settlement_days)?;
        let fixed = leg_coupons(
            calendar,
            start,
            tenor,
            conventions.fixed_frequency,
            conventions.convention,
            false,
            0,
            conventions.fixed_day_counter.as_ref(),
        )?;
        let floating = leg_coupons(
            calendar,
            start,
            tenor,
            conventions.floating_frequency,
            conventions.convention,
            false,
            0,
            conventions.floating_day_counter.as_ref(),
        )?;
        let pillar = last_payment(&fixed)?.max(last_payment(&floating)?);
        Ok(Self {
            rate,
            fixed,
            floating,
            pillar,
            discount: conventions.discount,
            forecast: conventions.forecast,
            description: format!("swap {tenor} to {pillar}"),
        })
    }

    /// Quoted fixed rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Fixed-leg coupons.
    pub fn fixed_leg(&self) -> &[Coupon] {
        &self.fixed
    }

    /// Floating-leg coupons.
    pub fn floating_leg(&self) -> &[Coupon] {
        &self.floating
    }

    /// The last payment date.
    pub fn pillar(&self) -> Date {
        self.pillar
    }

    /// Description for reports.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fixed rate that prices the swap at par.
    pub fn fair_rate(&self, ctx: &PricingContext<'_>) -> Result<Rate> {
        let discount = ctx.resolve(self.discount)?;
        let forecast = ctx.resolve(self.forecast)?;
        let mut floating = 0.0;
        for c in &self.floating {
            let growth = forecast.discount(c.start)? / forecast.discount(c.end)?;
            floating += (growth - 1.0) * discount.discount(c.payment)?;
        }
        Ok(floating / annuity(&self.fixed, discount)?)
    }

    /// Fair rate minus quoted rate.
    pub fn residual(&self, ctx: &PricingContext<'_>) -> Result<Real> {
        Ok(self.fair_rate(ctx)? - self.rate)
    }

    pub(crate) fn curve_refs(&self) -> Vec<CurveRef> {
        vec![self.discount, self.forecast]
    }
}

// ── OvernightIndexedSwap ──────────────────────────────────────────────────────

/// Fixed against a compounded overnight rate.
#[derive(Debug, Clone)]
pub struct OvernightIndexedSwap {
    rate: Rate,
    spread: Spread,
    coupons: Vec<OvernightCoupon>,
    index: OvernightIndex,
    pillar: Date,
    discount: CurveRef,
    forecast: CurveRef,
    description: String,
}

impl OvernightIndexedSwap {
    /// A spot-starting swap of `tenor`.
    pub fn new(
        rate: Rate,
        valuation: Date,
        tenor: Period,
        conventions: &OisConventions,
    ) -> Result<Self> {
        mc_core::configuration!(rate.is_finite(), "OIS rate {rate} is not finite");
        let calendar = conventions.calendar.as_ref();
        let start = settlement_date(calendar, valuation, conventions.settlement_days)?;
        let coupons = leg_coupons(
            calendar,
            start,
            tenor,
            conventions.frequency,
            conventions.convention,
            conventions.end_of_month,
            conventions.payment_lag,
            conventions.fixed_day_counter.as_ref(),
        )?;
        let pillar = last_payment(&coupons)?;
        Ok(Self {
            rate,
            spread: 0.0,
            coupons: overnight_coupons(&conventions.index, coupons)?,
            index: conventions.index.clone(),
            pillar,
            discount: conventions.discount,
            forecast: conventions.forecast,
            description: format!("{} OIS {tenor} to {pillar}", conventions.index.name()),
        })
    }

    /// Add `spread` to every compounded daily rate.
    pub fn with_spread(mut self, spread: Spread) -> Self {
        self.spread = spread;
        self
    }

    /// Quoted fixed rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Spread over the overnight rate.
    pub fn spread(&self) -> Spread {
        self.spread
    }

    /// Coupons with their daily steps.
    pub fn coupons(&self) -> &[OvernightCoupon] {
        &self.coupons
    }

    /// The last payment date.
    pub fn pillar(&self) -> Date {
        self.pillar
    }

    /// Description for reports.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fixed rate that prices the swap at par.
    pub fn fair_rate(&self, ctx: &PricingContext<'_>) -> Result<Rate> {
        let discount = ctx.resolve(self.discount)?;
        let forecast = ctx.resolve(self.forecast)?;
        let mut floating = 0.0;
        let mut annuity = 0.0;
        for oc in &self.coupons {
            let df = discount.discount(oc.coupon.payment)?;
            let growth = compounded_growth(&self.index, &oc.steps, self.spread, forecast)?;
            floating += (growth - 1.0) * df;
            annuity += oc.coupon.tau * df;
        }
        Ok(floating / annuity)
    }

    /// Fair rate minus quoted rate.
    pub fn residual(&self, ctx: &PricingContext<'_>) -> Result<Real> {
        Ok(self.fair_rate(ctx)? - self.rate)
    }

    pub(crate) fn curve_refs(&self) -> Vec<CurveRef> {
        vec![self.discount, self.forecast]
    }
}

// ── CrossCurrencyBasisSwap ────────────────────────────────────────────────────

/// Domestic fixed rate against the foreign overnight rate plus a spread,
/// with notional exchanges on both legs.
///
/// Both legs are valued per unit of their own notional; the notionals are
/// equivalent at spot, so the swap is at par when the two values agree.
#[derive(Debug, Clone)]
pub struct CrossCurrencyBasisSwap {
    rate: Rate,
    spread: Spread,
    start: Date,
    coupons: Vec<OvernightCoupon>,
    foreign_index: OvernightIndex,
    pillar: Date,
    foreign: CurveRef,
    description: String,
}

impl CrossCurrencyBasisSwap {
    /// A spot-starting swap of `tenor` paying `rate` on the domestic leg
    /// against the foreign overnight rate plus `spread`.
    pub fn new(
        rate: Rate,
        spread: Spread,
        valuation: Date,
        tenor: Period,
        conventions: &BasisSwapConventions,
    ) -> Result<Self> {
        mc_core::configuration!(
            rate.is_finite() && spread.is_finite(),
            "basis swap quote ({rate}, {spread}) is not finite"
        );
        mc_core::configuration!(
            conventions.foreign != CurveRef::UnderConstruction,
            "the foreign leg must be priced on a built curve"
        );
        let calendar = conventions.calendar.as_ref();
        let start = settlement_date(calendar, valuation, conventions.settlement_days)?;
        let coupons = leg_coupons(
            calendar,
            start,
            tenor,
            conventions.frequency,
            conventions.convention,
            false,
            conventions.payment_lag,
            conventions.domestic_day_counter.as_ref(),
        )?;
        let pillar = last_payment(&coupons)?;
        Ok(Self {
            rate,
            spread,
            start,
            coupons: overnight_coupons(&conventions.foreign_index, coupons)?,
            foreign_index: conventions.foreign_index.clone(),
            pillar,
            foreign: conventions.foreign,
            description: format!(
                "basis swap {tenor} vs {}{:+.2}bp to {pillar}",
                conventions.foreign_index.name(),
                spread * 1e4
            ),
        })
    }

    /// Quoted domestic fixed rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Spread over the foreign overnight rate.
    pub fn spread(&self) -> Spread {
        self.spread
    }

    /// The last payment date.
    pub fn pillar(&self) -> Date {
        self.pillar
    }

    /// Description for reports.
    pub fn description(&self) -> &str {
        &self.description
    }

    fn domestic_annuity(&self, domestic: &dyn YieldCurve) -> Result<Real> {
        self.coupons
            .iter()
            .try_fold(0.0, |acc, oc| Ok(acc + oc.coupon.tau * domestic.discount(oc.coupon.payment)?))
    }

    /// Value of the foreign leg per unit notional, with exchanges.
    fn foreign_leg(&self, foreign: &dyn YieldCurve) -> Result<Real> {
        let mut value = 0.0;
        for oc in &self.coupons {
            let growth = compounded_growth(&self.foreign_index, &oc.steps, self.spread, foreign)?;
            value += (growth - 1.0) * foreign.discount(oc.coupon.payment)?;
        }
        Ok(value - foreign.discount(self.start)? + foreign.discount(self.pillar)?)
    }

    /// Domestic fixed rate that prices the swap at par.
    pub fn fair_rate(&self, ctx: &PricingContext<'_>) -> Result<Rate> {
        let domestic = ctx.curve();
        let foreign = ctx.resolve(self.foreign)?;
        let exchanges = domestic.discount(self.start)? - domestic.discount(self.pillar)?;
        Ok((self.foreign_leg(foreign)? + exchanges) / self.domestic_annuity(domestic)?)
    }

    /// Fair minus quoted domestic fixed rate.
    pub fn residual(&self, ctx: &PricingContext<'_>) -> Result<Real> {
        Ok(self.fair_rate(ctx)? - self.rate)
    }

    pub(crate) fn curve_refs(&self) -> Vec<CurveRef> {
        vec![CurveRef::UnderConstruction, self.foreign]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use approx::assert_abs_diff_eq;
    use mc_time::{Actual360, BusinessDayConvention, Frequency, Mexico, TimeUnit, UnitedStates};

    use crate::curve_id::{BuiltCurves, CurveId};
    use crate::piecewise_curve::{CurveConfig, Interpolation, PiecewiseCurve};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn flat_curve(valuation: Date, rate: Real) -> PiecewiseCurve {
        let config = CurveConfig::new("flat", Interpolation::LogLinear).with_extrapolation(true);
        let end = date(2060, 1, 3);
        let t = (end - valuation) as Real / 360.0;
        PiecewiseCurve::from_nodes(&config, valuation, &[(end, (-rate * t).exp())]).unwrap()
    }

    fn tiie_conventions() -> SwapConventions {
        SwapConventions {
            settlement_days: 1,
            calendar: Arc::new(Mexico),
            convention: BusinessDayConvention::Following,
            fixed_frequency: Frequency::EveryFourthWeek,
            fixed_day_counter: Arc::new(Actual360),
            floating_frequency: Frequency::EveryFourthWeek,
            floating_day_counter: Arc::new(Actual360),
            discount: CurveRef::UnderConstruction,
            forecast: CurveRef::UnderConstruction,
        }
    }

    #[test]
    fn self_discounted_swap_fair_rate_telescopes() {
        let valuation = date(2025, 2, 19);
        let curve = flat_curve(valuation, 0.09);
        let swap = ParSwap::new(0.09, valuation, Period::new(52, TimeUnit::Weeks), &tiie_conventions())
            .unwrap();
        assert_eq!(swap.fixed_leg().len(), 13);
        let built = BuiltCurves::new();
        let ctx = PricingContext::new("flat", &curve, &built);
        let fair = swap.fair_rate(&ctx).unwrap();
        let start = swap.fixed_leg()[0].start;
        let expected = (curve.discount(start).unwrap() - curve.discount(swap.pillar()).unwrap())
            / annuity(swap.fixed_leg(), &curve).unwrap();
        assert_abs_diff_eq!(fair, expected, epsilon = 1e-14);
    }

    #[test]
    fn ois_on_flat_curve_prices_near_the_simple_equivalent_rate() {
        let valuation = date(2025, 2, 19);
        let curve = flat_curve(valuation, 0.04);
        let conventions = OisConventions {
            settlement_days: 2,
            calendar: Arc::new(UnitedStates::federal_reserve()),
            convention: BusinessDayConvention::ModifiedFollowing,
            end_of_month: false,
            frequency: Frequency::Annual,
            payment_lag: 2,
            fixed_day_counter: Arc::new(Actual360),
            index: OvernightIndex::sofr(),
            discount: CurveRef::UnderConstruction,
            forecast: CurveRef::UnderConstruction,
        };
        let ois = OvernightIndexedSwap::new(0.04, valuation, Period::new(2, TimeUnit::Years), &conventions)
            .unwrap();
        assert_eq!(ois.coupons().len(), 2);
        assert_eq!(ois.coupons()[0].coupon.start, date(2025, 2, 21));
        // 21 Feb 2027 is a Sunday; two business days of payment lag follow.
        assert_eq!(ois.pillar(), date(2027, 2, 24));
        let built = BuiltCurves::new();
        let fair = ois.fair_rate(&PricingContext::new("flat", &curve, &built)).unwrap();
        // Annual compounding of a 4% continuous rate on Act/360.
        assert!((fair - 0.0408).abs() < 5e-4, "fair {fair}");
        let wider = ois.clone().with_spread(0.001);
        let fair_wider = wider.fair_rate(&PricingContext::new("flat", &curve, &built)).unwrap();
        assert!(fair_wider > fair + 0.0009);
    }

    #[test]
    fn basis_swap_needs_the_foreign_curve() {
        let valuation = date(2025, 2, 19);
        let domestic = flat_curve(valuation, 0.09);
        let conventions = BasisSwapConventions {
            settlement_days: 2,
            calendar: Arc::new(Mexico),
            convention: BusinessDayConvention::Following,
            frequency: Frequency::EveryFourthWeek,
            payment_lag: 2,
            domestic_day_counter: Arc::new(Actual360),
            foreign_index: OvernightIndex::sofr(),
            foreign: CurveRef::Built(CurveId::Collateral),
        };
        let swap = CrossCurrencyBasisSwap::new(
            0.0845,
            0.00249,
            valuation,
            Period::new(104, TimeUnit::Weeks),
            &conventions,
        )
        .unwrap();
        let empty = BuiltCurves::new();
        let err = swap
            .residual(&PricingContext::new("domestic-discount", &domestic, &empty))
            .unwrap_err();
        assert!(matches!(err, mc_core::Error::MissingDependency { .. }));

        // With equal flat curves and no spread the fair rate is the
        // domestic par rate.
        let mut built = BuiltCurves::new();
        built.insert(CurveId::Collateral, Arc::new(flat_curve(valuation, 0.09)));
        let at_par = CrossCurrencyBasisSwap::new(
            0.0845,
            0.0,
            valuation,
            Period::new(104, TimeUnit::Weeks),
            &conventions,
        )
        .unwrap();
        let fair = at_par
            .fair_rate(&PricingContext::new("domestic-discount", &domestic, &built))
            .unwrap();
        assert!((fair - 0.09).abs() < 2e-3, "fair {fair}");
        // A positive foreign spread raises the domestic fair rate.
        let fair_spread = swap
            .fair_rate(&PricingContext::new("domestic-discount", &domestic, &built))
            .unwrap();
        assert!(fair_spread > fair);

        // Quoted above fair, the residual is negative by the gap.
        let ctx = PricingContext::new("domestic-discount", &domestic, &built);
        let rich = CrossCurrencyBasisSwap::new(
            fair + 0.001,
            0.0,
            valuation,
            Period::new(104, TimeUnit::Weeks),
            &conventions,
        )
        .unwrap();
        assert_abs_diff_eq!(rich.residual(&ctx).unwrap(), -0.001, epsilon = 1e-14);
    }
}
