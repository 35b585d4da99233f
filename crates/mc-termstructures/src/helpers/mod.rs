//! Instrument helpers: one market quote's constraint on a curve.
//!
//! Each helper resolves its dates once, at construction, and afterwards is
//! plain data. Given a [`PricingContext`] (the trial curve plus the curves
//! already built) it returns a signed residual that the bootstrapper drives
//! to zero:
//!
//! | helper | residual |
//! |---|---|
//! | [`ZeroDeposit`] | implied simple rate − quoted rate |
//! | [`ParSwap`], [`OvernightIndexedSwap`] | fair rate − quoted rate |
//! | [`OvernightIndexFuture`], [`ImmFuture`] | implied rate − (100 − price)/100 |
//! | [`FxForward`] | implied forward / quoted forward − 1 |
//! | [`CrossCurrencyBasisSwap`] | fair domestic fixed rate − quoted rate |

use mc_core::errors::Result;
use mc_core::{DiscountFactor, Real, Spread, Time};
use mc_indexes::{OvernightIndex, OvernightStep};
use mc_time::{
    BusinessDayConvention, Calendar, Date, DateGeneration, DayCounter, Frequency, Period,
    ScheduleBuilder,
};

use crate::curve_id::{BuiltCurves, CurveId, CurveRef};
use crate::piecewise_curve::PiecewiseCurve;
use crate::yield_curve::YieldCurve;

/// Market conventions for each instrument family.
pub mod conventions;

/// Money-market deposits.
pub mod deposit;

/// FX forwards.
pub mod fx;

/// Overnight-index and IMM futures.
pub mod futures;

/// Par, overnight-indexed and cross-currency basis swaps.
pub mod swaps;

pub use conventions::{
    BasisSwapConventions, DepositConventions, FuturesConventions, FxConventions, OisConventions,
    SwapConventions,
};
pub use deposit::ZeroDeposit;
pub use futures::{ImmFuture, OvernightIndexFuture};
pub use fx::FxForward;
pub use swaps::{CrossCurrencyBasisSwap, OvernightIndexedSwap, ParSwap};

// ── Pricing context ───────────────────────────────────────────────────────────

/// What a helper prices against: the curve being calibrated (usually a
/// trial view) and the finished dependency curves.
#[derive(Debug, Clone, Copy)]
pub struct PricingContext<'a> {
    curve_name: &'a str,
    curve: &'a dyn YieldCurve,
    built: &'a BuiltCurves,
}

impl<'a> PricingContext<'a> {
    /// Price against `curve`, named `curve_name`, with `built` dependencies.
    pub fn new(curve_name: &'a str, curve: &'a dyn YieldCurve, built: &'a BuiltCurves) -> Self {
        Self {
            curve_name,
            curve,
            built,
        }
    }

    /// The curve under construction.
    pub fn curve(&self) -> &'a dyn YieldCurve {
        self.curve
    }

    /// Valuation date of the curve under construction.
    pub fn valuation_date(&self) -> Date {
        self.curve.valuation_date()
    }

    /// The curve a reference points at.
    ///
    /// # Errors
    /// `MissingDependency` if a built curve is referenced but absent.
    pub fn resolve(&self, reference: CurveRef) -> Result<&'a dyn YieldCurve> {
        match reference {
            CurveRef::UnderConstruction => Ok(self.curve),
            CurveRef::Built(id) => {
                let curve: &'a PiecewiseCurve = self.built.require(self.curve_name, id)?;
                Ok(curve)
            }
        }
    }
}

// ── Shared pieces ─────────────────────────────────────────────────────────────

/// One accrual period of a swap leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coupon {
    /// Accrual start.
    pub start: Date,
    /// Accrual end.
    pub end: Date,
    /// Payment date.
    pub payment: Date,
    /// Accrual year fraction.
    pub tau: Time,
}

/// A coupon compounding an overnight index.
#[derive(Debug, Clone, PartialEq)]
pub struct OvernightCoupon {
    /// Dates and fixed-leg accrual of the period.
    pub coupon: Coupon,
    /// Daily compounding steps.
    pub steps: Vec<OvernightStep>,
}

/// A leg's accrual periods: `start` rolled by `tenor` in `frequency` steps,
/// each paid `payment_lag` business days after its end.
#[allow(clippy::too_many_arguments)]
pub(crate) fn leg_coupons(
    calendar: &dyn Calendar,
    start: Date,
    tenor: Period,
    frequency: Frequency,
    convention: BusinessDayConvention,
    end_of_month: bool,
    payment_lag: u32,
    day_counter: &dyn DayCounter,
) -> Result<Vec<Coupon>> {
    let maturity = start.advance(tenor.length, tenor.unit)?;
    let builder = if frequency == Frequency::Once {
        ScheduleBuilder::new(start, maturity, tenor, calendar).with_rule(DateGeneration::Zero)
    } else {
        ScheduleBuilder::new(start, maturity, Period::from_frequency(frequency)?, calendar)
    };
    let schedule = builder
        .with_convention(convention)
        .with_termination_convention(convention)
        .end_of_month(end_of_month)
        .build()?;
    schedule
        .periods()
        .map(|(s, e)| {
            Ok(Coupon {
                start: s,
                end: e,
                payment: calendar.advance_business_days(e, payment_lag as i32)?,
                tau: day_counter.year_fraction(s, e),
            })
        })
        .collect()
}

/// Attach the daily steps of `index` to each coupon.
pub(crate) fn overnight_coupons(
    index: &OvernightIndex,
    coupons: Vec<Coupon>,
) -> Result<Vec<OvernightCoupon>> {
    coupons
        .into_iter()
        .map(|coupon| {
            Ok(OvernightCoupon {
                steps: index.accrual_steps(coupon.start, coupon.end)?,
                coupon,
            })
        })
        .collect()
}

/// Growth factor `Π (1 + (r_i + spread) τ_i)` over `steps`.
///
/// Fixings before the valuation date come from the index's series and must
/// be present; the valuation-date fixing is used when published. Every
/// later rate is forecast from `forecast` over its accrual span, which for
/// a zero spread telescopes to a single discount-factor ratio.
pub(crate) fn compounded_growth(
    index: &OvernightIndex,
    steps: &[OvernightStep],
    spread: Spread,
    forecast: &dyn YieldCurve,
) -> Result<Real> {
    let valuation = forecast.valuation_date();
    let mut growth = 1.0;
    let mut known = 0;
    for step in steps {
        let rate = if step.fixing_date < valuation {
            index.past_fixing(step.fixing_date)?
        } else if step.fixing_date == valuation {
            match index.fixings().get(valuation) {
                Some(rate) => rate,
                None => break,
            }
        } else {
            break;
        };
        growth *= 1.0 + (rate + spread) * step.tau;
        known += 1;
    }
    let rest = &steps[known..];
    let (Some(first), Some(last)) = (rest.first(), rest.last()) else {
        return Ok(growth);
    };
    if spread == 0.0 {
        let ratio = forecast.discount(first.accrual_start)? / forecast.discount(last.accrual_end)?;
        return Ok(growth * ratio);
    }
    let mut df_start = forecast.discount(first.accrual_start)?;
    for step in rest {
        let df_end = forecast.discount(step.accrual_end)?;
        growth *= df_start / df_end + spread * step.tau;
        df_start = df_end;
    }
    Ok(growth)
}

// ── InstrumentHelper ──────────────────────────────────────────────────────────

/// Any instrument that can calibrate a pillar.
#[derive(Debug, Clone)]
pub enum InstrumentHelper {
    /// Money-market deposit.
    ZeroDeposit(ZeroDeposit),
    /// Fixed against a term rate.
    ParSwap(ParSwap),
    /// Fixed against a compounded overnight rate.
    OvernightIndexedSwap(OvernightIndexedSwap),
    /// Future on a month of compounded overnight rates.
    OvernightIndexFuture(OvernightIndexFuture),
    /// Three-month future starting on an IMM date.
    ImmFuture(ImmFuture),
    /// FX forward priced by covered interest parity.
    FxForward(FxForward),
    /// Domestic fixed against foreign overnight plus basis.
    CrossCurrencyBasisSwap(CrossCurrencyBasisSwap),
}

macro_rules! dispatch {
    ($self:expr, $h:ident => $body:expr) => {
        match $self {
            InstrumentHelper::ZeroDeposit($h) => $body,
            InstrumentHelper::ParSwap($h) => $body,
            InstrumentHelper::OvernightIndexedSwap($h) => $body,
            InstrumentHelper::OvernightIndexFuture($h) => $body,
            InstrumentHelper::ImmFuture($h) => $body,
            InstrumentHelper::FxForward($h) => $body,
            InstrumentHelper::CrossCurrencyBasisSwap($h) => $body,
        }
    };
}

impl InstrumentHelper {
    /// The latest date the helper reads from the curve it calibrates.
    pub fn pillar(&self) -> Date {
        dispatch!(self, h => h.pillar())
    }

    /// Human-readable description, used in errors and reports.
    pub fn description(&self) -> &str {
        dispatch!(self, h => h.description())
    }

    /// Signed pricing gap against `ctx`.
    pub fn residual(&self, ctx: &PricingContext<'_>) -> Result<Real> {
        dispatch!(self, h => h.residual(ctx))
    }

    /// Pillar discount factor when it follows from the quote alone.
    pub fn closed_form(&self, valuation: Date) -> Option<DiscountFactor> {
        match self {
            InstrumentHelper::ZeroDeposit(h) => h.closed_form(valuation),
            _ => None,
        }
    }

    /// Finished curves the helper prices against.
    pub fn dependencies(&self) -> Vec<CurveId> {
        let refs: Vec<CurveRef> = dispatch!(self, h => h.curve_refs());
        let mut ids: Vec<CurveId> = refs.into_iter().filter_map(CurveRef::dependency).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

macro_rules! impl_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for InstrumentHelper {
                fn from(h: $variant) -> Self {
                    InstrumentHelper::$variant(h)
                }
            }
        )*
    };
}

impl_from!(
    ZeroDeposit,
    ParSwap,
    OvernightIndexedSwap,
    OvernightIndexFuture,
    ImmFuture,
    FxForward,
    CrossCurrencyBasisSwap
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piecewise_curve::{CurveConfig, Interpolation};
    use approx::assert_abs_diff_eq;
    use mc_indexes::FixingSeries;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    /// Flat continuously compounded curve on Act/360.
    fn flat_curve(valuation: Date, rate: Real) -> PiecewiseCurve {
        let config = CurveConfig::new("flat", Interpolation::LogLinear).with_extrapolation(true);
        let end = date(2060, 1, 3);
        let t = (end - valuation) as Real / 360.0;
        PiecewiseCurve::from_nodes(&config, valuation, &[(end, (-rate * t).exp())]).unwrap()
    }

    fn flat_fixings(from: Date, to: Date, rate: Real) -> FixingSeries {
        let index = OvernightIndex::f_tiie();
        let days = index.calendar().business_days(from, to).unwrap();
        FixingSeries::from_pairs("F-TIIE", days.into_iter().map(|d| (d, rate))).unwrap()
    }

    #[test]
    fn flat_fixings_and_flat_forecast_compound_to_the_flat_rate() {
        let valuation = date(2025, 2, 19);
        let r: f64 = 0.095;
        // Daily simple rate whose compounding matches a continuous rate c
        // over one day: the curve's one-day forward.
        let c = 360.0 * (1.0 + r / 360.0).ln();
        let curve = flat_curve(valuation, c);
        let index = OvernightIndex::f_tiie()
            .with_fixings(flat_fixings(date(2025, 1, 2), valuation, r));
        let (start, end) = (date(2025, 2, 1), date(2025, 3, 1));
        let steps = index.accrual_steps(start, end).unwrap();
        let growth = compounded_growth(&index, &steps, 0.0, &curve).unwrap();
        let tau = 28.0 / 360.0;
        let average = (growth - 1.0) / tau;
        // Simple daily accrual never beats continuous compounding at r.
        let ceiling = ((r * tau).exp() - 1.0) / tau;
        assert!(average >= r - 1e-12, "average {average} below {r}");
        assert!(average <= ceiling + 1e-12, "average {average} above {ceiling}");
    }

    #[test]
    fn missing_past_fixing_is_reported() {
        let valuation = date(2025, 2, 19);
        let curve = flat_curve(valuation, 0.09);
        let index = OvernightIndex::f_tiie()
            .with_fixings(flat_fixings(date(2025, 2, 10), valuation, 0.095));
        let steps = index.accrual_steps(date(2025, 2, 1), date(2025, 3, 1)).unwrap();
        let err = compounded_growth(&index, &steps, 0.0, &curve).unwrap_err();
        assert_eq!(
            err,
            mc_core::Error::MissingFixing {
                index: "F-TIIE".into(),
                date: "2025-01-31".into(),
            }
        );
    }

    #[test]
    fn forecast_telescopes_without_spread() {
        let valuation = date(2025, 2, 19);
        let curve = flat_curve(valuation, 0.04);
        let index = OvernightIndex::sofr();
        let steps = index.accrual_steps(date(2025, 2, 21), date(2025, 8, 21)).unwrap();
        let telescoped = compounded_growth(&index, &steps, 0.0, &curve).unwrap();
        let stepwise: Real = steps
            .iter()
            .map(|s| curve.discount(s.accrual_start).unwrap() / curve.discount(s.accrual_end).unwrap())
            .product();
        assert_abs_diff_eq!(telescoped, stepwise, epsilon = 1e-13);
        let with_spread = compounded_growth(&index, &steps, 0.001, &curve).unwrap();
        assert!(with_spread > telescoped);
    }

    #[test]
    fn leg_coupons_roll_every_28_days() {
        let calendar = mc_time::Mexico;
        let coupons = leg_coupons(
            &calendar,
            date(2025, 2, 20),
            Period::new(12, mc_time::TimeUnit::Weeks),
            Frequency::EveryFourthWeek,
            BusinessDayConvention::Following,
            false,
            0,
            &mc_time::Actual360,
        )
        .unwrap();
        assert_eq!(coupons.len(), 3);
        assert_eq!(coupons[0].end, date(2025, 3, 20));
        assert_abs_diff_eq!(coupons[0].tau, 28.0 / 360.0);
        // 17 April is Holy Thursday and 18 April Good Friday.
        assert_eq!(coupons[1].end, date(2025, 4, 21));
        assert_eq!(coupons[2].end, date(2025, 5, 15));
        assert_eq!(coupons[2].payment, coupons[2].end);
    }
}
