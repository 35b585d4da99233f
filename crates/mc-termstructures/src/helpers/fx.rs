//! FX forward quoted as spot plus forward points.
//!
//! Covered interest parity ties the forward to the two curves. With spot
//! quoted in domestic units per foreign unit and both legs settling from
//! the spot date `S`:
//!
//! ```text
//! F / spot = (P_f(T) / P_f(S)) / (P_d(T) / P_d(S))
//! ```
//!
//! The foreign curve is a built dependency; the domestic curve is the one
//! being calibrated.

use mc_core::errors::Result;
use mc_core::{Price, Real};
use mc_time::{Date, Period};

use super::conventions::{settlement_date, FxConventions};
use super::PricingContext;
use crate::curve_id::CurveRef;

/// An FX forward quote.
#[derive(Debug, Clone)]
pub struct FxForward {
    spot: Price,
    forward: Price,
    spot_date: Date,
    maturity: Date,
    foreign: CurveRef,
    description: String,
}

impl FxForward {
    /// Forward of `tenor` from the spot date, quoted as `points` over
    /// `spot`.
    pub fn new(
        spot: Price,
        points: Real,
        tenor: Period,
        valuation: Date,
        conventions: &FxConventions,
    ) -> Result<Self> {
        mc_core::configuration!(
            spot.is_finite() && spot > 0.0,
            "FX spot {spot} must be positive"
        );
        mc_core::configuration!(points.is_finite(), "FX points {points} are not finite");
        mc_core::configuration!(
            conventions.foreign != CurveRef::UnderConstruction,
            "the foreign side of an FX forward must be a built curve"
        );
        let forward = spot + points * conventions.points_scale;
        mc_core::configuration!(forward > 0.0, "FX forward {forward} must be positive");
        let calendar = conventions.calendar.as_ref();
        let spot_date = settlement_date(calendar, valuation, conventions.settlement_days)?;
        let maturity = calendar.advance(
            spot_date,
            tenor,
            conventions.convention,
            conventions.end_of_month,
        )?;
        mc_core::configuration!(
            maturity > spot_date,
            "FX forward {tenor} matures on its spot date {spot_date}"
        );
        Ok(Self {
            spot,
            forward,
            spot_date,
            maturity,
            foreign: conventions.foreign,
            description: format!("FX forward {tenor} to {maturity}"),
        })
    }

    /// Spot rate.
    pub fn spot(&self) -> Price {
        self.spot
    }

    /// Quoted outright forward.
    pub fn forward(&self) -> Price {
        self.forward
    }

    /// Spot date.
    pub fn spot_date(&self) -> Date {
        self.spot_date
    }

    /// The maturity.
    pub fn pillar(&self) -> Date {
        self.maturity
    }

    /// Description for reports.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Outright forward implied by the two curves.
    pub fn implied_forward(&self, ctx: &PricingContext<'_>) -> Result<Price> {
        let domestic = ctx.curve();
        let foreign = ctx.resolve(self.foreign)?;
        let foreign_growth =
            foreign.discount(self.maturity)? / foreign.discount(self.spot_date)?;
        let domestic_growth =
            domestic.discount(self.maturity)? / domestic.discount(self.spot_date)?;
        Ok(self.spot * foreign_growth / domestic_growth)
    }

    /// Implied forward over quoted forward, minus one.
    pub fn residual(&self, ctx: &PricingContext<'_>) -> Result<Real> {
        Ok(self.implied_forward(ctx)? / self.forward - 1.0)
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
    use mc_time::{BusinessDayConvention, Mexico, TimeUnit};

    use crate::curve_id::{BuiltCurves, CurveId};
    use crate::piecewise_curve::{CurveConfig, Interpolation, PiecewiseCurve};
    use crate::yield_curve::YieldCurve;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn flat_curve(valuation: Date, rate: Real) -> PiecewiseCurve {
        let config = CurveConfig::new("flat", Interpolation::LogLinear).with_extrapolation(true);
        let end = date(2030, 1, 3);
        let t = (end - valuation) as Real / 360.0;
        PiecewiseCurve::from_nodes(&config, valuation, &[(end, (-rate * t).exp())]).unwrap()
    }

    fn conventions() -> FxConventions {
        FxConventions {
            settlement_days: 0,
            calendar: Arc::new(Mexico),
            convention: BusinessDayConvention::Following,
            end_of_month: false,
            points_scale: 1e-4,
            foreign: CurveRef::Built(CurveId::Collateral),
        }
    }

    #[test]
    fn points_are_scaled_onto_spot() {
        let valuation = date(2025, 2, 19);
        let fx = FxForward::new(20.44245, 877.0, Period::new(1, TimeUnit::Months), valuation, &conventions())
            .unwrap();
        assert_abs_diff_eq!(fx.forward(), 20.44245 + 0.0877, epsilon = 1e-12);
        assert_eq!(fx.spot_date(), valuation);
        assert_eq!(fx.pillar(), date(2025, 3, 19));

        let one_day = FxForward::new(20.44245, 30.0, Period::new(1, TimeUnit::Days), valuation, &conventions())
            .unwrap();
        assert_eq!(one_day.pillar(), date(2025, 2, 20));
    }

    #[test]
    fn parity_holds_on_consistent_curves() {
        let valuation = date(2025, 2, 19);
        let (r_d, r_f) = (0.095, 0.043);
        let domestic = flat_curve(valuation, r_d);
        let mut built = BuiltCurves::new();
        built.insert(CurveId::Collateral, Arc::new(flat_curve(valuation, r_f)));
        let maturity = date(2025, 8, 19);
        let t = (maturity - valuation) as Real / 360.0;
        let spot = 20.44245;
        let fair_points = spot * (((r_d - r_f) * t).exp() - 1.0) * 1e4;
        let fx = FxForward::new(spot, fair_points, Period::new(6, TimeUnit::Months), valuation, &conventions())
            .unwrap();
        assert_eq!(fx.pillar(), maturity);
        let ctx = PricingContext::new("domestic-discount", &domestic, &built);
        assert_abs_diff_eq!(fx.residual(&ctx).unwrap(), 0.0, epsilon = 1e-12);
        assert!(domestic.discount(maturity).unwrap() < 1.0);
    }

    #[test]
    fn foreign_side_must_be_built() {
        let mut c = conventions();
        c.foreign = CurveRef::UnderConstruction;
        let err = FxForward::new(20.0, 1.0, Period::new(1, TimeUnit::Weeks), date(2025, 2, 19), &c)
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
