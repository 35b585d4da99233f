//! `Bootstrapper` — solves a curve's pillars from its instrument helpers.
//!
//! Each pillar's unknown is its log discount factor `x = ln P(T)`. The
//! forward pass walks the pillars in order, solving each with every earlier
//! pillar committed: Brent's method on a bracket seeded from the previous
//! pillar's zero rate and widened if needed. Pillars whose discount factor
//! follows from the quote alone are committed without solving.
//!
//! Under a local interpolation the forward pass is exact: later pillars do
//! not move earlier segments. Under a non-local one (the natural log-cubic
//! spline) every later node bends the whole curve, so Gauss–Seidel passes
//! re-solve each pillar against the current values of all the others until
//! the largest node move falls below `pass_tolerance`.

use mc_core::errors::{Error, Result};
use mc_core::{Rate, Real, Size};
use mc_math::{brent, expand_bracket, Root};
use mc_time::Date;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::curve_id::BuiltCurves;
use crate::helpers::{InstrumentHelper, PricingContext};
use crate::piecewise_curve::{CurveConfig, PiecewiseCurve, ProvisionalCurve};

/// Zero rate the first pillar's bracket is centred on.
const FIRST_GUESS: Rate = 0.05;

/// Half-width, in zero rate, of the forward-pass bracket.
const FORWARD_HALF_WIDTH: Rate = 0.01;

/// Half-width, in zero rate, of the refinement bracket.
const REFINE_HALF_WIDTH: Rate = 1.0e-4;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Solver settings shared by every curve of a build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Largest acceptable residual, in the helper's residual units.
    pub accuracy: Real,
    /// Objective evaluations allowed per pillar solve, bracketing included.
    pub max_iterations: Size,
    /// Refinement passes allowed under non-local interpolation.
    pub max_passes: Size,
    /// Largest log-discount move that ends the refinement.
    pub pass_tolerance: Real,
    /// Lowest continuously compounded zero rate searched.
    pub min_rate: Rate,
    /// Highest continuously compounded zero rate searched.
    pub max_rate: Rate,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            accuracy: 1.0e-12,
            max_iterations: 100,
            max_passes: 50,
            pass_tolerance: 1.0e-12,
            min_rate: -0.5,
            max_rate: 1.0,
        }
    }
}

impl BootstrapConfig {
    /// Reject settings no solve could honour.
    pub fn validate(&self) -> Result<()> {
        mc_core::configuration!(
            self.accuracy > 0.0 && self.accuracy <= 1.0e-10,
            "accuracy {} must lie in (0, 1e-10]",
            self.accuracy
        );
        mc_core::configuration!(
            self.max_iterations >= 3,
            "max_iterations {} leaves no room to solve",
            self.max_iterations
        );
        mc_core::configuration!(self.max_passes >= 1, "max_passes must be at least 1");
        mc_core::configuration!(
            self.pass_tolerance > 0.0 && self.pass_tolerance.is_finite(),
            "pass_tolerance {} must be positive",
            self.pass_tolerance
        );
        mc_core::configuration!(
            self.min_rate.is_finite() && self.max_rate.is_finite() && self.min_rate < self.max_rate,
            "rate range [{}, {}] is empty",
            self.min_rate,
            self.max_rate
        );
        Ok(())
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// How a curve converged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapReport {
    /// Curve name.
    pub curve: String,
    /// Passes run: one forward pass plus any refinement passes.
    pub passes: Size,
    /// Each helper's residual repriced on the finished curve.
    pub residuals: Vec<(String, Real)>,
    /// Largest absolute residual.
    pub max_residual: Real,
    /// Objective evaluations spent over all solves.
    pub evaluations: Size,
}

// ── Bootstrapper ──────────────────────────────────────────────────────────────

struct Solved {
    log_df: Real,
    evaluations: Size,
}

/// Builds [`PiecewiseCurve`]s from instrument helpers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bootstrapper {
    config: BootstrapConfig,
}

impl Bootstrapper {
    /// A bootstrapper with the given solver settings.
    pub fn new(config: BootstrapConfig) -> Self {
        Self { config }
    }

    /// Solver settings.
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Calibrate a curve so that every helper reprices.
    ///
    /// `helpers` must be ordered by strictly increasing pillar; `built`
    /// holds the finished curves the helpers price against.
    ///
    /// # Errors
    /// * `Configuration` for invalid settings, no helpers or pillars that do
    ///   not strictly increase, all before any solving;
    /// * `MissingDependency` when a helper needs a curve `built` lacks;
    /// * `Convergence` when a pillar or the refinement runs out of budget;
    /// * `MissingFixing` / `OutOfRange` raised while pricing a helper.
    pub fn bootstrap(
        &self,
        config: &CurveConfig,
        valuation: Date,
        helpers: &[InstrumentHelper],
        built: &BuiltCurves,
    ) -> Result<(PiecewiseCurve, BootstrapReport)> {
        self.config.validate()?;
        let name = config.name.as_str();
        mc_core::configuration!(!helpers.is_empty(), "{name}: no instruments to bootstrap");
        for helper in helpers {
            for id in helper.dependencies() {
                built.require(name, id)?;
            }
        }
        for w in helpers.windows(2) {
            mc_core::configuration!(
                w[1].pillar() > w[0].pillar(),
                "{name}: {} (pillar {}) does not follow {} (pillar {})",
                w[1].description(),
                w[1].pillar(),
                w[0].description(),
                w[0].pillar()
            );
        }
        let pillars: Vec<Date> = helpers.iter().map(InstrumentHelper::pillar).collect();
        let mut curve = ProvisionalCurve::new(config, valuation, &pillars)?;
        let mut evaluations = 0;

        // Forward pass.
        for (i, helper) in helpers.iter().enumerate() {
            if let Some(df) = helper.closed_form(valuation) {
                curve.commit(i, df)?;
                debug!(curve = name, pillar = %curve.pillar(i), df, "closed-form pillar");
                continue;
            }
            let guess = if i == 0 {
                FIRST_GUESS
            } else {
                -curve.log_discount(i - 1) / curve.pillar_time(i - 1)
            };
            let solved = self.solve(&curve, i, helper, guess, FORWARD_HALF_WIDTH, built)?;
            evaluations += solved.evaluations;
            curve.commit_log(i, solved.log_df)?;
            debug!(
                curve = name,
                pillar = %curve.pillar(i),
                df = solved.log_df.exp(),
                evaluations = solved.evaluations,
                "pillar converged"
            );
        }

        let mut passes = 1;
        if !config.interpolation.is_local() {
            let (refinement, spent) = self.refine(&mut curve, helpers, built)?;
            passes += refinement;
            evaluations += spent;
        }

        let finished = curve.finish()?;
        let mut residuals = Vec::with_capacity(helpers.len());
        for helper in helpers {
            let ctx = PricingContext::new(name, &finished, built);
            residuals.push((helper.description().to_string(), helper.residual(&ctx)?));
        }
        let max_residual = residuals.iter().map(|(_, r)| r.abs()).fold(0.0, Real::max);
        info!(
            curve = name,
            nodes = finished.pillars().len(),
            passes,
            max_residual,
            "curve committed"
        );
        let report = BootstrapReport {
            curve: name.to_string(),
            passes,
            residuals,
            max_residual,
            evaluations,
        };
        Ok((finished, report))
    }

    /// Gauss–Seidel passes over every solved pillar. Returns the number of
    /// passes run and the evaluations spent.
    fn refine(
        &self,
        curve: &mut ProvisionalCurve,
        helpers: &[InstrumentHelper],
        built: &BuiltCurves,
    ) -> Result<(Size, Size)> {
        let valuation = curve.valuation_date();
        let name = curve.name().to_string();
        let mut evaluations = 0;
        let mut last_move = 0.0;
        for pass in 1..=self.config.max_passes {
            let mut max_move: Real = 0.0;
            for (i, helper) in helpers.iter().enumerate() {
                if helper.closed_form(valuation).is_some() {
                    continue;
                }
                let current = curve.log_discount(i);
                let trial = curve.trial(i, current)?;
                let residual = helper.residual(&PricingContext::new(&name, &trial, built))?;
                evaluations += 1;
                if residual.abs() <= self.config.accuracy {
                    continue;
                }
                let rate = -current / curve.pillar_time(i);
                let solved = self.solve(curve, i, helper, rate, REFINE_HALF_WIDTH, built)?;
                evaluations += solved.evaluations;
                max_move = max_move.max((solved.log_df - current).abs());
                curve.commit_log(i, solved.log_df)?;
            }
            debug!(curve = %name, pass, max_move, "refinement pass");
            if max_move <= self.config.pass_tolerance {
                return Ok((pass, evaluations));
            }
            last_move = max_move;
        }
        Err(Error::Convergence {
            instrument: format!("global refinement of {name}"),
            iterations: self.config.max_passes,
            residual: last_move,
        })
    }

    /// Solve pillar `i` on a bracket of `guess ± half_width` in zero rate.
    fn solve(
        &self,
        curve: &ProvisionalCurve,
        i: usize,
        helper: &InstrumentHelper,
        guess: Rate,
        half_width: Rate,
        built: &BuiltCurves,
    ) -> Result<Solved> {
        let t = curve.pillar_time(i);
        let name = curve.name();
        let cfg = &self.config;
        let (floor, cap) = (-cfg.max_rate * t, -cfg.min_rate * t);
        let guess = guess.clamp(cfg.min_rate, cfg.max_rate);
        let lower = (-(guess + half_width) * t).max(floor);
        let upper = (-(guess - half_width) * t).min(cap);

        let mut evaluations = 0;
        let mut last_residual = Real::NAN;
        let mut objective = |x: Real| -> Result<Real> {
            evaluations += 1;
            let trial = curve.trial(i, x)?;
            let residual = helper.residual(&PricingContext::new(name, &trial, built))?;
            if !residual.is_finite() {
                mc_core::fail!(
                    "{}: non-finite residual at discount factor {}",
                    helper.description(),
                    x.exp()
                );
            }
            last_residual = residual;
            Ok(residual)
        };

        let outcome = expand_bracket(&mut objective, lower, upper, floor, cap, cfg.max_iterations)
            .and_then(|bracket| {
                if bracket.evaluations > 2 {
                    warn!(
                        curve = name,
                        instrument = helper.description(),
                        evaluations = bracket.evaluations,
                        lower = bracket.lower,
                        upper = bracket.upper,
                        "bracket had to be widened"
                    );
                }
                brent(&mut objective, bracket, cfg.accuracy, cfg.max_iterations)
            });
        match outcome {
            Ok(root) => accept(root, cfg.accuracy, helper.description()),
            Err(Error::MaxIterations { .. } | Error::NoBracket { .. }) => {
                Err(Error::Convergence {
                    instrument: helper.description().to_string(),
                    iterations: evaluations,
                    residual: last_residual,
                })
            }
            Err(e) => Err(e),
        }
    }
}

/// Brent also stops on a collapsed bracket; across a jump in the residual
/// that leaves `|fx|` above the accuracy.
fn accept(root: Root, accuracy: Real, instrument: &str) -> Result<Solved> {
    if root.fx.abs() > accuracy {
        return Err(Error::Convergence {
            instrument: instrument.to_string(),
            iterations: root.evaluations,
            residual: root.fx,
        });
    }
    Ok(Solved {
        log_df: root.x,
        evaluations: root.evaluations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use approx::assert_abs_diff_eq;
    use mc_time::{Actual360, BusinessDayConvention, Mexico, Period, TimeUnit};

    use crate::curve_id::{CurveId, CurveRef};
    use crate::helpers::{DepositConventions, SwapConventions, ZeroDeposit, ParSwap};
    use crate::piecewise_curve::Interpolation;
    use crate::yield_curve::YieldCurve;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn deposits(valuation: Date, quotes: &[(Real, i32)]) -> Vec<InstrumentHelper> {
        let conventions = DepositConventions {
            settlement_days: 0,
            calendar: Arc::new(Mexico),
            convention: BusinessDayConvention::Following,
            end_of_month: false,
            day_counter: Arc::new(Actual360),
        };
        quotes
            .iter()
            .map(|&(rate, months)| {
                ZeroDeposit::new(rate, valuation, Period::new(months, TimeUnit::Months), &conventions)
                    .unwrap()
                    .into()
            })
            .collect()
    }

    fn swaps(valuation: Date, quotes: &[(Real, i32)]) -> Vec<InstrumentHelper> {
        let conventions = SwapConventions {
            settlement_days: 1,
            calendar: Arc::new(Mexico),
            convention: BusinessDayConvention::Following,
            fixed_frequency: mc_time::Frequency::EveryFourthWeek,
            fixed_day_counter: Arc::new(Actual360),
            floating_frequency: mc_time::Frequency::EveryFourthWeek,
            floating_day_counter: Arc::new(Actual360),
            discount: CurveRef::UnderConstruction,
            forecast: CurveRef::UnderConstruction,
        };
        quotes
            .iter()
            .map(|&(rate, periods)| {
                ParSwap::new(rate, valuation, Period::new(4 * periods, TimeUnit::Weeks), &conventions)
                    .unwrap()
                    .into()
            })
            .collect()
    }

    #[test]
    fn config_defaults_and_validation() {
        let config = BootstrapConfig::default();
        assert!(config.validate().is_ok());
        let loose = BootstrapConfig {
            accuracy: 1e-6,
            ..config
        };
        assert!(loose.validate().unwrap_err().is_configuration());
        let inverted = BootstrapConfig {
            min_rate: 0.2,
            max_rate: 0.1,
            ..config
        };
        assert!(inverted.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn spot_deposits_are_exact() {
        let valuation = date(2025, 2, 19);
        let helpers = deposits(valuation, &[(0.0976, 1), (0.0965, 3), (0.095, 6)]);
        let config = CurveConfig::new("deposits", Interpolation::LogLinear);
        let (curve, report) = Bootstrapper::default()
            .bootstrap(&config, valuation, &helpers, &BuiltCurves::new())
            .unwrap();
        assert_eq!(report.passes, 1);
        assert_eq!(report.evaluations, 0);
        for helper in &helpers {
            let InstrumentHelper::ZeroDeposit(d) = helper else {
                unreachable!()
            };
            let expected = 1.0 / (1.0 + d.rate() * d.tau());
            assert_eq!(curve.discount(d.maturity()).unwrap(), expected);
        }
        assert!(report.max_residual < 1e-14);
    }

    #[test]
    fn swaps_reprice_on_both_interpolations() {
        let valuation = date(2025, 2, 19);
        let mut helpers = deposits(valuation, &[(0.0976, 1)]);
        helpers.extend(swaps(
            valuation,
            &[(0.0964, 3), (0.0929, 6), (0.0907, 9), (0.0890, 13), (0.0872, 26), (0.0876, 52)],
        ));
        for interpolation in [Interpolation::LogLinear, Interpolation::NaturalLogCubic] {
            let config = CurveConfig::new("tiie", interpolation);
            let (curve, report) = Bootstrapper::default()
                .bootstrap(&config, valuation, &helpers, &BuiltCurves::new())
                .unwrap();
            assert_eq!(curve.pillars().len(), helpers.len());
            assert!(report.max_residual <= 1e-10, "{interpolation:?}: {report:?}");
            if interpolation.is_local() {
                assert_eq!(report.passes, 1);
            } else {
                assert!(report.passes > 1);
            }
            let mut previous = 1.0;
            for (_, df) in curve.nodes() {
                assert!(df <= previous && df > 0.0);
                previous = df;
            }
        }
    }

    #[test]
    fn unordered_pillars_fail_before_solving() {
        let valuation = date(2025, 2, 19);
        let mut helpers = deposits(valuation, &[(0.0976, 3), (0.0965, 1)]);
        let config = CurveConfig::new("bad", Interpolation::LogLinear);
        let err = Bootstrapper::default()
            .bootstrap(&config, valuation, &helpers, &BuiltCurves::new())
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("deposit 1M"));

        helpers.truncate(1);
        helpers.push(helpers[0].clone());
        let err = Bootstrapper::default()
            .bootstrap(&config, valuation, &helpers, &BuiltCurves::new())
            .unwrap_err();
        assert!(err.is_configuration());

        let err = Bootstrapper::default()
            .bootstrap(&config, valuation, &[], &BuiltCurves::new())
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn missing_dependency_is_reported_first() {
        let valuation = date(2025, 2, 19);
        let conventions = SwapConventions {
            settlement_days: 1,
            calendar: Arc::new(Mexico),
            convention: BusinessDayConvention::Following,
            fixed_frequency: mc_time::Frequency::EveryFourthWeek,
            fixed_day_counter: Arc::new(Actual360),
            floating_frequency: mc_time::Frequency::EveryFourthWeek,
            floating_day_counter: Arc::new(Actual360),
            discount: CurveRef::Built(CurveId::DomesticDiscount),
            forecast: CurveRef::UnderConstruction,
        };
        let swap = ParSwap::new(0.09, valuation, Period::new(12, TimeUnit::Weeks), &conventions)
            .unwrap();
        let config = CurveConfig::new("term-index", Interpolation::LogLinear);
        let err = Bootstrapper::default()
            .bootstrap(&config, valuation, &[swap.into()], &BuiltCurves::new())
            .unwrap_err();
        assert_eq!(
            err,
            Error::MissingDependency {
                curve: "term-index".into(),
                dependency: "domestic-discount".into(),
            }
        );
    }

    #[test]
    fn unreachable_quote_is_a_convergence_error() {
        let valuation = date(2025, 2, 19);
        // Beyond the searchable rate range.
        let helpers = swaps(valuation, &[(5.0, 3)]);
        let config = CurveConfig::new("wild", Interpolation::LogLinear);
        let err = Bootstrapper::default()
            .bootstrap(&config, valuation, &helpers, &BuiltCurves::new())
            .unwrap_err();
        let Error::Convergence {
            instrument,
            iterations,
            residual,
        } = err
        else {
            panic!("expected a convergence error, got {err:?}");
        };
        assert!(instrument.starts_with("swap 12W"));
        assert!(iterations >= 2);
        assert!(residual < 0.0);
    }

    #[test]
    fn closed_form_survives_refinement() {
        let valuation = date(2025, 2, 19);
        let mut helpers = deposits(valuation, &[(0.0976, 1)]);
        helpers.extend(swaps(valuation, &[(0.0964, 3), (0.0929, 6), (0.0890, 13)]));
        let config = CurveConfig::new("cubic", Interpolation::NaturalLogCubic);
        let (curve, _) = Bootstrapper::default()
            .bootstrap(&config, valuation, &helpers, &BuiltCurves::new())
            .unwrap();
        let InstrumentHelper::ZeroDeposit(d) = &helpers[0] else {
            unreachable!()
        };
        assert_eq!(
            curve.discount(d.maturity()).unwrap(),
            1.0 / (1.0 + 0.0976 * d.tau())
        );
        assert_abs_diff_eq!(curve.discount(valuation).unwrap(), 1.0);
    }

    #[test]
    fn collapsed_bracket_across_a_jump_is_not_a_root() {
        let mut step = |x: Real| Ok::<_, Error>(if x < 0.1 { -1.0e-3 } else { 1.0e-3 });
        let bracket = expand_bracket(&mut step, -1.0, 1.0, -1.0, 1.0, 10).unwrap();
        let root = brent(&mut step, bracket, 1e-12, 200).unwrap();
        assert_abs_diff_eq!(root.x, 0.1, epsilon = 1e-12);
        let Err(Error::Convergence { instrument, residual, .. }) =
            accept(root, 1e-12, "deposit 1M to 2025-03-21")
        else {
            panic!("a jump must not be accepted");
        };
        assert_eq!(instrument, "deposit 1M to 2025-03-21");
        assert_eq!(residual.abs(), 1.0e-3);

        let smooth = Root { x: -0.01, fx: 5e-13, evaluations: 7 };
        let solved = accept(smooth, 1e-12, "swap").unwrap();
        assert_eq!((solved.log_df, solved.evaluations), (-0.01, 7));
    }
}
