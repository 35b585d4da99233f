//! `PiecewiseCurve` — discount factors on pillar dates, interpolated in
//! log space.
//!
//! The curve stores `(date, discount factor)` nodes, the first of which is
//! the valuation date with a discount factor of exactly one. Between nodes
//! the logarithm of the discount factor is interpolated against the curve's
//! own time axis:
//!
//! * [`Interpolation::LogLinear`] — piecewise-constant forwards, local;
//! * [`Interpolation::NaturalLogCubic`] — a natural cubic spline, smooth
//!   forwards but non-local (moving one node moves every segment).
//!
//! Node dates return the stored factor verbatim, so closed-form pillars
//! survive the log transform exactly.
//!
//! While a curve is being bootstrapped it lives as a [`ProvisionalCurve`]:
//! the pillar dates are fixed up front, nodes are committed one by one, and
//! [`ProvisionalCurve::trial`] hands the solver a read-only [`TrialCurve`]
//! with one node set to a tentative value.

use std::sync::Arc;

use mc_core::errors::{Error, Result};
use mc_core::{DiscountFactor, Real, Time};
use mc_math::{Interpolation1D, LinearInterpolation, NaturalCubicSpline};
use mc_time::{Date, DayCountConvention, DayCounter};
use serde::{Deserialize, Serialize};

use crate::yield_curve::YieldCurve;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Interpolation applied to `ln P(t)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// Linear in log discount factor.
    #[default]
    LogLinear,
    /// Natural cubic spline in log discount factor.
    NaturalLogCubic,
}

impl Interpolation {
    /// Whether a node only affects its two neighbouring segments.
    pub fn is_local(self) -> bool {
        matches!(self, Interpolation::LogLinear)
    }

    fn fit(self, times: &[Time], log_discounts: &[Real]) -> Result<Box<dyn Interpolation1D>> {
        Ok(match self {
            Interpolation::LogLinear => Box::new(LinearInterpolation::new(times, log_discounts)?),
            Interpolation::NaturalLogCubic => {
                Box::new(NaturalCubicSpline::new(times, log_discounts)?)
            }
        })
    }
}

/// Shape of one curve: its name, interpolation, extrapolation flag and the
/// day counter of its time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Name used in logs and errors.
    pub name: String,
    /// Interpolation of log discount factors.
    pub interpolation: Interpolation,
    /// Whether queries past the last node are answered.
    pub extrapolate: bool,
    /// Day counter mapping dates to curve times.
    pub day_count: DayCountConvention,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            name: "curve".into(),
            interpolation: Interpolation::LogLinear,
            extrapolate: false,
            day_count: DayCountConvention::Actual360,
        }
    }
}

impl CurveConfig {
    /// A named curve with the default shape.
    pub fn new(name: impl Into<String>, interpolation: Interpolation) -> Self {
        Self {
            name: name.into(),
            interpolation,
            ..Self::default()
        }
    }

    /// Allow or forbid extrapolation.
    pub fn with_extrapolation(mut self, extrapolate: bool) -> Self {
        self.extrapolate = extrapolate;
        self
    }

    /// Set the day counter of the time axis.
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }
}

// ── Shared node lookup ────────────────────────────────────────────────────────

/// Discount factor on a node set whose first entry is the valuation date.
fn node_discount(
    dates: &[Date],
    discounts: &[DiscountFactor],
    interp: &dyn Interpolation1D,
    day_counter: &dyn DayCounter,
    extrapolate: bool,
    date: Date,
) -> Result<DiscountFactor> {
    let first = dates[0];
    let last = dates[dates.len() - 1];
    if date < first || (date > last && !extrapolate) {
        return Err(Error::OutOfRange {
            date: date.to_string(),
            first: first.to_string(),
            last: last.to_string(),
        });
    }
    if let Ok(i) = dates.binary_search(&date) {
        return Ok(discounts[i]);
    }
    let t = day_counter.year_fraction(first, date);
    Ok(interp.value(t).exp())
}

fn check_pillars(name: &str, valuation: Date, pillars: &[Date]) -> Result<()> {
    mc_core::configuration!(!pillars.is_empty(), "{name}: no pillars");
    mc_core::configuration!(
        pillars[0] > valuation,
        "{name}: pillar {} is not after the valuation date {valuation}",
        pillars[0]
    );
    for w in pillars.windows(2) {
        mc_core::configuration!(
            w[1] > w[0],
            "{name}: pillar {} does not follow pillar {}",
            w[1],
            w[0]
        );
    }
    Ok(())
}

// ── PiecewiseCurve ────────────────────────────────────────────────────────────

/// A finished, immutable discount curve.
#[derive(Debug)]
pub struct PiecewiseCurve {
    config: CurveConfig,
    day_counter: Arc<dyn DayCounter>,
    dates: Vec<Date>,
    times: Vec<Time>,
    discounts: Vec<DiscountFactor>,
    interp: Box<dyn Interpolation1D>,
}

impl PiecewiseCurve {
    /// Build a curve from pillar nodes; the valuation node is added.
    ///
    /// # Errors
    /// `Configuration` if the pillars are not strictly increasing after the
    /// valuation date, or a discount factor is not positive and finite.
    pub fn from_nodes(
        config: &CurveConfig,
        valuation_date: Date,
        nodes: &[(Date, DiscountFactor)],
    ) -> Result<Self> {
        let pillars: Vec<Date> = nodes.iter().map(|&(d, _)| d).collect();
        check_pillars(&config.name, valuation_date, &pillars)?;
        if let Some(&(d, df)) = nodes.iter().find(|&&(_, df)| !(df.is_finite() && df > 0.0)) {
            return Err(Error::Configuration(format!(
                "{}: discount factor {df} at {d} is not positive",
                config.name
            )));
        }
        let day_counter = config.day_count.day_counter();
        let mut dates = Vec::with_capacity(nodes.len() + 1);
        let mut discounts = Vec::with_capacity(nodes.len() + 1);
        dates.push(valuation_date);
        discounts.push(1.0);
        for &(d, df) in nodes {
            dates.push(d);
            discounts.push(df);
        }
        let times: Vec<Time> = dates
            .iter()
            .map(|&d| day_counter.year_fraction(valuation_date, d))
            .collect();
        let logs: Vec<Real> = discounts.iter().map(|df| df.ln()).collect();
        let interp = config.interpolation.fit(&times, &logs)?;
        Ok(Self {
            config: config.clone(),
            day_counter,
            dates,
            times,
            discounts,
            interp,
        })
    }

    /// Curve name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Shape the curve was built with.
    pub fn config(&self) -> &CurveConfig {
        &self.config
    }

    /// Interpolation scheme.
    pub fn interpolation(&self) -> Interpolation {
        self.config.interpolation
    }

    /// Whether queries past the last node are answered.
    pub fn extrapolates(&self) -> bool {
        self.config.extrapolate
    }

    /// Day counter of the time axis.
    pub fn day_counter(&self) -> &dyn DayCounter {
        self.day_counter.as_ref()
    }

    /// `(date, discount factor)` table, valuation node first.
    pub fn nodes(&self) -> Vec<(Date, DiscountFactor)> {
        self.dates.iter().copied().zip(self.discounts.iter().copied()).collect()
    }

    /// Pillar dates (the valuation node excluded).
    pub fn pillars(&self) -> &[Date] {
        &self.dates[1..]
    }

    /// Curve times of every node, valuation node first.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Last node date.
    pub fn max_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }
}

impl YieldCurve for PiecewiseCurve {
    fn valuation_date(&self) -> Date {
        self.dates[0]
    }

    fn discount(&self, date: Date) -> Result<DiscountFactor> {
        node_discount(
            &self.dates,
            &self.discounts,
            self.interp.as_ref(),
            self.day_counter.as_ref(),
            self.config.extrapolate,
            date,
        )
    }
}

// ── ProvisionalCurve ──────────────────────────────────────────────────────────

/// A curve under construction: fixed pillar dates, some of them committed.
#[derive(Debug)]
pub struct ProvisionalCurve {
    config: CurveConfig,
    day_counter: Arc<dyn DayCounter>,
    /// Valuation date followed by every pillar.
    dates: Vec<Date>,
    times: Vec<Time>,
    discounts: Vec<DiscountFactor>,
    log_discounts: Vec<Real>,
    /// Number of committed pillars; they are always a prefix.
    committed: usize,
}

impl ProvisionalCurve {
    /// Start a curve on the given pillars, none of them committed.
    pub fn new(config: &CurveConfig, valuation_date: Date, pillars: &[Date]) -> Result<Self> {
        check_pillars(&config.name, valuation_date, pillars)?;
        let day_counter = config.day_count.day_counter();
        let mut dates = Vec::with_capacity(pillars.len() + 1);
        dates.push(valuation_date);
        dates.extend_from_slice(pillars);
        let times: Vec<Time> = dates
            .iter()
            .map(|&d| day_counter.year_fraction(valuation_date, d))
            .collect();
        if let Some(w) = times.windows(2).find(|w| w[1] <= w[0]) {
            return Err(Error::Configuration(format!(
                "{}: pillar times {} and {} do not increase",
                config.name, w[0], w[1]
            )));
        }
        let n = dates.len();
        Ok(Self {
            config: config.clone(),
            day_counter,
            dates,
            times,
            discounts: vec![1.0; n],
            log_discounts: vec![0.0; n],
            committed: 0,
        })
    }

    /// Curve name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Valuation date.
    pub fn valuation_date(&self) -> Date {
        self.dates[0]
    }

    /// Number of pillars.
    pub fn pillar_count(&self) -> usize {
        self.dates.len() - 1
    }

    /// Number of committed pillars.
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// Date of pillar `i`.
    pub fn pillar(&self, i: usize) -> Date {
        self.dates[i + 1]
    }

    /// Curve time of pillar `i`.
    pub fn pillar_time(&self, i: usize) -> Time {
        self.times[i + 1]
    }

    /// Committed log discount factor of pillar `i`.
    pub fn log_discount(&self, i: usize) -> Real {
        self.log_discounts[i + 1]
    }

    /// A view of the committed nodes with pillar `i` set to `exp(log_df)`.
    ///
    /// `i` is either the next uncommitted pillar (a tail node) or a
    /// committed one being re-solved.
    pub fn trial(&self, i: usize, log_df: Real) -> Result<TrialCurve<'_>> {
        mc_core::ensure!(
            i <= self.committed && i < self.pillar_count(),
            "{}: pillar {i} cannot be trialled with {} committed",
            self.name(),
            self.committed
        );
        mc_core::ensure!(log_df.is_finite(), "{}: non-finite trial value", self.name());
        let len = self.committed.max(i + 1) + 1;
        let mut discounts = self.discounts[..len].to_vec();
        let mut logs = self.log_discounts[..len].to_vec();
        discounts[i + 1] = log_df.exp();
        logs[i + 1] = log_df;
        let interp = self.config.interpolation.fit(&self.times[..len], &logs)?;
        Ok(TrialCurve {
            base: self,
            len,
            discounts,
            interp,
        })
    }

    /// Fix pillar `i` at discount factor `df`.
    pub fn commit(&mut self, i: usize, df: DiscountFactor) -> Result<()> {
        mc_core::ensure!(
            i <= self.committed && i < self.pillar_count(),
            "{}: pillar {i} cannot be committed with {} committed",
            self.name(),
            self.committed
        );
        mc_core::ensure!(
            df.is_finite() && df > 0.0,
            "{}: discount factor {df} at {} is not positive",
            self.name(),
            self.pillar(i)
        );
        self.discounts[i + 1] = df;
        self.log_discounts[i + 1] = df.ln();
        self.committed = self.committed.max(i + 1);
        Ok(())
    }

    /// Fix pillar `i` at `exp(log_df)`, keeping `log_df` as the node value.
    pub fn commit_log(&mut self, i: usize, log_df: Real) -> Result<()> {
        self.commit(i, log_df.exp())?;
        self.log_discounts[i + 1] = log_df;
        Ok(())
    }

    /// Freeze into a [`PiecewiseCurve`] once every pillar is committed.
    pub fn finish(self) -> Result<PiecewiseCurve> {
        mc_core::ensure!(
            self.committed == self.pillar_count(),
            "{}: only {} of {} pillars committed",
            self.name(),
            self.committed,
            self.pillar_count()
        );
        let interp = self.config.interpolation.fit(&self.times, &self.log_discounts)?;
        Ok(PiecewiseCurve {
            config: self.config,
            day_counter: self.day_counter,
            dates: self.dates,
            times: self.times,
            discounts: self.discounts,
            interp,
        })
    }
}

/// Read-only view of a [`ProvisionalCurve`] with one tentative node.
#[derive(Debug)]
pub struct TrialCurve<'a> {
    base: &'a ProvisionalCurve,
    len: usize,
    discounts: Vec<DiscountFactor>,
    interp: Box<dyn Interpolation1D>,
}

impl YieldCurve for TrialCurve<'_> {
    fn valuation_date(&self) -> Date {
        self.base.dates[0]
    }

    fn discount(&self, date: Date) -> Result<DiscountFactor> {
        node_discount(
            &self.base.dates[..self.len],
            &self.discounts,
            self.interp.as_ref(),
            self.base.day_counter.as_ref(),
            self.base.config.extrapolate,
            date,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mc_core::Compounding;
    use mc_time::{Actual360, Frequency};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn flat_nodes(valuation: Date, pillars: &[Date], rate: Real) -> Vec<(Date, DiscountFactor)> {
        pillars
            .iter()
            .map(|&d| (d, (-rate * Actual360.year_fraction(valuation, d)).exp()))
            .collect()
    }

    fn pillars() -> Vec<Date> {
        vec![date(2025, 3, 19), date(2025, 6, 19), date(2025, 12, 19), date(2026, 12, 21)]
    }

    #[test]
    fn valuation_and_node_discounts_are_exact() {
        let valuation = date(2025, 2, 19);
        let nodes = vec![(date(2025, 3, 19), 1.0 / (1.0 + 0.05 * 28.0 / 360.0))];
        let config = CurveConfig::new("test", Interpolation::NaturalLogCubic);
        let curve = PiecewiseCurve::from_nodes(&config, valuation, &nodes).unwrap();
        assert_eq!(curve.discount(valuation).unwrap(), 1.0);
        assert_eq!(curve.discount(nodes[0].0).unwrap(), nodes[0].1);
        assert_eq!(curve.nodes().len(), 2);
        assert_eq!(curve.pillars(), &[nodes[0].0]);
    }

    #[test]
    fn flat_curve_reproduces_its_rate() {
        let valuation = date(2025, 2, 19);
        for interpolation in [Interpolation::LogLinear, Interpolation::NaturalLogCubic] {
            let config = CurveConfig::new("flat", interpolation).with_extrapolation(true);
            let nodes = flat_nodes(valuation, &pillars(), 0.04);
            let curve = PiecewiseCurve::from_nodes(&config, valuation, &nodes).unwrap();
            let z = curve
                .zero_rate(date(2025, 9, 1), &Actual360, Compounding::Continuous, Frequency::Annual)
                .unwrap();
            assert_abs_diff_eq!(z, 0.04, epsilon = 1e-12);
            let f = curve
                .forward_rate(
                    date(2027, 1, 4),
                    date(2027, 4, 5),
                    &Actual360,
                    Compounding::Continuous,
                    Frequency::Annual,
                )
                .unwrap();
            assert_abs_diff_eq!(f, 0.04, epsilon = 1e-10);
        }
    }

    #[test]
    fn out_of_range_queries() {
        let valuation = date(2025, 2, 19);
        let config = CurveConfig::new("closed", Interpolation::LogLinear);
        let curve =
            PiecewiseCurve::from_nodes(&config, valuation, &flat_nodes(valuation, &pillars(), 0.03))
                .unwrap();
        let before = curve.discount(date(2025, 2, 18)).unwrap_err();
        assert!(matches!(before, Error::OutOfRange { .. }));
        let after = curve.discount(date(2027, 1, 4)).unwrap_err();
        assert!(matches!(after, Error::OutOfRange { .. }));
        assert!(curve.discount(curve.max_date()).is_ok());
    }

    #[test]
    fn non_increasing_pillars_rejected() {
        let valuation = date(2025, 2, 19);
        let config = CurveConfig::default();
        let nodes = vec![(date(2025, 6, 19), 0.99), (date(2025, 6, 19), 0.98)];
        let err = PiecewiseCurve::from_nodes(&config, valuation, &nodes).unwrap_err();
        assert!(err.is_configuration());
        let err = ProvisionalCurve::new(&config, valuation, &[valuation]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn trial_does_not_touch_committed_state() {
        let valuation = date(2025, 2, 19);
        let config = CurveConfig::new("p", Interpolation::NaturalLogCubic);
        let mut p = ProvisionalCurve::new(&config, valuation, &pillars()).unwrap();
        p.commit(0, 0.996).unwrap();
        {
            let trial = p.trial(1, -0.02).unwrap();
            assert_abs_diff_eq!(trial.discount(date(2025, 6, 19)).unwrap(), (-0.02f64).exp());
            assert_eq!(trial.discount(date(2025, 3, 19)).unwrap(), 0.996);
            assert!(trial.discount(date(2025, 7, 1)).is_err());
        }
        assert_eq!(p.committed(), 1);
        assert!(p.trial(2, -0.03).is_err());
        assert!(p.finish().is_err());
    }

    #[test]
    fn commit_all_then_finish() {
        let valuation = date(2025, 2, 19);
        let config = CurveConfig::new("p", Interpolation::LogLinear);
        let nodes = flat_nodes(valuation, &pillars(), 0.05);
        let mut p = ProvisionalCurve::new(&config, valuation, &pillars()).unwrap();
        for (i, &(_, df)) in nodes.iter().enumerate() {
            p.commit(i, df).unwrap();
        }
        // Re-solving a committed node keeps the prefix intact.
        p.commit_log(1, nodes[1].1.ln()).unwrap();
        let curve = p.finish().unwrap();
        assert_eq!(curve.pillars(), &pillars()[..]);
        for (&(_, df), &(_, expected)) in curve.nodes()[1..].iter().zip(&nodes) {
            assert_abs_diff_eq!(df, expected, epsilon = 1e-15);
        }
    }

    #[test]
    fn config_serde_defaults() {
        let config: CurveConfig =
            serde_json::from_str(r#"{"name": "DISC", "interpolation": "NaturalLogCubic"}"#)
                .unwrap();
        assert_eq!(config.interpolation, Interpolation::NaturalLogCubic);
        assert!(!config.extrapolate);
        assert_eq!(config.day_count, DayCountConvention::Actual360);
    }
}
