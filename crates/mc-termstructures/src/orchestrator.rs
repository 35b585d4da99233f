//! `CurveSet` — builds the curves of a market in dependency order.
//!
//! Curves are built one tier at a time. A curve may only be built once the
//! curves it depends on are finished, and its helpers may only price
//! against those curves. Curves of one tier never depend on each other and
//! are bootstrapped in parallel.

use std::collections::BTreeMap;
use std::sync::Arc;

use mc_core::errors::{Error, Result};
use mc_time::Date;
use rayon::prelude::*;
use tracing::info;

use crate::bootstrap::{BootstrapConfig, BootstrapReport, Bootstrapper};
use crate::curve_id::{BuiltCurves, CurveId};
use crate::helpers::InstrumentHelper;
use crate::piecewise_curve::{CurveConfig, PiecewiseCurve};

/// What to build for one curve.
#[derive(Debug, Clone)]
pub struct CurveRecipe {
    /// Which curve this is.
    pub id: CurveId,
    /// Interpolation, extrapolation and time axis.
    pub config: CurveConfig,
    /// Helpers ordered by pillar.
    pub helpers: Vec<InstrumentHelper>,
}

impl CurveRecipe {
    /// A recipe for `id`.
    pub fn new(id: CurveId, config: CurveConfig, helpers: Vec<InstrumentHelper>) -> Self {
        Self {
            id,
            config,
            helpers,
        }
    }
}

/// The finished curves of one valuation date.
#[derive(Debug, Clone)]
pub struct CurveSet {
    valuation: Date,
    bootstrapper: Bootstrapper,
    built: BuiltCurves,
    reports: BTreeMap<CurveId, BootstrapReport>,
}

impl CurveSet {
    /// An empty set.
    pub fn new(valuation: Date, config: BootstrapConfig) -> Self {
        Self {
            valuation,
            bootstrapper: Bootstrapper::new(config),
            built: BuiltCurves::new(),
            reports: BTreeMap::new(),
        }
    }

    /// Valuation date shared by every curve.
    pub fn valuation_date(&self) -> Date {
        self.valuation
    }

    /// Finished curves.
    pub fn curves(&self) -> &BuiltCurves {
        &self.built
    }

    /// A finished curve.
    pub fn get(&self, id: CurveId) -> Option<&Arc<PiecewiseCurve>> {
        self.built.get(id)
    }

    /// How a finished curve converged.
    pub fn report(&self, id: CurveId) -> Option<&BootstrapReport> {
        self.reports.get(&id)
    }

    /// Check that `recipe` can be built now.
    fn check(&self, recipe: &CurveRecipe) -> Result<()> {
        let id = recipe.id;
        mc_core::configuration!(!self.built.contains(id), "{id} has already been built");
        for &dependency in id.dependencies() {
            if !self.built.contains(dependency) {
                return Err(Error::MissingDependency {
                    curve: id.to_string(),
                    dependency: dependency.to_string(),
                });
            }
        }
        for helper in &recipe.helpers {
            for used in helper.dependencies() {
                mc_core::configuration!(
                    id.depends_on(used),
                    "{id}: {} prices on {used}, which {id} does not depend on",
                    helper.description()
                );
            }
        }
        Ok(())
    }

    fn store(&mut self, id: CurveId, curve: PiecewiseCurve, report: BootstrapReport) -> Arc<PiecewiseCurve> {
        let curve = Arc::new(curve);
        self.built.insert(id, Arc::clone(&curve));
        self.reports.insert(id, report);
        curve
    }

    /// Build one curve.
    ///
    /// # Errors
    /// `MissingDependency` if a curve `recipe.id` depends on is not built
    /// yet; `Configuration` if the curve already exists or a helper prices
    /// on a curve outside its dependencies; otherwise whatever the
    /// bootstrap raises.
    pub fn build(&mut self, recipe: CurveRecipe) -> Result<Arc<PiecewiseCurve>> {
        self.check(&recipe)?;
        let (curve, report) = self.bootstrapper.bootstrap(
            &recipe.config,
            self.valuation,
            &recipe.helpers,
            &self.built,
        )?;
        info!(curve = %recipe.id, max_residual = report.max_residual, "curve built");
        Ok(self.store(recipe.id, curve, report))
    }

    /// Build mutually independent curves in parallel.
    ///
    /// Nothing is stored unless every curve of the tier succeeds.
    pub fn build_tier(&mut self, recipes: Vec<CurveRecipe>) -> Result<Vec<Arc<PiecewiseCurve>>> {
        for (i, recipe) in recipes.iter().enumerate() {
            self.check(recipe)?;
            for other in &recipes[i + 1..] {
                mc_core::configuration!(
                    recipe.id != other.id,
                    "{} appears twice in one tier",
                    recipe.id
                );
                mc_core::configuration!(
                    !recipe.id.depends_on(other.id) && !other.id.depends_on(recipe.id),
                    "{} and {} cannot share a tier",
                    recipe.id,
                    other.id
                );
            }
        }
        let bootstrapper = self.bootstrapper;
        let valuation = self.valuation;
        let built = &self.built;
        let finished = recipes
            .into_par_iter()
            .map(|recipe| {
                let (curve, report) =
                    bootstrapper.bootstrap(&recipe.config, valuation, &recipe.helpers, built)?;
                Ok((recipe.id, curve, report))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(finished
            .into_iter()
            .map(|(id, curve, report)| {
                info!(curve = %id, max_residual = report.max_residual, "curve built");
                self.store(id, curve, report)
            })
            .collect())
    }
}
