//! Curve identifiers, the fixed dependency graph between them, and the
//! store of curves that are already built.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use mc_core::errors::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::piecewise_curve::PiecewiseCurve;

/// The curves of a collateralised two-currency market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CurveId {
    /// Foreign collateral curve (USD SOFR). Independent.
    Collateral,
    /// Domestic discount curve, collateralised in the foreign currency.
    DomesticDiscount,
    /// Domestic term-rate projection curve (TIIE 28 days).
    TermIndex,
    /// Domestic overnight projection curve (F-TIIE).
    OvernightIndex,
}

impl CurveId {
    /// Every curve, in build order.
    pub const ALL: [CurveId; 4] = [
        CurveId::Collateral,
        CurveId::DomesticDiscount,
        CurveId::TermIndex,
        CurveId::OvernightIndex,
    ];

    /// Curves that must be built before this one.
    pub fn dependencies(self) -> &'static [CurveId] {
        match self {
            CurveId::Collateral => &[],
            CurveId::DomesticDiscount => &[CurveId::Collateral],
            CurveId::TermIndex | CurveId::OvernightIndex => &[CurveId::DomesticDiscount],
        }
    }

    /// Depth in the graph; curves of equal tier never depend on each other.
    pub fn tier(self) -> usize {
        self.dependencies()
            .iter()
            .map(|d| d.tier() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Whether `other` is reachable through this curve's dependencies.
    pub fn depends_on(self, other: CurveId) -> bool {
        self.dependencies()
            .iter()
            .any(|&d| d == other || d.depends_on(other))
    }

    /// Short name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            CurveId::Collateral => "collateral",
            CurveId::DomesticDiscount => "domestic-discount",
            CurveId::TermIndex => "term-index",
            CurveId::OvernightIndex => "overnight-index",
        }
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which curve an instrument reads for discounting or forecasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveRef {
    /// The curve the instrument is calibrating.
    UnderConstruction,
    /// A finished curve handed in as a dependency.
    Built(CurveId),
}

impl CurveRef {
    /// The dependency this reference needs, if any.
    pub fn dependency(self) -> Option<CurveId> {
        match self {
            CurveRef::UnderConstruction => None,
            CurveRef::Built(id) => Some(id),
        }
    }
}

/// Finished curves, shared read-only with the curves that price on them.
#[derive(Debug, Clone, Default)]
pub struct BuiltCurves {
    curves: BTreeMap<CurveId, Arc<PiecewiseCurve>>,
}

impl BuiltCurves {
    /// No curves.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finished curve.
    pub fn insert(&mut self, id: CurveId, curve: Arc<PiecewiseCurve>) {
        self.curves.insert(id, curve);
    }

    /// The curve built under `id`, if any.
    pub fn get(&self, id: CurveId) -> Option<&Arc<PiecewiseCurve>> {
        self.curves.get(&id)
    }

    /// Whether `id` has been built.
    pub fn contains(&self, id: CurveId) -> bool {
        self.curves.contains_key(&id)
    }

    /// The curve built under `id`, or `MissingDependency` naming `curve`
    /// as the one that needed it.
    pub fn require(&self, curve: &str, id: CurveId) -> Result<&Arc<PiecewiseCurve>> {
        self.curves.get(&id).ok_or_else(|| Error::MissingDependency {
            curve: curve.to_string(),
            dependency: id.to_string(),
        })
    }

    /// Number of curves.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether no curve has been built.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Curves in build order.
    pub fn iter(&self) -> impl Iterator<Item = (CurveId, &Arc<PiecewiseCurve>)> + '_ {
        self.curves.iter().map(|(&id, c)| (id, c))
    }
}
