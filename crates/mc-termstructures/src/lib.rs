//! # mc-termstructures
//!
//! Piecewise discount curves and everything needed to bootstrap them:
//! instrument helpers, the per-curve bootstrapper, the dependency-ordered
//! curve set and the recipes of a USD-collateralised MXN market.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `YieldCurve` — discount, zero-rate and forward-rate queries.
pub mod yield_curve;

/// `PiecewiseCurve` and its provisional state while bootstrapping.
pub mod piecewise_curve;

/// `CurveId`, the dependency graph and the store of finished curves.
pub mod curve_id;

/// Instrument helpers: deposits, futures, FX forwards and swaps.
pub mod helpers;

/// `Bootstrapper` — per-curve pillar solving.
pub mod bootstrap;

/// `CurveSet` — dependency-ordered, tier-parallel curve building.
pub mod orchestrator;

/// Market quotes, conventions and curve recipes.
pub mod recipes;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use bootstrap::{BootstrapConfig, BootstrapReport, Bootstrapper};
pub use curve_id::{BuiltCurves, CurveId, CurveRef};
pub use helpers::{
    BasisSwapConventions, CrossCurrencyBasisSwap, DepositConventions, FuturesConventions,
    FxConventions, FxForward, ImmFuture, InstrumentHelper, OisConventions, OvernightIndexFuture,
    OvernightIndexedSwap, ParSwap, PricingContext, SwapConventions, ZeroDeposit,
};
pub use orchestrator::{CurveRecipe, CurveSet};
pub use piecewise_curve::{CurveConfig, Interpolation, PiecewiseCurve, ProvisionalCurve, TrialCurve};
pub use recipes::{build_market, MarketQuotes};
pub use yield_curve::YieldCurve;
