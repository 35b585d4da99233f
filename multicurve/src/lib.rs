//! # multicurve
//!
//! Piecewise bootstrapping of interdependent discount curves: a USD SOFR
//! collateral curve, the USD-collateralised MXN discount curve implied by
//! FX forwards and cross-currency basis swaps, and the TIIE 28-day and
//! F-TIIE overnight projection curves discounted on it.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `mc-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! multicurve = "0.1"
//! ```
//!
//! ```rust
//! use multicurve::termstructures::{build_market, BootstrapConfig, CurveId, MarketQuotes, YieldCurve};
//!
//! let quotes = MarketQuotes::february_19_2025()?;
//! let market = build_market(&quotes, BootstrapConfig::default())?;
//! let sofr = market.get(CurveId::Collateral).expect("built");
//! let df = sofr.discount(quotes.valuation)?;
//! assert!((df - 1.0).abs() < 1e-15);
//! # Ok::<(), multicurve::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use mc_core as core;

/// Dates, calendars, day counters, schedules, IMM dates and tenor codes.
pub use mc_time as time;

/// Interpolation and 1-D root finding.
pub use mc_math as math;

/// Overnight indexes and their fixings.
pub use mc_indexes as indexes;

/// Piecewise curves, instrument helpers, the bootstrapper and the market
/// recipes.
pub use mc_termstructures as termstructures;
