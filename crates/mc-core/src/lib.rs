//! # mc-core
//!
//! Core types and error definitions for the multicurve workspace.
//!
//! This crate provides the building blocks shared by every other crate:
//! numeric type aliases, the compounding convention and the error
//! taxonomy used by the calendar, maths and curve-construction layers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Compounding conventions.
pub mod compounding;

/// Error types and the `ensure!` / `fail!` / `configuration!` macros.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the workspace.
pub type Real = f64;

/// Integer type used for signed day and period counts.
pub type Integer = i32;

/// Non-negative integer type (settlement lags, period counts).
pub type Natural = u32;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A spread over a reference rate, as a decimal.
pub type Spread = Real;

/// A discount factor in (0, 1] for dates after the valuation date.
pub type DiscountFactor = Real;

/// A price or value.
pub type Price = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use compounding::Compounding;
pub use errors::{Error, Result};
