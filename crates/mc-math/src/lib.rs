//! # mc-math
//!
//! Interpolation schemes and the bracketing root finder the bootstrapper
//! drives.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// 1D interpolation schemes.
pub mod interpolations;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use interpolations::{
    natural_cubic::NaturalCubicSpline, Interpolation1D, LinearInterpolation,
};
pub use solvers1d::{brent, expand_bracket, Root};
