//! Error types for the multicurve workspace.
//!
//! A single `thiserror`-derived enum covers both the low-level failures of
//! the calendar and maths layers and the curve-construction taxonomy:
//! configuration, convergence, out-of-range queries, missing fixings and
//! missing dependency curves. The `ensure!`, `configuration!` and `fail!`
//! macros return early with the matching variant.

use thiserror::Error;

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Invalid curve or instrument set-up, detected before any solving.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The root-finder (or the global refinement loop) ran out of budget.
    #[error(
        "{instrument} did not converge after {iterations} iterations (residual {residual:e})"
    )]
    Convergence {
        /// Description of the offending instrument or pass.
        instrument: String,
        /// Iterations spent.
        iterations: usize,
        /// Residual at the last evaluated point.
        residual: f64,
    },

    /// Curve query outside its allowed date range.
    #[error("date {date} outside curve range [{first}, {last}]")]
    OutOfRange {
        /// The queried date.
        date: String,
        /// First node of the curve.
        first: String,
        /// Last node of the curve.
        last: String,
    },

    /// An overnight fixing needed for compounding is absent.
    #[error("missing {index} fixing for {date}")]
    MissingFixing {
        /// Index name.
        index: String,
        /// Fixing date.
        date: String,
    },

    /// A curve was requested before one of the curves it prices against.
    #[error("cannot build {curve}: dependency {dependency} has not been built")]
    MissingDependency {
        /// Curve being built.
        curve: String,
        /// Curve it needs.
        dependency: String,
    },

    /// A 1-D solver exhausted its evaluation budget.
    #[error("maximum number of function evaluations ({iterations}) exceeded")]
    MaxIterations {
        /// Evaluations spent.
        iterations: usize,
    },

    /// A 1-D solver could not find a sign change.
    #[error("unable to bracket root in [{lower}, {upper}]")]
    NoBracket {
        /// Lower end of the widest interval tried.
        lower: f64,
        /// Upper end of the widest interval tried.
        upper: f64,
    },

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Date-related error.
    #[error("date error: {0}")]
    Date(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// General runtime error.
    #[error("{0}")]
    Runtime(String),
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use mc_core::{ensure, errors::Error};
/// fn positive(x: f64) -> mc_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Configuration(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use mc_core::{configuration, errors::Error};
/// fn increasing(a: i32, b: i32) -> mc_core::errors::Result<()> {
///     configuration!(b > a, "pillar {b} does not follow {a}");
///     Ok(())
/// }
/// assert!(increasing(1, 2).is_ok());
/// assert!(matches!(increasing(2, 2), Err(Error::Configuration(_))));
/// ```
#[macro_export]
macro_rules! configuration {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Configuration(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use mc_core::{fail, errors::Error};
/// fn always_err() -> mc_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

impl Error {
    /// Whether this error belongs to the configuration class, i.e. was
    /// raised before any solving started.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}
