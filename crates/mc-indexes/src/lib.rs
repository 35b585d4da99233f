//! # mc-indexes
//!
//! Overnight rate indexes and the historical fixings their compounded
//! coupons read for days before the valuation date.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Append-only series of published fixings.
pub mod fixings;

/// `OvernightIndex` and its daily accrual steps.
pub mod overnight_index;

pub use fixings::FixingSeries;
pub use overnight_index::{OvernightIndex, OvernightStep};
