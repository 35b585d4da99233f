//! Business-day adjustment rules.

use serde::{Deserialize, Serialize};

/// How a date falling on a holiday is rolled to a business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessDayConvention {
    /// First business day after the holiday.
    Following,
    /// Following, unless that crosses into the next month, then Preceding.
    ModifiedFollowing,
    /// Last business day before the holiday.
    Preceding,
    /// Preceding, unless that crosses into the previous month, then Following.
    ModifiedPreceding,
    /// No adjustment.
    Unadjusted,
}

impl std::fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedPreceding => "Modified Preceding",
            BusinessDayConvention::Unadjusted => "Unadjusted",
        };
        write!(f, "{s}")
    }
}
