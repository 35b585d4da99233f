//! `Frequency` — how often coupons recur.

use serde::{Deserialize, Serialize};

/// Coupon frequency.
///
/// `EveryFourthWeek` is the 28-day roll of the Mexican money market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// A single payment at maturity.
    Once,
    /// Once a year.
    Annual,
    /// Twice a year.
    Semiannual,
    /// Four times a year.
    Quarterly,
    /// Twelve times a year.
    Monthly,
    /// Every 28 days (13 times a year).
    EveryFourthWeek,
    /// Every week.
    Weekly,
    /// Every business day.
    Daily,
}

impl Frequency {
    /// Number of periods per year (0 for [`Frequency::Once`]).
    pub fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Once => 0,
            Frequency::Annual => 1,
            Frequency::Semiannual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::EveryFourthWeek => 13,
            Frequency::Weekly => 52,
            Frequency::Daily => 365,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Frequency::Once => "Once",
            Frequency::Annual => "Annual",
            Frequency::Semiannual => "Semiannual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
            Frequency::EveryFourthWeek => "Every-Fourth-Week",
            Frequency::Weekly => "Weekly",
            Frequency::Daily => "Daily",
        };
        write!(f, "{s}")
    }
}
