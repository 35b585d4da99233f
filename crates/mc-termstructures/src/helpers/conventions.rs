//! Market conventions the helpers resolve their dates with.
//!
//! Calendars and day counters are shared trait objects so one set of
//! conventions can be reused across every quote of a strip.

use std::sync::Arc;

use mc_core::errors::Result;
use mc_core::{Natural, Real};
use mc_indexes::OvernightIndex;
use mc_time::{BusinessDayConvention, Calendar, Date, DayCounter, Frequency};

use crate::curve_id::CurveRef;

/// Start of an instrument: `settlement_days` business days after `valuation`.
pub(crate) fn settlement_date(
    calendar: &dyn Calendar,
    valuation: Date,
    settlement_days: Natural,
) -> Result<Date> {
    calendar.advance_business_days(valuation, settlement_days as i32)
}

/// Deposits.
#[derive(Debug, Clone)]
pub struct DepositConventions {
    /// Business days from valuation to start.
    pub settlement_days: Natural,
    /// Calendar for settlement and maturity.
    pub calendar: Arc<dyn Calendar>,
    /// Maturity adjustment.
    pub convention: BusinessDayConvention,
    /// Snap month-end starts to month-end maturities.
    pub end_of_month: bool,
    /// Accrual day counter.
    pub day_counter: Arc<dyn DayCounter>,
}

/// Fixed-versus-term-rate par swaps.
#[derive(Debug, Clone)]
pub struct SwapConventions {
    /// Business days from valuation to start.
    pub settlement_days: Natural,
    /// Calendar for both legs.
    pub calendar: Arc<dyn Calendar>,
    /// Coupon date adjustment.
    pub convention: BusinessDayConvention,
    /// Fixed-leg coupon frequency.
    pub fixed_frequency: Frequency,
    /// Fixed-leg day counter.
    pub fixed_day_counter: Arc<dyn DayCounter>,
    /// Floating-leg coupon frequency.
    pub floating_frequency: Frequency,
    /// Floating-leg day counter.
    pub floating_day_counter: Arc<dyn DayCounter>,
    /// Curve the cash flows are discounted on.
    pub discount: CurveRef,
    /// Curve the term rate is forecast from.
    pub forecast: CurveRef,
}

/// Overnight-indexed swaps.
#[derive(Debug, Clone)]
pub struct OisConventions {
    /// Business days from valuation to start.
    pub settlement_days: Natural,
    /// Calendar for schedule and payment dates.
    pub calendar: Arc<dyn Calendar>,
    /// Coupon date adjustment.
    pub convention: BusinessDayConvention,
    /// Snap month-end starts to month-end coupon dates.
    pub end_of_month: bool,
    /// Coupon frequency, shared by both legs.
    pub frequency: Frequency,
    /// Business days between accrual end and payment.
    pub payment_lag: Natural,
    /// Fixed-leg day counter.
    pub fixed_day_counter: Arc<dyn DayCounter>,
    /// The compounded index, with its fixings.
    pub index: OvernightIndex,
    /// Curve the cash flows are discounted on.
    pub discount: CurveRef,
    /// Curve the overnight rate is forecast from.
    pub forecast: CurveRef,
}

/// Three-month IMM futures.
#[derive(Debug, Clone)]
pub struct FuturesConventions {
    /// Calendar for the window end.
    pub calendar: Arc<dyn Calendar>,
    /// Window-end adjustment.
    pub convention: BusinessDayConvention,
    /// Snap month-end starts to month-end window ends.
    pub end_of_month: bool,
    /// Window length in months.
    pub months: i32,
    /// Accrual day counter of the implied rate.
    pub day_counter: Arc<dyn DayCounter>,
    /// Curve the forward rate is read from.
    pub forecast: CurveRef,
}

/// FX forwards, spot quoted as domestic currency per unit of foreign.
#[derive(Debug, Clone)]
pub struct FxConventions {
    /// Business days from valuation to spot.
    pub settlement_days: Natural,
    /// Calendar for spot and maturity.
    pub calendar: Arc<dyn Calendar>,
    /// Maturity adjustment.
    pub convention: BusinessDayConvention,
    /// Snap month-end spot dates to month-end maturities.
    pub end_of_month: bool,
    /// Multiplier turning quoted points into price units.
    pub points_scale: Real,
    /// The foreign-currency curve.
    pub foreign: CurveRef,
}

/// Cross-currency basis swaps: a domestic fixed leg against the foreign
/// overnight rate plus a spread.
#[derive(Debug, Clone)]
pub struct BasisSwapConventions {
    /// Business days from valuation to start.
    pub settlement_days: Natural,
    /// Domestic calendar for schedule and payment dates.
    pub calendar: Arc<dyn Calendar>,
    /// Coupon date adjustment.
    pub convention: BusinessDayConvention,
    /// Coupon frequency, shared by both legs.
    pub frequency: Frequency,
    /// Business days between accrual end and payment.
    pub payment_lag: Natural,
    /// Domestic-leg day counter.
    pub domestic_day_counter: Arc<dyn DayCounter>,
    /// Foreign overnight index compounded on the foreign leg.
    pub foreign_index: OvernightIndex,
    /// Curve that discounts and forecasts the foreign leg.
    pub foreign: CurveRef,
}
