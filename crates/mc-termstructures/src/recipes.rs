//! Curve recipes for a USD-collateralised MXN market.
//!
//! [`MarketQuotes`] holds the raw closing quotes, each paired with the
//! tenor code it was published under. The recipe functions attach the
//! market conventions of each instrument family and turn the quotes into
//! [`CurveRecipe`]s; [`build_market`] runs them through a [`CurveSet`] in
//! dependency order:
//!
//! 1. collateral: USD SOFR deposit, IMM futures and OIS;
//! 2. domestic discount: USDMXN FX forwards, then MXN/USD basis swaps;
//! 3. TIIE 28-day and F-TIIE projection, in parallel.
//!
//! Rates, basis spreads and fixings are quoted in percent, futures as
//! prices, FX forwards as points over spot.

use std::sync::Arc;

use mc_core::errors::{Error, Result};
use mc_core::{Price, Rate, Real};
use mc_indexes::{FixingSeries, OvernightIndex};
use mc_time::{
    Actual360, BusinessDayConvention, Calendar, Date, Frequency, Imm, Mexico, Period, TenorCode,
    UnitedStates,
};
use serde::{Deserialize, Serialize};

use crate::bootstrap::BootstrapConfig;
use crate::curve_id::{CurveId, CurveRef};
use crate::helpers::{
    BasisSwapConventions, CrossCurrencyBasisSwap, DepositConventions, FuturesConventions,
    FxConventions, FxForward, ImmFuture, InstrumentHelper, OisConventions, OvernightIndexFuture,
    OvernightIndexedSwap, ParSwap, SwapConventions, ZeroDeposit,
};
use crate::orchestrator::{CurveRecipe, CurveSet};
use crate::piecewise_curve::{CurveConfig, Interpolation};

/// A quote and the tenor code it was published under.
pub type Quote = (Real, String);

/// Closing quotes for one valuation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuotes {
    /// Valuation date.
    pub valuation: Date,
    /// SOFR overnight deposit, percent.
    pub sofr_deposit: Quote,
    /// SOFR 3-month futures prices by IMM code.
    pub sofr_futures: Vec<Quote>,
    /// SOFR OIS rates, percent.
    pub sofr_swaps: Vec<Quote>,
    /// USDMXN spot, pesos per dollar.
    pub fx_spot: Price,
    /// USDMXN forward points.
    pub fx_points: Vec<Quote>,
    /// MXN/USD cross-currency basis, percent.
    pub xccy_basis: Vec<Quote>,
    /// TIIE 28-day deposit, percent.
    pub tiie_deposit: Quote,
    /// TIIE 28-day swap rates, percent.
    pub tiie_swaps: Vec<Quote>,
    /// F-TIIE futures by contract month, quoted as rates in percent.
    pub ftiie_futures: Vec<Quote>,
    /// F-TIIE OIS rates, percent.
    pub ftiie_swaps: Vec<Quote>,
    /// Banxico F-TIIE fixings as `(dd/mm/YYYY, percent)`.
    pub ftiie_fixings: Vec<(String, Rate)>,
}

fn quotes(rows: &[(Real, &str)]) -> Vec<Quote> {
    rows.iter().map(|&(v, t)| (v, t.to_string())).collect()
}

impl MarketQuotes {
    /// Closing quotes of 19 February 2025.
    pub fn february_19_2025() -> Result<Self> {
        Ok(Self {
            valuation: Date::from_ymd(2025, 2, 19)?,
            sofr_deposit: (4.33, "1D".into()),
            sofr_futures: quotes(&[
                (95.6825, "H5"),
                (95.8, "M5"),
                (95.915, "U5"),
                (95.99, "Z5"),
                (96.03, "H6"),
            ]),
            sofr_swaps: quotes(&[
                (4.147, "2Y"),
                (4.11665, "3Y"),
                (4.10919, "4Y"),
                (4.11125, "5Y"),
                (4.1187, "6Y"),
                (4.1279, "7Y"),
                (4.13713, "8Y"),
                (4.14073, "9Y"),
                (4.159, "10Y"),
                (4.1845, "12Y"),
                (4.2047, "15Y"),
                (4.214, "20Y"),
                (4.1491, "25Y"),
                (4.0518, "30Y"),
            ]),
            fx_spot: 20.44245,
            fx_points: quotes(&[
                (30.0, "1D"),
                (31.0, "2D"),
                (216.0, "1W"),
                (877.0, "1M"),
                (1803.0, "2M"),
                (2623.0, "3M"),
                (5035.0, "6M"),
                (7420.0, "9M"),
                (9770.0, "1Y"),
            ]),
            xccy_basis: quotes(&[
                (0.0115, "26L"),
                (-0.073, "39L"),
                (-0.1425, "52L"),
                (-0.194, "65L"),
                (-0.249, "91L"),
                (-0.294, "130L"),
                (-0.23101, "195L"),
                (-0.192, "260L"),
                (-0.185, "390L"),
            ]),
            tiie_deposit: (9.7638, "1M".into()),
            tiie_swaps: quotes(&[
                (9.643802, "3L"),
                (9.293893, "6L"),
                (9.066304, "9L"),
                (8.895611, "13L"),
                (8.719446, "26L"),
                (8.713905, "39L"),
                (8.764028, "52L"),
                (8.814004, "65L"),
                (8.938174, "91L"),
                (9.094733, "130L"),
                (9.276024, "195L"),
                (9.293577, "260L"),
                (9.2277, "390L"),
            ]),
            ftiie_futures: quotes(&[(9.655, "Feb2025"), (9.495, "Mar2025")]),
            ftiie_swaps: quotes(&[
                (9.27, "3L"),
                (8.943, "6L"),
                (8.74025, "9L"),
                (8.5945, "13L"),
                (8.45, "26L"),
                (8.4568, "39L"),
                (8.5125, "52L"),
                (8.5655, "65L"),
                (8.6935, "91L"),
                (8.85225, "130L"),
                (9.03405, "195L"),
                (9.051, "260L"),
                (8.98505, "390L"),
            ]),
            ftiie_fixings: [
                ("31/01/2025", 10.03),
                ("04/02/2025", 10.02),
                ("05/02/2025", 10.05),
                ("06/02/2025", 10.00),
                ("07/02/2025", 9.49),
                ("10/02/2025", 9.50),
                ("11/02/2025", 9.50),
                ("12/02/2025", 9.50),
                ("13/02/2025", 9.49),
                ("14/02/2025", 9.49),
                ("17/02/2025", 9.50),
                ("18/02/2025", 9.49),
            ]
            .into_iter()
            .map(|(d, r)| (d.to_string(), r))
            .collect(),
        })
    }

    /// The F-TIIE index carrying the Banxico fixings.
    pub fn ftiie_index(&self) -> Result<OvernightIndex> {
        let index = OvernightIndex::f_tiie();
        let fixings = FixingSeries::from_text_rows(
            index.name(),
            self.ftiie_fixings.iter().map(|(d, r)| (d.as_str(), *r)),
        )?;
        Ok(index.with_fixings(fixings))
    }
}

fn tenor(code: &str) -> Result<TenorCode> {
    code.parse()
}

fn period(code: &str) -> Result<Period> {
    tenor(code)?.period()
}

// ── Conventions ───────────────────────────────────────────────────────────────

/// SOFR deposits: T+2 on the Federal Reserve calendar.
pub fn sofr_deposit_conventions() -> DepositConventions {
    DepositConventions {
        settlement_days: 2,
        calendar: Arc::new(UnitedStates::federal_reserve()),
        convention: BusinessDayConvention::ModifiedFollowing,
        end_of_month: false,
        day_counter: Arc::new(Actual360),
    }
}

/// SOFR 3-month IMM futures.
pub fn sofr_futures_conventions() -> FuturesConventions {
    FuturesConventions {
        calendar: Arc::new(UnitedStates::federal_reserve()),
        convention: BusinessDayConvention::ModifiedFollowing,
        end_of_month: true,
        months: 3,
        day_counter: Arc::new(Actual360),
        forecast: CurveRef::UnderConstruction,
    }
}

/// Annual SOFR OIS, self-discounted.
pub fn sofr_ois_conventions() -> OisConventions {
    OisConventions {
        settlement_days: 2,
        calendar: Arc::new(UnitedStates::federal_reserve()),
        convention: BusinessDayConvention::ModifiedFollowing,
        end_of_month: false,
        frequency: Frequency::Annual,
        payment_lag: 2,
        fixed_day_counter: Arc::new(Actual360),
        index: OvernightIndex::sofr(),
        discount: CurveRef::UnderConstruction,
        forecast: CurveRef::UnderConstruction,
    }
}

/// USDMXN forwards against the collateral curve.
pub fn usdmxn_fx_conventions() -> FxConventions {
    FxConventions {
        settlement_days: 0,
        calendar: Arc::new(Mexico),
        convention: BusinessDayConvention::Following,
        end_of_month: false,
        points_scale: 1.0e-4,
        foreign: CurveRef::Built(CurveId::Collateral),
    }
}

/// MXN fixed against SOFR plus basis, 28-day coupons.
pub fn mxn_usd_basis_conventions() -> BasisSwapConventions {
    BasisSwapConventions {
        settlement_days: 2,
        calendar: Arc::new(Mexico),
        convention: BusinessDayConvention::Following,
        frequency: Frequency::EveryFourthWeek,
        payment_lag: 2,
        domestic_day_counter: Arc::new(Actual360),
        foreign_index: OvernightIndex::sofr(),
        foreign: CurveRef::Built(CurveId::Collateral),
    }
}

/// TIIE deposits: T+1.
pub fn tiie_deposit_conventions() -> DepositConventions {
    DepositConventions {
        settlement_days: 1,
        calendar: Arc::new(Mexico),
        convention: BusinessDayConvention::Following,
        end_of_month: false,
        day_counter: Arc::new(Actual360),
    }
}

/// TIIE 28-day swaps discounted on the domestic discount curve.
pub fn tiie_swap_conventions() -> SwapConventions {
    SwapConventions {
        settlement_days: 1,
        calendar: Arc::new(Mexico),
        convention: BusinessDayConvention::Following,
        fixed_frequency: Frequency::EveryFourthWeek,
        fixed_day_counter: Arc::new(Actual360),
        floating_frequency: Frequency::EveryFourthWeek,
        floating_day_counter: Arc::new(Actual360),
        discount: CurveRef::Built(CurveId::DomesticDiscount),
        forecast: CurveRef::UnderConstruction,
    }
}

/// F-TIIE OIS discounted on the domestic discount curve.
pub fn ftiie_ois_conventions(index: OvernightIndex) -> OisConventions {
    OisConventions {
        settlement_days: 2,
        calendar: Arc::new(Mexico),
        convention: BusinessDayConvention::Following,
        end_of_month: false,
        frequency: Frequency::EveryFourthWeek,
        payment_lag: 2,
        fixed_day_counter: Arc::new(Actual360),
        index,
        discount: CurveRef::Built(CurveId::DomesticDiscount),
        forecast: CurveRef::UnderConstruction,
    }
}

// ── Recipes ───────────────────────────────────────────────────────────────────

/// USD SOFR: deposit, IMM futures from the spot date, then OIS.
/// Log-linear with extrapolation.
pub fn sofr_recipe(quotes: &MarketQuotes) -> Result<CurveRecipe> {
    let valuation = quotes.valuation;
    let deposit = sofr_deposit_conventions();
    let futures = sofr_futures_conventions();
    let ois = sofr_ois_conventions();

    let (rate, code) = &quotes.sofr_deposit;
    let mut helpers: Vec<InstrumentHelper> =
        vec![ZeroDeposit::new(rate / 100.0, valuation, period(code)?, &deposit)?.into()];
    let spot = deposit
        .calendar
        .advance_business_days(valuation, deposit.settlement_days as i32)?;
    let mut expected = spot;
    for (price, code) in &quotes.sofr_futures {
        let imm = tenor(code)?.imm_date(spot)?;
        expected = Imm::next_date(expected)?;
        mc_core::configuration!(
            imm == expected,
            "SOFR future {code} starts {imm}, but the IMM strip continues on {expected}"
        );
        helpers.push(ImmFuture::new(*price, imm, &futures)?.into());
    }
    for (rate, code) in &quotes.sofr_swaps {
        helpers.push(OvernightIndexedSwap::new(rate / 100.0, valuation, period(code)?, &ois)?.into());
    }
    let config = CurveConfig::new(CurveId::Collateral.name(), Interpolation::LogLinear)
        .with_extrapolation(true);
    Ok(CurveRecipe::new(CurveId::Collateral, config, helpers))
}

/// MXN discounting under USD collateral: FX forwards, then basis swaps.
/// Natural log-cubic with extrapolation.
///
/// Each basis swap's domestic fixed rate is the F-TIIE swap rate of the
/// same tenor; the quoted basis enters the SOFR leg with its sign flipped.
pub fn discount_recipe(quotes: &MarketQuotes) -> Result<CurveRecipe> {
    let valuation = quotes.valuation;
    let fx = usdmxn_fx_conventions();
    let basis = mxn_usd_basis_conventions();

    let mut helpers: Vec<InstrumentHelper> = Vec::new();
    for (points, code) in &quotes.fx_points {
        helpers.push(FxForward::new(quotes.fx_spot, *points, period(code)?, valuation, &fx)?.into());
    }
    for (spread, code) in &quotes.xccy_basis {
        let wanted = tenor(code)?;
        let mut domestic = None;
        for (rate, other) in &quotes.ftiie_swaps {
            if tenor(other)? == wanted {
                domestic = Some(rate / 100.0);
            }
        }
        let Some(domestic) = domestic else {
            return Err(Error::Configuration(format!(
                "no F-TIIE swap rate for the {code} basis swap"
            )));
        };
        helpers.push(
            CrossCurrencyBasisSwap::new(domestic, -spread / 100.0, valuation, wanted.period()?, &basis)?
                .into(),
        );
    }
    let config = CurveConfig::new(CurveId::DomesticDiscount.name(), Interpolation::NaturalLogCubic)
        .with_extrapolation(true);
    Ok(CurveRecipe::new(CurveId::DomesticDiscount, config, helpers))
}

/// TIIE 28-day projection: the 1-month deposit, then par swaps.
/// Natural log-cubic with extrapolation.
pub fn tiie_recipe(quotes: &MarketQuotes) -> Result<CurveRecipe> {
    let valuation = quotes.valuation;
    let deposit = tiie_deposit_conventions();
    let swaps = tiie_swap_conventions();

    let (rate, code) = &quotes.tiie_deposit;
    let mut helpers: Vec<InstrumentHelper> =
        vec![ZeroDeposit::new(rate / 100.0, valuation, period(code)?, &deposit)?.into()];
    for (rate, code) in &quotes.tiie_swaps {
        helpers.push(ParSwap::new(rate / 100.0, valuation, period(code)?, &swaps)?.into());
    }
    let config = CurveConfig::new(CurveId::TermIndex.name(), Interpolation::NaturalLogCubic)
        .with_extrapolation(true);
    Ok(CurveRecipe::new(CurveId::TermIndex, config, helpers))
}

/// F-TIIE projection: monthly futures over the Banxico fixings, then OIS.
/// Natural log-cubic with extrapolation.
pub fn ftiie_recipe(quotes: &MarketQuotes) -> Result<CurveRecipe> {
    let valuation = quotes.valuation;
    let index = quotes.ftiie_index()?;
    let ois = ftiie_ois_conventions(index.clone());

    let mut helpers: Vec<InstrumentHelper> = Vec::new();
    for (rate, code) in &quotes.ftiie_futures {
        let (start, end) = tenor(code)?.month_window()?;
        if start < valuation {
            // Published days of the window must all be on file.
            let calendar = index.calendar();
            let first = calendar.adjust(start, BusinessDayConvention::Preceding)?;
            index.fixings().ensure_covers(calendar, first, valuation.min(end))?;
        }
        helpers.push(
            OvernightIndexFuture::new(100.0 - rate, start, end, &index, CurveRef::UnderConstruction)?
                .into(),
        );
    }
    for (rate, code) in &quotes.ftiie_swaps {
        helpers.push(OvernightIndexedSwap::new(rate / 100.0, valuation, period(code)?, &ois)?.into());
    }
    let config = CurveConfig::new(CurveId::OvernightIndex.name(), Interpolation::NaturalLogCubic)
        .with_extrapolation(true);
    Ok(CurveRecipe::new(CurveId::OvernightIndex, config, helpers))
}

/// Build all four curves in dependency order.
pub fn build_market(quotes: &MarketQuotes, config: BootstrapConfig) -> Result<CurveSet> {
    let mut set = CurveSet::new(quotes.valuation, config);
    set.build(sofr_recipe(quotes)?)?;
    set.build(discount_recipe(quotes)?)?;
    set.build_tier(vec![tiie_recipe(quotes)?, ftiie_recipe(quotes)?])?;
    Ok(set)
}
