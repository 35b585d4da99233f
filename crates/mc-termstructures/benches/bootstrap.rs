//! Criterion benchmarks for curve bootstrapping.
//!
//! Times the log-linear SOFR curve on its own, the log-cubic MXN discount
//! curve on top of it, and the whole four-curve market.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mc_termstructures::recipes::{discount_recipe, sofr_recipe};
use mc_termstructures::{build_market, BootstrapConfig, CurveId, CurveSet, MarketQuotes, YieldCurve};
use mc_time::TimeUnit;

fn bench_single_curves(c: &mut Criterion) {
    let quotes = MarketQuotes::february_19_2025().unwrap();
    let config = BootstrapConfig::default();
    let mut group = c.benchmark_group("single_curve");

    group.bench_function("sofr_log_linear", |b| {
        b.iter(|| {
            let mut set = CurveSet::new(quotes.valuation, config);
            set.build(sofr_recipe(black_box(&quotes)).unwrap()).unwrap()
        });
    });

    let mut base = CurveSet::new(quotes.valuation, config);
    base.build(sofr_recipe(&quotes).unwrap()).unwrap();
    group.bench_function("mxn_discount_log_cubic", |b| {
        b.iter(|| {
            let mut set = base.clone();
            set.build(discount_recipe(black_box(&quotes)).unwrap()).unwrap()
        });
    });

    group.finish();
}

fn bench_market(c: &mut Criterion) {
    let quotes = MarketQuotes::february_19_2025().unwrap();
    c.bench_function("full_market", |b| {
        b.iter(|| build_market(black_box(&quotes), BootstrapConfig::default()).unwrap());
    });

    // Query cost on a finished log-cubic curve.
    let market = build_market(&quotes, BootstrapConfig::default()).unwrap();
    let curve = market
        .get(CurveId::DomesticDiscount)
        .unwrap()
        .clone();
    let dates: Vec<_> = (1..=120)
        .map(|m| quotes.valuation.advance(3 * m, TimeUnit::Months).unwrap())
        .collect();
    c.bench_function("discount_lookup_120", |b| {
        b.iter(|| {
            for &d in &dates {
                let _ = curve.discount(black_box(d));
            }
        });
    });
}

criterion_group!(benches, bench_single_curves, bench_market);
criterion_main!(benches);
