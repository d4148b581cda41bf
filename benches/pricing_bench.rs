use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use openvanilla::core::{ContractSpec, OptionType, PricingEngine};
use openvanilla::engines::analytic::BlackScholesEngine;
use openvanilla::engines::monte_carlo::MonteCarloEngine;
use openvanilla::engines::pde::{ExplicitFdEngine, ImplicitFdEngine};
use openvanilla::strategy::{SpotRange, evaluate_strategies};
use openvanilla::vol::implied_vol;
use std::hint::black_box;

// Rough targets on a laptop core:
// - Black-Scholes price with Greeks: < 200 ns
// - Implied vol bisection to 1e-8: < 10 us
// - Implicit FD 200x200: < 2 ms

fn benchmark_contract() -> ContractSpec {
    ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.02, 0.20, 0.5)
}

fn bench_black_scholes(c: &mut Criterion) {
    let contract = benchmark_contract();
    let engine = BlackScholesEngine::new();

    c.bench_function("black_scholes_call", |b| {
        b.iter(|| {
            let px = engine
                .price(black_box(&contract))
                .expect("pricing should succeed")
                .price;
            black_box(px)
        })
    });
}

fn bench_implied_vol(c: &mut Criterion) {
    let contract = benchmark_contract();
    let quote = BlackScholesEngine::new()
        .price(&contract)
        .expect("pricing should succeed")
        .price;

    c.bench_function("implied_vol_bisection", |b| {
        b.iter(|| {
            let iv = implied_vol(black_box(&contract), black_box(quote), 1e-8)
                .expect("implied vol should converge");
            black_box(iv)
        })
    });
}

fn bench_monte_carlo_path_counts(c: &mut Criterion) {
    let contract = benchmark_contract();
    let mut group = c.benchmark_group("monte_carlo_call_put");
    group.sample_size(10);

    for paths in [1_000_usize, 10_000, 100_000] {
        let engine = MonteCarloEngine::new(1, paths, 42);
        group.bench_with_input(BenchmarkId::from_parameter(paths), &paths, |b, _| {
            b.iter(|| {
                let prices = engine
                    .price_call_put(black_box(&contract))
                    .expect("pricing should succeed");
                black_box((prices.call, prices.put))
            })
        });
    }

    group.finish();
}

fn bench_finite_difference(c: &mut Criterion) {
    let contract = benchmark_contract();
    let mut group = c.benchmark_group("finite_difference");

    let explicit = ExplicitFdEngine::new(100, 200).with_s_max(200.0);
    group.bench_function("explicit_100x200", |b| {
        b.iter(|| {
            let px = explicit
                .price(black_box(&contract))
                .expect("grid should be stable")
                .price;
            black_box(px)
        })
    });

    for steps in [100_usize, 200, 400] {
        let implicit = ImplicitFdEngine::new(steps, steps).with_s_max(200.0);
        group.bench_with_input(BenchmarkId::new("implicit", steps), &steps, |b, _| {
            b.iter(|| {
                let px = implicit
                    .price(black_box(&contract))
                    .expect("pricing should succeed")
                    .price;
                black_box(px)
            })
        });
    }

    group.finish();
}

fn bench_strategy_curves(c: &mut Criterion) {
    let contract = benchmark_contract();
    let range = SpotRange::around(contract.spot);

    c.bench_function("strategy_curves_100_spots", |b| {
        b.iter(|| {
            let curves = evaluate_strategies(black_box(&contract), black_box(&range))
                .expect("evaluation should succeed");
            black_box(curves)
        })
    });
}

criterion_group!(
    pricing_benches,
    bench_black_scholes,
    bench_implied_vol,
    bench_monte_carlo_path_counts,
    bench_finite_difference,
    bench_strategy_curves
);
criterion_main!(pricing_benches);
