use openvanilla::core::{ContractSpec, OptionType, PricingEngine, PricingError};
use openvanilla::engines::analytic::bs_price;
use openvanilla::engines::monte_carlo::{MonteCarloEngine, expected_payoff_profile};
use openvanilla::mc::simulate_paths;
use openvanilla::pricing::price_monte_carlo;

fn scenario() -> ContractSpec {
    ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.02, 0.20, 0.5)
}

#[test]
fn estimates_tighten_with_more_paths() {
    let spec = scenario();
    let bs_call = bs_price(OptionType::Call, 100.0, 100.0, 0.02, 0.20, 0.5);
    let bs_put = bs_price(OptionType::Put, 100.0, 100.0, 0.02, 0.20, 0.5);

    let small = price_monte_carlo(&spec, 1, 1_000, 11).unwrap();
    let large = price_monte_carlo(&spec, 1, 100_000, 11).unwrap();

    for mc in [&small, &large] {
        assert!(
            (mc.call - bs_call).abs() <= 4.0 * mc.call_stderr,
            "call {} vs {bs_call} (se {})",
            mc.call,
            mc.call_stderr
        );
        assert!(
            (mc.put - bs_put).abs() <= 4.0 * mc.put_stderr,
            "put {} vs {bs_put} (se {})",
            mc.put,
            mc.put_stderr
        );
    }

    // Standard error scales like 1/sqrt(n): 100x the paths gives roughly a tenth.
    let ratio = small.call_stderr / large.call_stderr;
    assert!((7.0..13.0).contains(&ratio), "stderr ratio {ratio}");
}

#[test]
fn daily_steps_full_batch_lands_near_closed_form() {
    let mc = price_monte_carlo(&scenario(), 252, 100_000, 42).unwrap();
    assert_eq!(mc.num_paths, 100_000);
    assert_eq!(mc.time_steps, 252);
    assert!((mc.call - 6.12).abs() < 0.10, "call={}", mc.call);
    assert!((mc.put - 5.13).abs() < 0.10, "put={}", mc.put);
}

#[test]
fn same_seed_is_bitwise_reproducible() {
    let spec = scenario();
    let a = price_monte_carlo(&spec, 4, 5_000, 99).unwrap();
    let b = price_monte_carlo(&spec, 4, 5_000, 99).unwrap();
    let c = price_monte_carlo(&spec, 4, 5_000, 100).unwrap();
    assert_eq!(a, b);
    assert_ne!(a.call, c.call);
}

#[test]
fn engine_reports_requested_side_with_stderr() {
    let engine = MonteCarloEngine::new(1, 20_000, 3);
    let put = scenario().with_option_type(OptionType::Put);
    let res = engine.price(&put).unwrap();
    let both = engine.price_call_put(&put).unwrap();
    assert_eq!(res.price, both.put);
    assert_eq!(res.stderr, Some(both.put_stderr));
}

#[test]
fn stored_paths_price_like_the_streaming_engine() {
    let spec = scenario();
    let paths = simulate_paths(100.0, 0.02, 0.20, 0.5, 6, 2_000, 5).unwrap();
    let from_paths = MonteCarloEngine::price_path_set(&paths, 100.0, 0.02).unwrap();
    let streamed = price_monte_carlo(&spec, 6, 2_000, 5).unwrap();
    assert!((from_paths.call - streamed.call).abs() < 1e-9);
    assert!((from_paths.put - streamed.put).abs() < 1e-9);

    let profile = expected_payoff_profile(&paths, OptionType::Call, 100.0, 0.02);
    assert_eq!(profile.len(), 7);
    assert_eq!(profile[0].0, 0.0);
    // The profile discounts to maturity; bring the last entry back to today.
    let discount = (-0.02_f64 * 0.5).exp();
    assert!((profile[6].1 * discount - from_paths.call).abs() < 1e-9);
    assert!(profile[6].1 > from_paths.call);
}

#[test]
fn path_mean_drifts_at_the_risk_free_rate() {
    let paths = simulate_paths(100.0, 0.05, 0.3, 1.0, 10, 50_000, 8).unwrap();
    let means = paths.mean_by_step();
    assert_eq!(means.len(), 11);
    assert_eq!(means[0], 100.0);
    let expected = 100.0 * 0.05_f64.exp();
    // sd of S_T is about 32, so the mean's se is about 0.14.
    assert!((means[10] - expected).abs() < 0.6, "mean={}", means[10]);
    assert!(paths.terminal().iter().all(|&s| s > 0.0));
}

#[test]
fn zero_volatility_is_deterministic_growth() {
    let paths = simulate_paths(100.0, 0.03, 0.0, 2.0, 8, 16, 1).unwrap();
    let grown = 100.0 * 0.06_f64.exp();
    assert!(paths.terminal().iter().all(|&s| (s - grown).abs() < 1e-9));

    let mc = price_monte_carlo(&scenario().with_volatility(0.0), 3, 100, 1).unwrap();
    assert!(mc.call_stderr < 1e-6);
    assert!((mc.call - (100.0 - 100.0 * (-0.01_f64).exp())).abs() < 1e-9);
}

#[test]
fn bad_batches_are_rejected() {
    let spec = scenario();
    assert!(matches!(
        price_monte_carlo(&spec, 1, 0, 1),
        Err(PricingError::InvalidInput(_))
    ));
    assert!(matches!(
        price_monte_carlo(&spec, 0, 10, 1),
        Err(PricingError::InvalidInput(_))
    ));
    assert!(matches!(
        simulate_paths(-1.0, 0.02, 0.2, 1.0, 1, 10, 1),
        Err(PricingError::InvalidInput(_))
    ));
}
