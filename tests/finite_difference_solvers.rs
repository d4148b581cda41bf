use openvanilla::core::{ContractSpec, FdScheme, OptionType, PricingEngine, PricingError};
use openvanilla::engines::analytic::{bs_delta, bs_price};
use openvanilla::engines::pde::{EXPLICIT_STABILITY_LIMIT, ExplicitFdEngine, ImplicitFdEngine};
use openvanilla::pricing::price_finite_difference;

fn rel_err(x: f64, y: f64) -> f64 {
    let denom = y.abs().max(1.0e-8);
    (x - y).abs() / denom
}

fn scenario(option_type: OptionType) -> ContractSpec {
    ContractSpec::new(option_type, 100.0, 100.0, 0.02, 0.20, 0.5)
}

#[test]
fn implicit_200_by_200_within_one_percent_of_black_scholes() {
    for option_type in [OptionType::Call, OptionType::Put] {
        let spec = scenario(option_type);
        let bs = bs_price(option_type, 100.0, 100.0, 0.02, 0.20, 0.5);
        let surface =
            price_finite_difference(&spec, 200.0, 200, 200, FdScheme::Implicit).unwrap();
        let fd = surface.price_at(100.0);
        assert!(rel_err(fd, bs) < 0.01, "{option_type:?}: fd={fd} bs={bs}");
    }
}

#[test]
fn stable_explicit_grid_within_one_percent_of_black_scholes() {
    for option_type in [OptionType::Call, OptionType::Put] {
        let spec = scenario(option_type);
        let engine = ExplicitFdEngine::new(100, 200).with_s_max(200.0);
        assert!(engine.alpha_max(&spec) <= EXPLICIT_STABILITY_LIMIT);

        let bs = bs_price(option_type, 100.0, 100.0, 0.02, 0.20, 0.5);
        let fd = engine.price(&spec).unwrap().price;
        assert!(rel_err(fd, bs) < 0.01, "{option_type:?}: fd={fd} bs={bs}");
    }
}

#[test]
fn explicit_gate_rejects_and_names_the_minimum_steps() {
    let spec = ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.05, 0.5, 1.0);
    let engine = ExplicitFdEngine::new(50, 10).with_s_max(200.0);
    // 0.5 * 0.25 * 49^2 * 0.1
    assert!((engine.alpha_max(&spec) - 30.0125).abs() < 1e-9);

    match price_finite_difference(&spec, 200.0, 50, 10, FdScheme::Explicit) {
        Err(PricingError::StabilityViolation(msg)) => {
            assert!(msg.contains("601"), "{msg}");
        }
        other => panic!("expected a stability violation, got {other:?}"),
    }

    // The suggested step count passes the gate.
    let fixed = ExplicitFdEngine::new(50, 601).with_s_max(200.0);
    assert!(fixed.alpha_max(&spec) <= EXPLICIT_STABILITY_LIMIT);
    assert!(fixed.price(&spec).is_ok());

    // The implicit scheme takes the same grid without complaint.
    let implicit = price_finite_difference(&spec, 200.0, 50, 10, FdScheme::Implicit).unwrap();
    assert!(implicit.price_at(100.0).is_finite());
}

#[test]
fn boundaries_follow_discounted_strike_through_time() {
    let (rate, strike, s_max, expiry) = (0.04, 100.0, 300.0, 1.0);
    let call = ContractSpec::new(OptionType::Call, 100.0, strike, rate, 0.25, expiry);
    let put = call.with_option_type(OptionType::Put);

    for scheme in [FdScheme::Explicit, FdScheme::Implicit] {
        let (n, m) = (60, 400);
        let c = price_finite_difference(&call, s_max, n, m, scheme).unwrap();
        let p = price_finite_difference(&put, s_max, n, m, scheme).unwrap();
        for j in 0..=m {
            let tau = expiry - c.times()[j];
            let df_k = strike * (-rate * tau).exp();
            assert_eq!(c.get(0, j), 0.0);
            assert!((c.get(n, j) - (s_max - df_k)).abs() < 1e-9, "{scheme:?} j={j}");
            assert!((p.get(0, j) - df_k).abs() < 1e-9, "{scheme:?} j={j}");
            assert_eq!(p.get(n, j), 0.0);
        }
    }
}

#[test]
fn surfaces_agree_with_closed_form_near_the_grid_ends() {
    let spec = scenario(OptionType::Put);
    let surface = ImplicitFdEngine::new(200, 200)
        .with_s_max(400.0)
        .solve(&spec)
        .unwrap();
    let df_k = 100.0 * (-0.01_f64).exp();

    // S -> 0: put tends to K e^{-rT} - S.
    let low = surface.price_at(4.0);
    assert!((low - (df_k - 4.0)).abs() < 0.05, "low={low}");
    // S large: put tends to zero.
    assert!(surface.price_at(350.0) < 1e-3);

    let call_surface = ImplicitFdEngine::new(200, 200)
        .with_s_max(400.0)
        .solve(&scenario(OptionType::Call))
        .unwrap();
    let high = call_surface.price_at(350.0);
    assert!((high - (350.0 - df_k)).abs() < 0.05, "high={high}");
}

#[test]
fn fd_put_call_parity_on_the_shared_grid() {
    let solve = |option_type| {
        price_finite_difference(&scenario(option_type), 200.0, 200, 200, FdScheme::Implicit)
            .unwrap()
    };
    let call = solve(OptionType::Call);
    let put = solve(OptionType::Put);
    let df_k = 100.0 * (-0.01_f64).exp();
    for (i, &s) in call.spots().iter().enumerate().skip(40).take(100) {
        let parity = call.get(i, 0) - put.get(i, 0) - (s - df_k);
        assert!(parity.abs() < 0.02, "S={s} parity gap {parity}");
    }
}

#[test]
fn terminal_layer_is_the_payoff() {
    let spec = scenario(OptionType::Call);
    let surface = price_finite_difference(&spec, 200.0, 40, 80, FdScheme::Implicit).unwrap();
    assert_eq!(surface.space_steps(), 40);
    assert_eq!(surface.time_steps(), 80);
    for (s, v) in surface.spots().iter().zip(surface.terminal_layer()) {
        assert_eq!(*v, (s - 100.0_f64).max(0.0));
    }
    assert_eq!(surface.times()[0], 0.0);
    assert!((surface.times()[80] - 0.5).abs() < 1e-12);
}

#[test]
fn delta_from_the_grid_tracks_the_analytic_delta() {
    let spec = scenario(OptionType::Call);
    let surface = price_finite_difference(&spec, 200.0, 200, 200, FdScheme::Implicit).unwrap();
    let fd_delta = surface.delta_at(100.0);
    let bs = bs_delta(OptionType::Call, 100.0, 100.0, 0.02, 0.2, 0.5);
    assert!((fd_delta - bs).abs() < 0.01, "fd={fd_delta} bs={bs}");
}

#[test]
fn invalid_grids_are_rejected() {
    let spec = scenario(OptionType::Call);
    for scheme in [FdScheme::Explicit, FdScheme::Implicit] {
        assert!(matches!(
            price_finite_difference(&spec, 200.0, 1, 100, scheme),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            price_finite_difference(&spec, 200.0, 100, 0, scheme),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            price_finite_difference(&spec, 50.0, 100, 1000, scheme),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            price_finite_difference(&spec.with_volatility(0.0), 200.0, 100, 1000, scheme),
            Err(PricingError::InvalidInput(_))
        ));
    }
}
