//! Module `pricing::european`.
//!
//! Request/response entry points for European vanilla valuation. Each function validates its
//! inputs, runs one engine and returns a typed result or a [`PricingError`]; none of them
//! keeps state between calls.
//!
//! When to use: these helpers suit one-shot valuation from a presentation layer. Build the
//! engine structs directly (for example [`MonteCarloEngine`] or [`ExplicitFdEngine`]) when
//! the same settings are reused across many contracts.
//!
//! [`ExplicitFdEngine`]: crate::engines::pde::ExplicitFdEngine

use crate::core::{ContractSpec, FdScheme, PricingEngine, PricingError, PricingResult};
use crate::engines::analytic::BlackScholesEngine;
use crate::engines::monte_carlo::{MonteCarloEngine, MonteCarloPrices};
use crate::engines::pde::{ValueSurface, solve_surface};
use crate::strategy::{SelectorThresholds, StrategySelection, select_strategy};
use crate::vol::{ImpliedVolResult, ImpliedVolSolver};

pub use crate::mc::simulate_paths;
pub use crate::strategy::evaluate_strategies;

/// Closed-form price, Greeks and `d1`/`d2` diagnostics.
///
/// # Examples
/// ```rust
/// use openvanilla::core::{ContractSpec, OptionType};
/// use openvanilla::pricing::price_analytic;
///
/// let spec = ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.02, 0.20, 0.5);
/// let res = price_analytic(&spec).unwrap();
/// assert!((res.price - 6.12).abs() < 0.005);
/// ```
pub fn price_analytic(contract: &ContractSpec) -> Result<PricingResult, PricingError> {
    BlackScholesEngine::new().price(contract)
}

/// Volatility that reprices `contract` to `observed_price`; `contract.volatility` is ignored.
pub fn implied_volatility(
    contract: &ContractSpec,
    observed_price: f64,
    precision: f64,
) -> Result<ImpliedVolResult, PricingError> {
    ImpliedVolSolver::default()
        .with_precision(precision)
        .solve(contract, observed_price)
}

/// Call and put estimates from one seeded batch of `num_paths` paths.
///
/// The standard errors in the result shrink like `1/√num_paths`; raise the path count when
/// they are too wide.
pub fn price_monte_carlo(
    contract: &ContractSpec,
    steps: usize,
    num_paths: usize,
    seed: u64,
) -> Result<MonteCarloPrices, PricingError> {
    MonteCarloEngine::new(steps, num_paths, seed).price_call_put(contract)
}

/// Full finite-difference value surface on `[0, s_max]`.
pub fn price_finite_difference(
    contract: &ContractSpec,
    s_max: f64,
    space_steps: usize,
    time_steps: usize,
    scheme: FdScheme,
) -> Result<ValueSurface, PricingError> {
    solve_surface(contract, s_max, space_steps, time_steps, scheme)
}

/// Strategy recommendation with the default thresholds.
pub fn select_optimal_strategy(contract: &ContractSpec) -> Result<StrategySelection, PricingError> {
    select_strategy(contract, &SelectorThresholds::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;
    use crate::strategy::StrategyRecommendation;
    use approx::assert_relative_eq;

    fn scenario(option_type: OptionType) -> ContractSpec {
        ContractSpec::new(option_type, 100.0, 100.0, 0.02, 0.20, 0.5)
    }

    #[test]
    fn reference_scenario_to_two_decimals() {
        let call = price_analytic(&scenario(OptionType::Call)).unwrap().price;
        let put = price_analytic(&scenario(OptionType::Put)).unwrap().price;
        assert_relative_eq!(call, 6.12, epsilon = 0.005);
        assert_relative_eq!(put, 5.13, epsilon = 0.005);
        assert_relative_eq!(call - put, 100.0 - 100.0 * (-0.01_f64).exp(), max_relative = 1e-9);
    }

    #[test]
    fn implied_volatility_recovers_sigma() {
        let price = price_analytic(&scenario(OptionType::Put)).unwrap().price;
        let res = implied_volatility(&scenario(OptionType::Put), price, 1e-9).unwrap();
        assert!(res.converged);
        assert_relative_eq!(res.volatility, 0.20, epsilon = 1e-6);
    }

    #[test]
    fn schemes_agree_with_each_other() {
        let spec = scenario(OptionType::Call);
        let explicit = price_finite_difference(&spec, 200.0, 100, 200, FdScheme::Explicit)
            .unwrap()
            .price_at(100.0);
        let implicit = price_finite_difference(&spec, 200.0, 100, 200, FdScheme::Implicit)
            .unwrap()
            .price_at(100.0);
        assert!((explicit - implicit).abs() < 0.05);
    }

    #[test]
    fn selector_defaults() {
        let sel = select_optimal_strategy(&scenario(OptionType::Call)).unwrap();
        assert_eq!(sel.recommendation, StrategyRecommendation::BullSpread);
    }
}
