//! Black-Scholes implied-volatility inversion by bracketed bisection.
//!
//! The call/put price is strictly increasing in volatility, so bisection on
//! `[lower, upper]` always converges once the quote sits inside the no-arbitrage band.
//! Termination is on the analytic-price spread of the bracket, with a hard iteration cap
//! so numerical noise near the bracket ends can never spin forever.

use serde::{Deserialize, Serialize};

use crate::core::{ContractSpec, OptionType, PricingError};
use crate::engines::analytic::bs_price;

/// Bisection settings for implied-volatility inversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpliedVolSolver {
    /// Lowest volatility searched.
    pub lower: f64,
    /// Highest volatility searched.
    pub upper: f64,
    /// Stop once `price(hi) - price(lo)` of the bracket falls below this.
    pub precision: f64,
    /// Iteration cap.
    pub max_iterations: usize,
}

impl Default for ImpliedVolSolver {
    fn default() -> Self {
        Self {
            lower: 1.0e-5,
            upper: 200.0,
            precision: 1.0e-6,
            max_iterations: 100,
        }
    }
}

/// Outcome of a bisection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpliedVolResult {
    /// Midpoint of the final bracket.
    pub volatility: f64,
    /// Bisection steps taken.
    pub iterations: usize,
    /// `false` when the iteration cap stopped the search first.
    pub converged: bool,
}

impl ImpliedVolSolver {
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn validate(&self) -> Result<(), PricingError> {
        if !(self.lower.is_finite() && self.upper.is_finite())
            || self.lower <= 0.0
            || self.upper <= self.lower
        {
            return Err(PricingError::InvalidInput(format!(
                "volatility bracket must satisfy 0 < lower < upper, got [{}, {}]",
                self.lower, self.upper
            )));
        }
        if !self.precision.is_finite() || self.precision <= 0.0 {
            return Err(PricingError::InvalidInput(
                "precision must be finite and > 0".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(PricingError::InvalidInput(
                "max_iterations must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Solves for the volatility that reprices `contract` to `market_price`.
    ///
    /// `contract.volatility` is ignored.
    ///
    /// # Errors
    /// - [`PricingError::InvalidInput`] for `spot <= 0`, `strike <= 0`, `expiry <= 0`,
    ///   or a malformed solver configuration.
    /// - [`PricingError::ArbitrageViolation`] when `market_price` is below
    ///   `max(0, S - K·e^{-rT})` (calls) / `max(0, K·e^{-rT} - S)` (puts), or above `S`
    ///   (calls) / `K·e^{-rT}` (puts).
    /// - [`PricingError::NumericalError`] when the quote needs a volatility above `upper`.
    pub fn solve(
        &self,
        contract: &ContractSpec,
        market_price: f64,
    ) -> Result<ImpliedVolResult, PricingError> {
        self.validate()?;
        contract.validate_without_vol()?;
        if !market_price.is_finite() {
            return Err(PricingError::InvalidInput(
                "market price must be finite".to_string(),
            ));
        }

        let ContractSpec {
            option_type,
            spot,
            strike,
            rate,
            expiry,
            ..
        } = *contract;

        let discounted_strike = strike * contract.discount_factor();
        let (lower_bound, upper_bound) = match option_type {
            OptionType::Call => ((spot - discounted_strike).max(0.0), spot),
            OptionType::Put => ((discounted_strike - spot).max(0.0), discounted_strike),
        };
        if market_price < lower_bound {
            return Err(PricingError::ArbitrageViolation(format!(
                "price {market_price} is below the no-arbitrage floor {lower_bound}"
            )));
        }
        if market_price > upper_bound {
            return Err(PricingError::ArbitrageViolation(format!(
                "price {market_price} exceeds the no-arbitrage cap {upper_bound}"
            )));
        }

        let price_at = |vol: f64| bs_price(option_type, spot, strike, rate, vol, expiry);

        let mut lo = self.lower;
        let mut hi = self.upper;
        let mut price_lo = price_at(lo);
        let mut price_hi = price_at(hi);
        if !price_lo.is_finite() || !price_hi.is_finite() {
            return Err(PricingError::NumericalError(
                "closed-form price is not finite at the bracket ends".to_string(),
            ));
        }
        if market_price > price_hi + self.precision {
            return Err(PricingError::NumericalError(format!(
                "price {market_price} requires volatility above {}",
                self.upper
            )));
        }

        let mut iterations = 0;
        while price_hi - price_lo >= self.precision {
            if iterations == self.max_iterations {
                let volatility = 0.5 * (lo + hi);
                tracing::warn!(
                    iterations,
                    volatility,
                    spread = price_hi - price_lo,
                    "implied vol bisection hit iteration cap"
                );
                return Ok(ImpliedVolResult {
                    volatility,
                    iterations,
                    converged: false,
                });
            }
            iterations += 1;

            let mid = 0.5 * (lo + hi);
            let price_mid = price_at(mid);
            if price_mid < market_price {
                lo = mid;
                price_lo = price_mid;
            } else {
                hi = mid;
                price_hi = price_mid;
            }
        }

        let volatility = 0.5 * (lo + hi);
        tracing::debug!(iterations, volatility, "implied vol converged");
        Ok(ImpliedVolResult {
            volatility,
            iterations,
            converged: true,
        })
    }
}

/// Implied volatility with the default bracket `[1e-5, 200]` and a custom precision.
///
/// # Examples
/// ```
/// use openvanilla::core::{ContractSpec, OptionType};
/// use openvanilla::engines::analytic::bs_price;
/// use openvanilla::vol::implied_vol;
///
/// let sigma = 0.25;
/// let price = bs_price(OptionType::Call, 100.0, 105.0, 0.02, sigma, 1.0);
/// let spec = ContractSpec::new(OptionType::Call, 100.0, 105.0, 0.02, 0.0, 1.0);
/// let iv = implied_vol(&spec, price, 1e-8).unwrap();
/// assert!((iv - sigma).abs() < 1e-6);
/// ```
pub fn implied_vol(
    contract: &ContractSpec,
    market_price: f64,
    precision: f64,
) -> Result<f64, PricingError> {
    ImpliedVolSolver::default()
        .with_precision(precision)
        .solve(contract, market_price)
        .map(|res| res.volatility)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn spec(option_type: OptionType, strike: f64) -> ContractSpec {
        ContractSpec::new(option_type, 100.0, strike, 0.03, 0.0, 0.75)
    }

    #[test]
    fn round_trips_across_strikes_and_sides() {
        for option_type in [OptionType::Call, OptionType::Put] {
            for strike in [80.0, 100.0, 120.0] {
                for sigma in [0.1, 0.35, 0.8] {
                    let c = spec(option_type, strike);
                    let price = bs_price(option_type, 100.0, strike, 0.03, sigma, 0.75);
                    let res = ImpliedVolSolver::default()
                        .with_precision(1e-10)
                        .solve(&c, price)
                        .unwrap();
                    assert!(res.converged);
                    assert_abs_diff_eq!(res.volatility, sigma, epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn price_below_intrinsic_is_arbitrage() {
        let c = spec(OptionType::Call, 80.0);
        let floor = 100.0 - 80.0 * (-0.03_f64 * 0.75).exp();
        let err = implied_vol(&c, floor - 0.01, 1e-6).unwrap_err();
        assert!(matches!(err, PricingError::ArbitrageViolation(_)));

        let put = spec(OptionType::Put, 120.0);
        let err = implied_vol(&put, 1.0, 1e-6).unwrap_err();
        assert!(matches!(err, PricingError::ArbitrageViolation(_)));
    }

    #[test]
    fn call_price_above_spot_is_arbitrage() {
        let err = implied_vol(&spec(OptionType::Call, 100.0), 100.5, 1e-6).unwrap_err();
        assert!(matches!(err, PricingError::ArbitrageViolation(_)));
    }

    #[test]
    fn invalid_contract_is_input_error() {
        let err = implied_vol(&spec(OptionType::Call, 100.0).with_spot(-1.0), 5.0, 1e-6)
            .unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }

    #[test]
    fn iteration_cap_bounds_the_search() {
        let c = spec(OptionType::Call, 100.0);
        let price = bs_price(OptionType::Call, 100.0, 100.0, 0.03, 0.3, 0.75);
        let res = ImpliedVolSolver::default()
            .with_precision(1e-12)
            .with_max_iterations(5)
            .solve(&c, price)
            .unwrap();
        assert!(!res.converged);
        assert_eq!(res.iterations, 5);
    }
}
