//! Module `engines::monte_carlo::mc_engine`.
//!
//! Discounted expected-payoff estimation over simulated GBM terminal prices. Calls and puts
//! are read off the same batch so their estimates share sampling noise.
//!
//! The estimator's standard error scales as `σ_payoff / √I`: accuracy improves only by
//! adding paths. The engine never resizes the batch on its own; `stderr` in the result is
//! the caller's guide for choosing `num_paths`. Time steps do not change the terminal law
//! (the recurrence is exact in log space) but are kept so paths match [`simulate_paths`].
//!
//! [`simulate_paths`]: crate::mc::simulate_paths

use serde::{Deserialize, Serialize};

use crate::core::{
    ContractSpec, DiagKey, Diagnostics, OptionType, PricingEngine, PricingError, PricingResult,
};
use crate::mc::{GbmPathGenerator, PathSet};

/// Monte Carlo engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloEngine {
    /// Time steps per path `M`.
    pub time_steps: usize,
    /// Number of simulated paths `I`.
    pub num_paths: usize,
    /// Batch seed.
    pub seed: u64,
}

impl Default for MonteCarloEngine {
    fn default() -> Self {
        Self {
            time_steps: 252,
            num_paths: 100_000,
            seed: 42,
        }
    }
}

/// Call and put estimates from one batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloPrices {
    pub call: f64,
    pub put: f64,
    pub call_stderr: f64,
    pub put_stderr: f64,
    pub num_paths: usize,
    pub time_steps: usize,
}

impl MonteCarloPrices {
    pub fn price(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.call,
            OptionType::Put => self.put,
        }
    }

    pub fn stderr(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.call_stderr,
            OptionType::Put => self.put_stderr,
        }
    }
}

#[derive(Default)]
struct Moments {
    sum: f64,
    sum_sq: f64,
}

impl Moments {
    fn push(&mut self, x: f64) {
        self.sum += x;
        self.sum_sq += x * x;
    }

    /// Discounted mean and its standard error.
    fn estimate(&self, n: usize, discount: f64) -> (f64, f64) {
        let n_f = n as f64;
        let mean = self.sum / n_f;
        let var = if n > 1 {
            ((self.sum_sq - n_f * mean * mean) / (n_f - 1.0)).max(0.0)
        } else {
            0.0
        };
        (discount * mean, discount * (var / n_f).sqrt())
    }
}

fn estimate_from_terminals(
    terminals: &[f64],
    strike: f64,
    discount: f64,
    time_steps: usize,
) -> MonteCarloPrices {
    let mut call = Moments::default();
    let mut put = Moments::default();
    for &s in terminals {
        call.push(OptionType::Call.payoff(s, strike));
        put.push(OptionType::Put.payoff(s, strike));
    }
    let n = terminals.len();
    let (call_px, call_se) = call.estimate(n, discount);
    let (put_px, put_se) = put.estimate(n, discount);
    MonteCarloPrices {
        call: call_px,
        put: put_px,
        call_stderr: call_se,
        put_stderr: put_se,
        num_paths: n,
        time_steps,
    }
}

impl MonteCarloEngine {
    pub fn new(time_steps: usize, num_paths: usize, seed: u64) -> Self {
        Self {
            time_steps,
            num_paths,
            seed,
        }
    }

    fn validate(&self) -> Result<(), PricingError> {
        if self.num_paths < 1 {
            return Err(PricingError::InvalidInput(
                "path count must be >= 1".to_string(),
            ));
        }
        if self.time_steps < 1 {
            return Err(PricingError::InvalidInput(
                "time steps must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Prices the call and the put on `contract`'s strike from one simulated batch.
    ///
    /// `contract.option_type` is ignored; a zero volatility is accepted.
    ///
    /// # Errors
    /// [`PricingError::InvalidInput`] when `num_paths < 1`, `time_steps < 1`, or the
    /// contract fails validation.
    pub fn price_call_put(&self, contract: &ContractSpec) -> Result<MonteCarloPrices, PricingError> {
        self.validate()?;
        contract.validate_without_vol()?;
        let generator = GbmPathGenerator::new(
            contract.spot,
            contract.rate,
            contract.volatility,
            contract.expiry,
            self.time_steps,
        );
        generator.validate()?;

        tracing::debug!(
            num_paths = self.num_paths,
            time_steps = self.time_steps,
            seed = self.seed,
            "monte carlo pricing"
        );
        let terminals = generator.terminal_values(self.num_paths, self.seed);
        Ok(estimate_from_terminals(
            &terminals,
            contract.strike,
            contract.discount_factor(),
            self.time_steps,
        ))
    }

    /// Prices call and put from an already simulated [`PathSet`].
    pub fn price_path_set(
        paths: &PathSet,
        strike: f64,
        rate: f64,
    ) -> Result<MonteCarloPrices, PricingError> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "strike must be finite and > 0, got {strike}"
            )));
        }
        let discount = (-rate * paths.maturity()).exp();
        Ok(estimate_from_terminals(
            paths.terminal(),
            strike,
            discount,
            paths.num_steps(),
        ))
    }
}

impl PricingEngine for MonteCarloEngine {
    fn price(&self, contract: &ContractSpec) -> Result<PricingResult, PricingError> {
        let prices = self.price_call_put(contract)?;

        let mut diagnostics = Diagnostics::new();
        diagnostics.insert(DiagKey::NumPaths, self.num_paths as f64);
        diagnostics.insert(DiagKey::NumTimeSteps, self.time_steps as f64);
        diagnostics.insert(DiagKey::DiscountFactor, contract.discount_factor());
        diagnostics.insert(DiagKey::Vol, contract.volatility);

        Ok(PricingResult {
            price: prices.price(contract.option_type),
            stderr: Some(prices.stderr(contract.option_type)),
            greeks: None,
            diagnostics,
        })
    }
}

/// Mean of `e^{-r(T-t)}·payoff(S_t)` at each time step of `paths`.
///
/// Returns `(t, value)` pairs for `t = 0, dt, ..., T`. The factor discounts to maturity, not
/// to today, so the last entry is the undiscounted expected terminal payoff: the Monte Carlo
/// price is that entry times `e^{-rT}`.
pub fn expected_payoff_profile(
    paths: &PathSet,
    option_type: OptionType,
    strike: f64,
    rate: f64,
) -> Vec<(f64, f64)> {
    let maturity = paths.maturity();
    (0..=paths.num_steps())
        .map(|t| {
            let time = paths.time_at(t);
            let discount = (-rate * (maturity - time)).exp();
            let slice = paths.time_slice(t);
            let mean =
                slice.iter().map(|&s| option_type.payoff(s, strike)).sum::<f64>() / slice.len() as f64;
            (time, discount * mean)
        })
        .collect()
}
