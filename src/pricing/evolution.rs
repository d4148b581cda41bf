use serde::{Deserialize, Serialize};

use crate::core::{ContractSpec, PricingError};
use crate::engines::analytic::bs_price;
use crate::math::linspace;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolutionPoint {
    /// Years elapsed since valuation.
    pub elapsed: f64,
    /// Years left to expiry.
    pub remaining: f64,
    pub price: f64,
}

/// Closed-form value with spot held fixed at `samples` evenly spaced times over `[0, T]`.
///
/// The last point sits at expiry and carries the intrinsic payoff.
pub fn price_evolution(
    contract: &ContractSpec,
    samples: usize,
) -> Result<Vec<EvolutionPoint>, PricingError> {
    contract.validate()?;
    if samples < 2 {
        return Err(PricingError::InvalidInput(
            "evolution needs at least 2 samples".to_string(),
        ));
    }

    let ContractSpec {
        option_type,
        spot,
        strike,
        rate,
        volatility,
        expiry,
        ..
    } = *contract;

    Ok(linspace(0.0, expiry, samples)
        .into_iter()
        .map(|elapsed| {
            let remaining = (expiry - elapsed).max(0.0);
            let price = if remaining > 0.0 {
                bs_price(option_type, spot, strike, rate, volatility, remaining)
            } else {
                option_type.payoff(spot, strike)
            };
            EvolutionPoint {
                elapsed,
                remaining,
                price,
            }
        })
        .collect())
}
