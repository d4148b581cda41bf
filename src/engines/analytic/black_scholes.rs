use crate::core::{
    ContractSpec, DiagKey, Diagnostics, Greeks, OptionType, PricingEngine, PricingError,
    PricingResult,
};
use crate::math::{normal_cdf, normal_pdf};

/// Analytic Black-Scholes engine for European vanilla options.
#[derive(Debug, Clone, Default)]
pub struct BlackScholesEngine;

impl BlackScholesEngine {
    /// Creates a Black-Scholes engine instance.
    pub fn new() -> Self {
        Self
    }
}

#[inline]
pub fn d1_d2(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> (f64, f64) {
    let sig_sqrt_t = vol * expiry.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * expiry) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// Closed-form price kernel. Inputs are assumed valid (`spot, strike, vol, expiry > 0`);
/// use [`BlackScholesEngine`] for the checked path.
#[inline]
pub fn bs_price(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    let (d1, d2) = d1_d2(spot, strike, rate, vol, expiry);
    let df = (-rate * expiry).exp();
    match option_type {
        OptionType::Call => spot * normal_cdf(d1) - strike * df * normal_cdf(d2),
        OptionType::Put => strike * df * normal_cdf(-d2) - spot * normal_cdf(-d1),
    }
}

#[inline]
pub fn bs_delta(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    let (d1, _) = d1_d2(spot, strike, rate, vol, expiry);
    match option_type {
        OptionType::Call => normal_cdf(d1),
        OptionType::Put => normal_cdf(d1) - 1.0,
    }
}

#[inline]
pub fn bs_gamma(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> f64 {
    let (d1, _) = d1_d2(spot, strike, rate, vol, expiry);
    normal_pdf(d1) / (spot * vol * expiry.sqrt())
}

#[inline]
pub fn bs_vega(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> f64 {
    let (d1, _) = d1_d2(spot, strike, rate, vol, expiry);
    spot * normal_pdf(d1) * expiry.sqrt()
}

#[inline]
pub fn bs_theta(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    let (d1, d2) = d1_d2(spot, strike, rate, vol, expiry);
    let df = (-rate * expiry).exp();
    let decay = -spot * normal_pdf(d1) * vol / (2.0 * expiry.sqrt());
    match option_type {
        OptionType::Call => decay - rate * strike * df * normal_cdf(d2),
        OptionType::Put => decay + rate * strike * df * normal_cdf(-d2),
    }
}

#[inline]
pub fn bs_rho(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    let (_, d2) = d1_d2(spot, strike, rate, vol, expiry);
    let df = (-rate * expiry).exp();
    match option_type {
        OptionType::Call => strike * expiry * df * normal_cdf(d2),
        OptionType::Put => -strike * expiry * df * normal_cdf(-d2),
    }
}

impl PricingEngine for BlackScholesEngine {
    fn price(&self, contract: &ContractSpec) -> Result<PricingResult, PricingError> {
        contract.validate()?;

        let ContractSpec {
            option_type,
            spot,
            strike,
            rate,
            volatility: vol,
            expiry,
            ..
        } = *contract;

        let price = bs_price(option_type, spot, strike, rate, vol, expiry);
        if !price.is_finite() {
            return Err(PricingError::NumericalError(format!(
                "closed-form price is not finite: {price}"
            )));
        }

        let greeks = Greeks {
            delta: bs_delta(option_type, spot, strike, rate, vol, expiry),
            gamma: bs_gamma(spot, strike, rate, vol, expiry),
            vega: bs_vega(spot, strike, rate, vol, expiry),
            theta: bs_theta(option_type, spot, strike, rate, vol, expiry),
            rho: bs_rho(option_type, spot, strike, rate, vol, expiry),
        };

        let (d1, d2) = d1_d2(spot, strike, rate, vol, expiry);
        let mut diagnostics = Diagnostics::new();
        diagnostics.insert(DiagKey::D1, d1);
        diagnostics.insert(DiagKey::D2, d2);
        diagnostics.insert(DiagKey::DiscountFactor, contract.discount_factor());
        diagnostics.insert(DiagKey::Vol, vol);

        Ok(PricingResult {
            price,
            stderr: None,
            greeks: Some(greeks),
            diagnostics,
        })
    }
}
