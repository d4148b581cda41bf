//! Serde request/response payloads for the pricing operations.
//!
//! A [`PricingRequest`] is tagged by `operation`; [`handle_request`] runs it with defaults
//! from an [`EngineConfig`] and returns the matching [`PricingResponse`].
//!
//! # Examples
//! ```rust
//! use openvanilla::core::from_json;
//! use openvanilla::pricing::{EngineConfig, PricingRequest, PricingResponse, handle_request};
//!
//! let request: PricingRequest = from_json(
//!     r#"{
//!         "operation": "price_analytic",
//!         "contract": {
//!             "option_type": "call", "spot": 100.0, "strike": 100.0,
//!             "rate": 0.02, "volatility": 0.2,
//!             "valuation_date": "2025-01-01", "expiration_date": "2025-07-02"
//!         }
//!     }"#,
//! )
//! .unwrap();
//!
//! match handle_request(&EngineConfig::default(), &request).unwrap() {
//!     PricingResponse::PriceAnalytic(res) => assert!((res.price - 6.12).abs() < 0.05),
//!     other => panic!("unexpected response {other:?}"),
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{ContractInput, FdScheme, PricingError, PricingResult};
use crate::engines::monte_carlo::{MonteCarloEngine, MonteCarloPrices};
use crate::engines::pde::{ExplicitFdEngine, ImplicitFdEngine, ValueSurface};
use crate::mc::{PathSet, simulate_paths};
use crate::pricing::{EngineConfig, EvolutionPoint, price_analytic, price_evolution};
use crate::risk::{
    OptimizedBook, ScenarioReport, SensitivityPoint, VolatilityCurve, default_shifts,
    optimize_option_book, scenario_analysis, spot_sensitivity, volatility_comparison,
};
use crate::strategy::{SpotRange, StrategyCurve, StrategySelection, evaluate_strategies, select_strategy};
use crate::vol::ImpliedVolResult;

/// One pricing operation. Optional fields fall back to [`EngineConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum PricingRequest {
    PriceAnalytic {
        contract: ContractInput,
    },
    ImpliedVolatility {
        contract: ContractInput,
        observed_price: f64,
        #[serde(default)]
        precision: Option<f64>,
    },
    SimulatePaths {
        s0: f64,
        rate: f64,
        sigma: f64,
        maturity: f64,
        steps: usize,
        num_paths: usize,
        #[serde(default)]
        seed: Option<u64>,
    },
    PriceMonteCarlo {
        contract: ContractInput,
        #[serde(default)]
        steps: Option<usize>,
        #[serde(default)]
        num_paths: Option<usize>,
        #[serde(default)]
        seed: Option<u64>,
    },
    PriceFiniteDifference {
        contract: ContractInput,
        scheme: FdScheme,
        #[serde(default)]
        s_max: Option<f64>,
        #[serde(default)]
        space_steps: Option<usize>,
        #[serde(default)]
        time_steps: Option<usize>,
    },
    EvaluateStrategies {
        contract: ContractInput,
        #[serde(default)]
        range: Option<SpotRange>,
    },
    SelectOptimalStrategy {
        contract: ContractInput,
    },
    PriceEvolution {
        contract: ContractInput,
        #[serde(default)]
        samples: Option<usize>,
    },
    SpotSensitivity {
        contract: ContractInput,
        #[serde(default)]
        range: Option<SpotRange>,
    },
    VolatilityComparison {
        contract: ContractInput,
        volatilities: Vec<f64>,
        #[serde(default)]
        range: Option<SpotRange>,
    },
    ScenarioAnalysis {
        contract: ContractInput,
        #[serde(default)]
        shifts: Option<Vec<f64>>,
    },
    OptimizeBook {
        count: usize,
        #[serde(default)]
        seed: Option<u64>,
    },
}

/// Finite-difference output: the price at spot plus the full surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceResult {
    pub scheme: FdScheme,
    pub result: PricingResult,
    pub surface: ValueSurface,
}

/// Result payload tagged by the operation that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "result", rename_all = "snake_case")]
pub enum PricingResponse {
    PriceAnalytic(PricingResult),
    ImpliedVolatility(ImpliedVolResult),
    SimulatePaths(PathSet),
    PriceMonteCarlo(MonteCarloPrices),
    PriceFiniteDifference(SurfaceResult),
    EvaluateStrategies(Vec<StrategyCurve>),
    SelectOptimalStrategy(StrategySelection),
    PriceEvolution(Vec<EvolutionPoint>),
    SpotSensitivity(Vec<SensitivityPoint>),
    VolatilityComparison(Vec<VolatilityCurve>),
    ScenarioAnalysis(ScenarioReport),
    OptimizeBook(OptimizedBook),
}

fn range_or_default(range: Option<SpotRange>, spot: f64, samples: usize) -> SpotRange {
    range.unwrap_or_else(|| SpotRange::new(0.5 * spot, 1.5 * spot, samples))
}

/// Runs `request`, filling omitted parameters from `config`.
pub fn handle_request(
    config: &EngineConfig,
    request: &PricingRequest,
) -> Result<PricingResponse, PricingError> {
    use PricingRequest as Req;
    use PricingResponse as Resp;

    Ok(match request {
        Req::PriceAnalytic { contract } => {
            Resp::PriceAnalytic(price_analytic(&contract.resolve()?)?)
        }
        Req::ImpliedVolatility {
            contract,
            observed_price,
            precision,
        } => {
            let mut solver = config.implied_vol;
            if let Some(precision) = precision {
                solver = solver.with_precision(*precision);
            }
            Resp::ImpliedVolatility(solver.solve(&contract.resolve()?, *observed_price)?)
        }
        Req::SimulatePaths {
            s0,
            rate,
            sigma,
            maturity,
            steps,
            num_paths,
            seed,
        } => Resp::SimulatePaths(simulate_paths(
            *s0,
            *rate,
            *sigma,
            *maturity,
            *steps,
            *num_paths,
            seed.unwrap_or(config.monte_carlo.seed),
        )?),
        Req::PriceMonteCarlo {
            contract,
            steps,
            num_paths,
            seed,
        } => {
            let defaults = config.monte_carlo;
            let engine = MonteCarloEngine::new(
                steps.unwrap_or(defaults.time_steps),
                num_paths.unwrap_or(defaults.num_paths),
                seed.unwrap_or(defaults.seed),
            );
            Resp::PriceMonteCarlo(engine.price_call_put(&contract.resolve()?)?)
        }
        Req::PriceFiniteDifference {
            contract,
            scheme,
            s_max,
            space_steps,
            time_steps,
        } => {
            let spec = contract.resolve()?;
            let (surface, result) = match scheme {
                FdScheme::Explicit => {
                    let defaults = config.explicit_fd;
                    let engine = ExplicitFdEngine {
                        space_steps: space_steps.unwrap_or(defaults.space_steps),
                        time_steps: time_steps.unwrap_or(defaults.time_steps),
                        s_max: s_max.or(defaults.s_max),
                    };
                    engine.solve_and_price(&spec)?
                }
                FdScheme::Implicit => {
                    let defaults = config.implicit_fd;
                    let engine = ImplicitFdEngine {
                        space_steps: space_steps.unwrap_or(defaults.space_steps),
                        time_steps: time_steps.unwrap_or(defaults.time_steps),
                        s_max: s_max.or(defaults.s_max),
                    };
                    engine.solve_and_price(&spec)?
                }
            };
            Resp::PriceFiniteDifference(SurfaceResult {
                scheme: *scheme,
                result,
                surface,
            })
        }
        Req::EvaluateStrategies { contract, range } => {
            let spec = contract.resolve()?;
            let range = range_or_default(*range, spec.spot, config.strategy_samples);
            Resp::EvaluateStrategies(evaluate_strategies(&spec, &range)?)
        }
        Req::SelectOptimalStrategy { contract } => {
            Resp::SelectOptimalStrategy(select_strategy(&contract.resolve()?, &config.selector)?)
        }
        Req::PriceEvolution { contract, samples } => Resp::PriceEvolution(price_evolution(
            &contract.resolve()?,
            samples.unwrap_or(config.evolution_samples),
        )?),
        Req::SpotSensitivity { contract, range } => {
            let spec = contract.resolve()?;
            let range = range_or_default(*range, spec.spot, config.sensitivity_samples);
            Resp::SpotSensitivity(spot_sensitivity(&spec, &range)?)
        }
        Req::VolatilityComparison {
            contract,
            volatilities,
            range,
        } => {
            let spec = contract.resolve()?;
            let range = range_or_default(*range, spec.spot, config.sensitivity_samples);
            Resp::VolatilityComparison(volatility_comparison(&spec, volatilities, &range)?)
        }
        Req::ScenarioAnalysis { contract, shifts } => {
            let shifts = shifts.clone().unwrap_or_else(default_shifts);
            Resp::ScenarioAnalysis(scenario_analysis(&contract.resolve()?, &shifts)?)
        }
        Req::OptimizeBook { count, seed } => Resp::OptimizeBook(optimize_option_book(
            *count,
            seed.unwrap_or(config.book_seed),
        )?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ContractSpec, OptionType};

    fn call_input() -> ContractInput {
        ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.02, 0.2, 0.5).into()
    }

    #[test]
    fn request_tags_are_snake_case() {
        let request = PricingRequest::SelectOptimalStrategy {
            contract: call_input(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["operation"], "select_optimal_strategy");
        assert_eq!(json["contract"]["option_type"], "call");
    }

    #[test]
    fn finite_difference_defaults_come_from_config() {
        let request = PricingRequest::PriceFiniteDifference {
            contract: call_input(),
            scheme: FdScheme::Implicit,
            s_max: Some(200.0),
            space_steps: None,
            time_steps: None,
        };
        match handle_request(&EngineConfig::default(), &request).unwrap() {
            PricingResponse::PriceFiniteDifference(out) => {
                assert_eq!(out.surface.space_steps(), 200);
                assert_eq!(out.surface.time_steps(), 200);
                assert_eq!(out.result.price, out.surface.price_at(100.0));
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn errors_propagate_with_their_kind() {
        let request = PricingRequest::PriceFiniteDifference {
            contract: ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.05, 0.5, 1.0).into(),
            scheme: FdScheme::Explicit,
            s_max: Some(200.0),
            space_steps: Some(50),
            time_steps: Some(10),
        };
        let err = handle_request(&EngineConfig::default(), &request).unwrap_err();
        assert!(matches!(err, PricingError::StabilityViolation(_)));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "stability_violation");
    }
}
