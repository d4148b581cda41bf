//! Stateless request/response pricing operations, the engine defaults they fall back to,
//! and the tagged request dispatcher.

pub mod config;
pub mod european;
pub mod evolution;
pub mod request;

pub use crate::core::types::OptionType;
pub use config::EngineConfig;
pub use european::{
    evaluate_strategies, implied_volatility, price_analytic, price_finite_difference,
    price_monte_carlo, select_optimal_strategy, simulate_paths,
};
pub use evolution::{EvolutionPoint, price_evolution};
pub use request::{PricingRequest, PricingResponse, SurfaceResult, handle_request};
