//! Monte Carlo pricing engines.

pub mod mc_engine;

pub use mc_engine::{MonteCarloEngine, MonteCarloPrices, expected_payoff_profile};
