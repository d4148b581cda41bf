//! Volatility tooling: implied-volatility inversion against the closed-form pricer.

pub mod implied;

pub use implied::{ImpliedVolResult, ImpliedVolSolver, implied_vol};
