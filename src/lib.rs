//! OpenVanilla is a European option pricing library: closed-form Black-Scholes values and
//! Greeks, implied volatility, GBM Monte Carlo, explicit and implicit finite differences, and
//! multi-leg strategy analysis over one shared contract type.
//!
//! Every operation is a pure function of its inputs. Randomness is always seeded by the
//! caller, and invalid inputs come back as a typed [`core::PricingError`] before any grid or
//! path work starts.
//!
//! References used across modules include:
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 15 and 21.
//! - Glasserman (2004) for Monte Carlo estimators.
//! - Wilmott, *Paul Wilmott Introduces Quantitative Finance*, Ch. 28 for finite differences.
//!
//! Numerical considerations:
//! - The explicit scheme is conditionally stable and refuses grids with `α_max > 0.5`; the
//!   implicit scheme has no such limit but costs a tridiagonal solve per time layer.
//! - Monte Carlo accuracy is sampling-driven; results carry standard errors.
//! - Implied-volatility bisection is bracketed on `[1e-5, 200]` with an iteration cap.
//!
//! # Feature Flags
//! - `parallel` (default): Rayon fan-out across Monte Carlo paths and across the spot nodes
//!   of each explicit finite-difference layer.
//!
//! # Quick Start
//! Price a call and its put and check parity:
//! ```rust
//! use openvanilla::core::{ContractSpec, OptionType};
//! use openvanilla::pricing::price_analytic;
//!
//! let call = ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.02, 0.20, 0.5);
//! let put = call.with_option_type(OptionType::Put);
//! let c = price_analytic(&call).unwrap().price;
//! let p = price_analytic(&put).unwrap().price;
//! assert!((c - p - (100.0 - 100.0 * (-0.01_f64).exp())).abs() < 1e-9);
//! ```
//!
//! Monte Carlo from a fixed seed:
//! ```rust
//! use openvanilla::core::{ContractSpec, OptionType};
//! use openvanilla::pricing::price_monte_carlo;
//!
//! let spec = ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.02, 0.20, 0.5);
//! let mc = price_monte_carlo(&spec, 1, 20_000, 7).unwrap();
//! assert!((mc.call - 6.12).abs() < 4.0 * mc.call_stderr + 0.01);
//! ```
//!
//! The explicit scheme's stability gate:
//! ```rust
//! use openvanilla::core::{ContractSpec, FdScheme, OptionType, PricingError};
//! use openvanilla::pricing::price_finite_difference;
//!
//! let spec = ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.05, 0.5, 1.0);
//! let err = price_finite_difference(&spec, 200.0, 50, 10, FdScheme::Explicit).unwrap_err();
//! assert!(matches!(err, PricingError::StabilityViolation(_)));
//! ```

pub mod core;
pub mod engines;
pub mod math;
pub mod mc;
pub mod pricing;
pub mod risk;
pub mod strategy;
pub mod vol;
