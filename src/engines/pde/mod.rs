//! Finite-difference PDE pricing engines on a uniform spot grid.

pub mod explicit_fd;
mod fd_common;
pub mod implicit_fd;

pub use explicit_fd::{EXPLICIT_STABILITY_LIMIT, ExplicitFdEngine};
pub use fd_common::{DEFAULT_S_MAX_MULTIPLIER, ValueSurface};
pub use implicit_fd::ImplicitFdEngine;

use crate::core::{ContractSpec, FdScheme, PricingError};

/// Solves the value surface of `contract` with the chosen scheme.
///
/// # Examples
/// ```
/// use openvanilla::core::{ContractSpec, FdScheme, OptionType};
/// use openvanilla::engines::pde::solve_surface;
///
/// let spec = ContractSpec::new(OptionType::Put, 100.0, 100.0, 0.02, 0.2, 0.5);
/// let surface = solve_surface(&spec, 200.0, 100, 100, FdScheme::Implicit).unwrap();
/// assert!((surface.price_at(100.0) - 5.13).abs() < 0.1);
/// ```
pub fn solve_surface(
    contract: &ContractSpec,
    s_max: f64,
    space_steps: usize,
    time_steps: usize,
    scheme: FdScheme,
) -> Result<ValueSurface, PricingError> {
    match scheme {
        FdScheme::Explicit => ExplicitFdEngine::new(space_steps, time_steps)
            .with_s_max(s_max)
            .solve(contract),
        FdScheme::Implicit => ImplicitFdEngine::new(space_steps, time_steps)
            .with_s_max(s_max)
            .solve(contract),
    }
}
