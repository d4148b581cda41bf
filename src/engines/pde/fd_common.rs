use serde::{Deserialize, Serialize};

use crate::core::{ContractSpec, OptionType, PricingError};

/// `S_max = DEFAULT_S_MAX_MULTIPLIER * max(spot, strike)` when an engine has no explicit bound.
pub const DEFAULT_S_MAX_MULTIPLIER: f64 = 2.0;

/// Uniform grid `S_i = i·ds`, `t_j = j·dt` with the dimensions both schemes share.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct UniformGrid {
    pub space_steps: usize,
    pub time_steps: usize,
    pub s_max: f64,
    pub expiry: f64,
}

impl UniformGrid {
    pub fn new(
        space_steps: usize,
        time_steps: usize,
        s_max: f64,
        expiry: f64,
    ) -> Result<Self, PricingError> {
        if space_steps < 2 {
            return Err(PricingError::InvalidInput(
                "space_steps must be >= 2".to_string(),
            ));
        }
        if time_steps == 0 {
            return Err(PricingError::InvalidInput(
                "time_steps must be > 0".to_string(),
            ));
        }
        if s_max <= 0.0 || !s_max.is_finite() {
            return Err(PricingError::InvalidInput(
                "s_max must be finite and > 0".to_string(),
            ));
        }
        Ok(Self {
            space_steps,
            time_steps,
            s_max,
            expiry,
        })
    }

    #[inline]
    pub fn ds(&self) -> f64 {
        self.s_max / self.space_steps as f64
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.expiry / self.time_steps as f64
    }

    /// Width of one time layer.
    #[inline]
    pub fn nodes(&self) -> usize {
        self.space_steps + 1
    }

    pub fn spots(&self) -> Vec<f64> {
        let ds = self.ds();
        let mut spots: Vec<f64> = (0..self.nodes()).map(|i| i as f64 * ds).collect();
        spots[self.space_steps] = self.s_max;
        spots
    }

    pub fn times(&self) -> Vec<f64> {
        let dt = self.dt();
        let mut times: Vec<f64> = (0..=self.time_steps).map(|j| j as f64 * dt).collect();
        times[self.time_steps] = self.expiry;
        times
    }

    /// Allocates the surface with the terminal payoff already written into layer `M`.
    pub fn terminal_surface(&self, option_type: OptionType, strike: f64) -> ValueSurface {
        let spots = self.spots();
        let times = self.times();
        let width = self.nodes();
        let mut values = vec![0.0_f64; width * (self.time_steps + 1)];
        let last = self.time_steps * width;
        for (v, &s) in values[last..].iter_mut().zip(&spots) {
            *v = option_type.payoff(s, strike);
        }
        ValueSurface {
            spots,
            times,
            values,
        }
    }
}

/// Dirichlet values `(V[0,j], V[N,j])` with `tau = T - t_j` remaining.
pub(super) fn boundary_values(
    option_type: OptionType,
    strike: f64,
    rate: f64,
    s_max: f64,
    tau: f64,
) -> (f64, f64) {
    let discounted_strike = strike * (-rate * tau).exp();
    match option_type {
        OptionType::Call => (0.0, s_max - discounted_strike),
        OptionType::Put => (discounted_strike, 0.0),
    }
}

/// Largest diffusion number on the interior, `0.5σ²(N-1)²dt`.
pub(super) fn explicit_alpha_max(vol: f64, space_steps: usize, dt: f64) -> f64 {
    let i_max = (space_steps - 1) as f64;
    0.5 * vol * vol * i_max * i_max * dt
}

/// Resolves and checks the spot truncation bound for `contract`.
pub(super) fn resolve_s_max(s_max: Option<f64>, contract: &ContractSpec) -> Result<f64, PricingError> {
    let s_max =
        s_max.unwrap_or(DEFAULT_S_MAX_MULTIPLIER * contract.spot.max(contract.strike));
    if !s_max.is_finite() || s_max <= 0.0 {
        return Err(PricingError::InvalidInput(
            "s_max must be finite and > 0".to_string(),
        ));
    }
    if contract.spot > s_max {
        return Err(PricingError::InvalidInput(format!(
            "spot {} lies above the grid bound s_max={s_max}",
            contract.spot
        )));
    }
    Ok(s_max)
}

/// Option values on the full space-time grid.
///
/// `get(i, j)` is the value at spot `S_i = i·ds` and calendar time `t_j = j·dt`, so layer
/// `0` is today and layer `M` holds the terminal payoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSurface {
    spots: Vec<f64>,
    times: Vec<f64>,
    /// Time-major storage: `values[j * spots.len() + i]`.
    values: Vec<f64>,
}

impl ValueSurface {
    pub fn spots(&self) -> &[f64] {
        &self.spots
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of spatial intervals `N`.
    pub fn space_steps(&self) -> usize {
        self.spots.len() - 1
    }

    /// Number of time steps `M`.
    pub fn time_steps(&self) -> usize {
        self.times.len() - 1
    }

    /// # Panics
    /// Panics when `i > N` or `j > M`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.spots.len() && j < self.times.len(),
            "value surface index out of range"
        );
        self.values[j * self.spots.len() + i]
    }

    /// All spot nodes at time layer `j`.
    pub fn layer(&self, j: usize) -> &[f64] {
        let width = self.spots.len();
        &self.values[j * width..(j + 1) * width]
    }

    /// Values today (`t = 0`).
    pub fn initial_layer(&self) -> &[f64] {
        self.layer(0)
    }

    /// Values at expiry, i.e. the payoff.
    pub fn terminal_layer(&self) -> &[f64] {
        self.layer(self.time_steps())
    }

    /// Today's value at an arbitrary spot, linearly interpolated between nodes and clamped
    /// to the grid ends.
    pub fn price_at(&self, spot: f64) -> f64 {
        interpolate_on_grid(spot, &self.spots, self.initial_layer())
    }

    /// Central-difference delta on today's layer at the node nearest to `spot`.
    pub fn delta_at(&self, spot: f64) -> f64 {
        let n = self.space_steps();
        let ds = self.spots[1] - self.spots[0];
        let i = ((spot / ds).round() as usize).clamp(1, n - 1);
        let layer = self.initial_layer();
        (layer[i + 1] - layer[i - 1]) / (2.0 * ds)
    }

    /// Splits the storage around layer `j` so it can be written from layer `j + 1`.
    pub(super) fn layer_pair_mut(&mut self, j: usize) -> (&mut [f64], &[f64]) {
        let width = self.spots.len();
        let (head, tail) = self.values.split_at_mut((j + 1) * width);
        (&mut head[j * width..], &tail[..width])
    }

    pub(super) fn ensure_finite(&self) -> Result<(), PricingError> {
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(PricingError::NumericalError(
                "finite-difference surface contains non-finite values".to_string(),
            ));
        }
        Ok(())
    }
}

fn interpolate_on_grid(spot: f64, grid: &[f64], values: &[f64]) -> f64 {
    debug_assert_eq!(grid.len(), values.len());

    if spot <= grid[0] {
        return values[0];
    }
    let n = grid.len() - 1;
    if spot >= grid[n] {
        return values[n];
    }

    let hi = grid.partition_point(|&x| x < spot).clamp(1, n);
    let lo = hi - 1;
    let w = (spot - grid[lo]) / (grid[hi] - grid[lo]);
    (1.0 - w) * values[lo] + w * values[hi]
}
