//! Geometric Brownian motion path simulation.
//!
//! Paths use the exact-in-log recurrence
//! `S_t = S_{t-1} · exp((r - σ²/2)·dt + σ·√dt·Z_t)`, so no boundary handling is needed.
//! Each path owns an RNG stream derived from the batch seed and the path index, which
//! keeps a batch bit-for-bit reproducible regardless of how paths are spread over threads.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::PricingError;
use crate::math::stream_seed;

/// GBM dynamics and time grid for one simulation batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GbmPathGenerator {
    /// Initial spot.
    pub s0: f64,
    /// Risk-neutral drift.
    pub rate: f64,
    /// Volatility.
    pub vol: f64,
    /// Horizon in years.
    pub maturity: f64,
    /// Number of time steps `M`; paths carry `M + 1` points.
    pub steps: usize,
}

impl GbmPathGenerator {
    pub fn new(s0: f64, rate: f64, vol: f64, maturity: f64, steps: usize) -> Self {
        Self {
            s0,
            rate,
            vol,
            maturity,
            steps,
        }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.s0.is_finite() || self.s0 <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "initial spot must be finite and > 0, got {}",
                self.s0
            )));
        }
        if !self.rate.is_finite() {
            return Err(PricingError::InvalidInput("rate must be finite".to_string()));
        }
        if !self.vol.is_finite() || self.vol < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "volatility must be finite and >= 0, got {}",
                self.vol
            )));
        }
        if !self.maturity.is_finite() || self.maturity <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "maturity must be finite and > 0, got {}",
                self.maturity
            )));
        }
        if self.steps == 0 {
            return Err(PricingError::InvalidInput(
                "time steps must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.maturity / self.steps as f64
    }

    #[inline]
    fn step_terms(&self) -> (f64, f64) {
        let dt = self.dt();
        (
            (self.rate - 0.5 * self.vol * self.vol) * dt,
            self.vol * dt.sqrt(),
        )
    }

    /// Builds the full path from pre-drawn standard normals (one per step).
    pub fn generate_from_normals(&self, normals: &[f64]) -> Vec<f64> {
        let (drift, diffusion) = self.step_terms();
        let mut path = Vec::with_capacity(self.steps + 1);
        let mut s = self.s0;
        path.push(s);
        for &z in normals.iter().take(self.steps) {
            s *= diffusion.mul_add(z, drift).exp();
            path.push(s);
        }
        path
    }

    /// Full path for stream `index` of the batch seeded with `seed`.
    pub fn sample_path(&self, seed: u64, index: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(stream_seed(seed, index as u64));
        let normals: Vec<f64> = (0..self.steps)
            .map(|_| StandardNormal.sample(&mut rng))
            .collect();
        self.generate_from_normals(&normals)
    }

    /// Terminal value of stream `index` without materializing the path.
    ///
    /// Consumes the same draws in the same order as [`GbmPathGenerator::sample_path`].
    pub fn sample_terminal(&self, seed: u64, index: usize) -> f64 {
        let (drift, diffusion) = self.step_terms();
        let mut rng = StdRng::seed_from_u64(stream_seed(seed, index as u64));
        let mut s = self.s0;
        for _ in 0..self.steps {
            let z: f64 = StandardNormal.sample(&mut rng);
            s *= diffusion.mul_add(z, drift).exp();
        }
        s
    }

    /// Terminal values for paths `0..num_paths`, in path order.
    pub fn terminal_values(&self, num_paths: usize, seed: u64) -> Vec<f64> {
        #[cfg(feature = "parallel")]
        let terminals = (0..num_paths)
            .into_par_iter()
            .map(|i| self.sample_terminal(seed, i))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let terminals = (0..num_paths)
            .map(|i| self.sample_terminal(seed, i))
            .collect();
        terminals
    }
}

/// Simulated underlying prices indexed `[time_step][path]`.
///
/// Row `0` is the initial spot for every path; row `num_steps()` holds terminal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSet {
    steps: usize,
    paths: usize,
    maturity: f64,
    /// Time-major storage: `values[t * paths + i]`.
    values: Vec<f64>,
}

impl PathSet {
    /// Number of time steps `M` (rows are `M + 1`).
    pub fn num_steps(&self) -> usize {
        self.steps
    }

    pub fn num_paths(&self) -> usize {
        self.paths
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Calendar time in years of row `t`.
    pub fn time_at(&self, t: usize) -> f64 {
        self.maturity * t as f64 / self.steps as f64
    }

    /// Price of path `path` at time step `t`.
    ///
    /// # Panics
    /// Panics when `t > num_steps()` or `path >= num_paths()`.
    #[inline]
    pub fn get(&self, t: usize, path: usize) -> f64 {
        assert!(t <= self.steps && path < self.paths, "path set index out of range");
        self.values[t * self.paths + path]
    }

    /// All path values at time step `t`.
    pub fn time_slice(&self, t: usize) -> &[f64] {
        let start = t * self.paths;
        &self.values[start..start + self.paths]
    }

    pub fn terminal(&self) -> &[f64] {
        self.time_slice(self.steps)
    }

    /// Copies out a single path across all time steps.
    pub fn path(&self, path: usize) -> Vec<f64> {
        (0..=self.steps).map(|t| self.get(t, path)).collect()
    }

    /// Cross-sectional mean at each time step.
    pub fn mean_by_step(&self) -> Vec<f64> {
        (0..=self.steps)
            .map(|t| self.time_slice(t).iter().sum::<f64>() / self.paths as f64)
            .collect()
    }

    /// Smallest and largest simulated price across the whole set.
    pub fn price_range(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Paths generated per batch before they are written into a [`PathSet`].
const PATH_CHUNK: usize = 4_096;

/// Simulates `num_paths` GBM paths of `steps` steps each.
///
/// # Errors
/// [`PricingError::InvalidInput`] for `s0 <= 0`, `sigma < 0`, `maturity <= 0`,
/// `steps < 1` or `num_paths < 1`, and when `(steps + 1) * num_paths` values cannot be
/// allocated.
///
/// # Examples
/// ```
/// use openvanilla::mc::simulate_paths;
///
/// let paths = simulate_paths(100.0, 0.02, 0.2, 1.0, 12, 64, 7).unwrap();
/// assert_eq!(paths.num_steps(), 12);
/// assert_eq!(paths.num_paths(), 64);
/// assert!(paths.time_slice(0).iter().all(|&s| s == 100.0));
/// ```
pub fn simulate_paths(
    s0: f64,
    rate: f64,
    sigma: f64,
    maturity: f64,
    steps: usize,
    num_paths: usize,
    seed: u64,
) -> Result<PathSet, PricingError> {
    let generator = GbmPathGenerator::new(s0, rate, sigma, maturity, steps);
    generator.validate()?;
    if num_paths == 0 {
        return Err(PricingError::InvalidInput(
            "path count must be >= 1".to_string(),
        ));
    }
    let len = steps
        .checked_add(1)
        .and_then(|rows| rows.checked_mul(num_paths))
        .ok_or_else(|| {
            PricingError::InvalidInput(format!(
                "path set of {num_paths} paths x {steps} steps does not fit in memory"
            ))
        })?;
    let mut values: Vec<f64> = Vec::new();
    values.try_reserve_exact(len).map_err(|e| {
        PricingError::InvalidInput(format!(
            "cannot allocate {num_paths} paths x {steps} steps: {e}"
        ))
    })?;
    values.resize(len, 0.0);
    tracing::debug!(steps, num_paths, seed, "simulating gbm paths");

    // Scratch holds one chunk of path-major draws at a time.
    let mut start = 0;
    while start < num_paths {
        let end = (start + PATH_CHUNK).min(num_paths);
        #[cfg(feature = "parallel")]
        let chunk: Vec<Vec<f64>> = (start..end)
            .into_par_iter()
            .map(|i| generator.sample_path(seed, i))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let chunk: Vec<Vec<f64>> = (start..end)
            .map(|i| generator.sample_path(seed, i))
            .collect();

        for (offset, path) in chunk.iter().enumerate() {
            for (t, &s) in path.iter().enumerate() {
                values[t * num_paths + start + offset] = s;
            }
        }
        start = end;
    }

    Ok(PathSet {
        steps,
        paths: num_paths,
        maturity,
        values,
    })
}
