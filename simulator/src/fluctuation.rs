//! Gaussian fluctuation fields.

use candle_core::{Device, Tensor};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};

/// Draws independent Normal(0, scale) samples, one per grid cell.
pub struct FluctuationSource {
    rng: StdRng,
    normal: Normal<f64>,
}

impl FluctuationSource {
    pub fn from_entropy(scale: f64) -> SimResult<Self> {
        Self::with_rng(StdRng::from_entropy(), scale)
    }

    pub fn seeded(scale: f64, seed: u64) -> SimResult<Self> {
        Self::with_rng(StdRng::seed_from_u64(seed), scale)
    }

    fn with_rng(rng: StdRng, scale: f64) -> SimResult<Self> {
        let normal = Normal::new(0.0, scale)
            .map_err(|e| SimError::InvalidConfiguration(format!("scale {scale}: {e}")))?;
        Ok(Self { rng, normal })
    }

    /// Returns a `[grid_size, grid_size]` tensor of fresh draws, filled
    /// row-major.
    pub fn sample_field(&mut self, config: &SimConfig, device: &Device) -> SimResult<Tensor> {
        let n = config.grid_size;
        let values: Vec<f64> = (0..config.cells())
            .map(|_| self.normal.sample(&mut self.rng))
            .collect();
        Ok(Tensor::from_vec(values, (n, n), device)?)
    }
}
