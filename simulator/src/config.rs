use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Immutable simulator parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawConfig")]
pub struct SimConfig {
    /// Side length of the square grid.
    pub grid_size: usize,
    /// Standard deviation of the per-cell noise (the "Planck length").
    pub scale: f64,
}

#[derive(Deserialize)]
struct RawConfig {
    grid_size: usize,
    scale: f64,
}

impl TryFrom<RawConfig> for SimConfig {
    type Error = SimError;

    fn try_from(raw: RawConfig) -> SimResult<Self> {
        Self::new(raw.grid_size, raw.scale)
    }
}

impl SimConfig {
    pub fn new(grid_size: usize, scale: f64) -> SimResult<Self> {
        if grid_size == 0 {
            return Err(SimError::InvalidConfiguration(
                "grid size must be positive, got 0".to_string(),
            ));
        }
        let fits = grid_size
            .checked_mul(grid_size)
            .and_then(|cells| cells.checked_mul(std::mem::size_of::<f64>()))
            .is_some_and(|bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(SimError::InvalidConfiguration(format!(
                "grid size {grid_size} is too large to allocate"
            )));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "scale must be a positive finite number, got {scale}"
            )));
        }
        Ok(Self { grid_size, scale })
    }

    /// Builds a config from signed user input, so that negative sizes are
    /// reported as a configuration error rather than a parse error.
    pub fn from_raw(grid_size: i64, scale: f64) -> SimResult<Self> {
        let grid_size = usize::try_from(grid_size).map_err(|_| {
            SimError::InvalidConfiguration(format!(
                "grid size must be positive, got {grid_size}"
            ))
        })?;
        Self::new(grid_size, scale)
    }

    /// Number of grid cells. Cannot overflow: `new` rejects sizes whose
    /// square does not fit in memory.
    pub fn cells(&self) -> usize {
        self.grid_size * self.grid_size
    }
}
