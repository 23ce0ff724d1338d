use candle_core::{Result, Tensor};
use serde::{Deserialize, Serialize};

/// Summary statistics of a matrix snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GridStats {
    pub mean: f64,
    /// Population variance.
    pub variance: f64,
    /// Root mean square of the values.
    pub rms: f64,
}

impl GridStats {
    pub fn of(t: &Tensor) -> Result<Self> {
        let mean_t = t.mean_all()?;
        let variance: f64 = t.broadcast_sub(&mean_t)?.sqr()?.mean_all()?.to_scalar()?;
        let mean_sq: f64 = t.sqr()?.mean_all()?.to_scalar()?;
        Ok(Self {
            mean: mean_t.to_scalar()?,
            variance,
            rms: mean_sq.sqrt(),
        })
    }
}
