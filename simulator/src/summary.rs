use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::stats::GridStats;

/// Report of a completed run, printed on request by the binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub started_at: String,
    pub config: SimConfig,
    pub steps: usize,
    pub elapsed_secs: f64,
    pub final_grid: GridStats,
    /// One entry per step, in step order.
    pub curvature: Vec<GridStats>,
}

impl RunSummary {
    pub fn new(
        started_at: DateTime<Utc>,
        config: SimConfig,
        elapsed_secs: f64,
        final_grid: GridStats,
        curvature: Vec<GridStats>,
    ) -> Self {
        Self {
            started_at: started_at.to_rfc3339(),
            config,
            steps: curvature.len(),
            elapsed_secs,
            final_grid,
            curvature,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
