// Library root

pub mod config;
pub mod curvature;
pub mod error;
pub mod fluctuation;
pub mod input;
pub mod render;
pub mod spacetime;
pub mod stats;
pub mod summary;
pub mod telemetry;

// Primary API
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use spacetime::GridSimulator;
pub use stats::GridStats;
pub use summary::RunSummary;
