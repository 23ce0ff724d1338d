//! The spacetime grid and its fluctuation/curvature update loop.

use std::io::{self, Write};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::curvature::curvature;
use crate::error::{SimError, SimResult};
use crate::fluctuation::FluctuationSource;
use crate::render::render_matrix;
use crate::stats::GridStats;

/// Square grid of scalar "spacetime" values perturbed by Gaussian noise.
///
/// Not meant for shared use across threads: all mutation goes through
/// `&mut self`.
pub struct GridSimulator {
    config: SimConfig,
    device: Device,
    grid: Tensor, // [N, N], f64
    noise: FluctuationSource,
    steps_taken: usize,
}

impl GridSimulator {
    /// Zero grid with noise drawn from OS entropy.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let noise = FluctuationSource::from_entropy(config.scale)?;
        Self::with_source(config, noise)
    }

    /// Validates raw user input, then behaves like [`GridSimulator::new`].
    pub fn from_raw(grid_size: i64, scale: f64) -> SimResult<Self> {
        Self::new(SimConfig::from_raw(grid_size, scale)?)
    }

    /// Zero grid with a deterministic noise sequence.
    pub fn seeded(config: SimConfig, seed: u64) -> SimResult<Self> {
        let noise = FluctuationSource::seeded(config.scale, seed)?;
        Self::with_source(config, noise)
    }

    fn with_source(config: SimConfig, noise: FluctuationSource) -> SimResult<Self> {
        let device = Device::Cpu;
        let n = config.grid_size;
        let grid = Tensor::zeros((n, n), DType::F64, &device)?;
        Ok(Self {
            config,
            device,
            grid,
            noise,
            steps_taken: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Tensor {
        &self.grid
    }

    /// Number of perturbations applied since construction.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Adds an independent Normal(0, scale) draw to every cell.
    pub fn perturb(&mut self) -> SimResult<()> {
        let field = self.noise.sample_field(&self.config, &self.device)?;
        self.grid = self.grid.add(&field)?;
        self.steps_taken += 1;
        Ok(())
    }

    /// Snapshot of the two-pass finite-difference curvature of the grid.
    pub fn curvature(&self) -> SimResult<Tensor> {
        Ok(curvature(&self.grid)?)
    }

    pub fn display(&self) -> SimResult<()> {
        self.display_to(&mut io::stdout().lock())
    }

    pub fn display_to<W: Write>(&self, out: &mut W) -> SimResult<()> {
        writeln!(out, "Spacetime grid values:")?;
        writeln!(out, "{}", render_matrix(&self.grid)?)?;
        Ok(())
    }

    /// Runs `steps` perturb/curvature rounds, echoing each to stdout.
    pub fn run(&mut self, steps: i64) -> SimResult<Vec<Tensor>> {
        self.run_with(steps, &mut io::stdout().lock())
    }

    /// Like [`GridSimulator::run`], writing the step dump to `out`.
    ///
    /// Returns one curvature matrix per step, in step order.
    pub fn run_with<W: Write>(&mut self, steps: i64, out: &mut W) -> SimResult<Vec<Tensor>> {
        let steps = usize::try_from(steps).map_err(|_| {
            SimError::InvalidArgument(format!("step count must be non-negative, got {steps}"))
        })?;

        info!(
            grid_size = self.config.grid_size,
            scale = self.config.scale,
            steps,
            "starting simulation"
        );
        let start = Instant::now();

        let mut curvatures = Vec::with_capacity(steps);
        for step in 1..=steps {
            writeln!(out, "\nSimulation step {step}:")?;
            self.perturb()?;
            self.display_to(out)?;

            let curvature = self.curvature()?;
            writeln!(out, "Calculated curvature:")?;
            writeln!(out, "{}", render_matrix(&curvature)?)?;

            if tracing::enabled!(tracing::Level::DEBUG) {
                let grid = GridStats::of(&self.grid)?;
                let curv = GridStats::of(&curvature)?;
                debug!(
                    step,
                    grid_variance = grid.variance,
                    curvature_rms = curv.rms,
                    "step complete"
                );
            }
            curvatures.push(curvature);
        }

        info!(
            steps,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "simulation finished"
        );
        Ok(curvatures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn quiet_run(sim: &mut GridSimulator, steps: i64) -> SimResult<Vec<Tensor>> {
        sim.run_with(steps, &mut io::sink())
    }

    fn values(t: &Tensor) -> SimResult<Vec<f64>> {
        Ok(t.to_vec2::<f64>()?.into_iter().flatten().collect())
    }

    #[test]
    fn starts_as_zero_grid() -> SimResult<()> {
        let sim = GridSimulator::from_raw(4, 1.0)?;
        assert_eq!(sim.grid().dims2()?, (4, 4));
        assert!(values(sim.grid())?.iter().all(|v| *v == 0.0));
        assert_eq!(sim.steps_taken(), 0);
        Ok(())
    }

    #[test]
    fn construction_rejects_invalid_configuration() {
        for (size, scale) in [(0, 1.0), (-3, 1.0), (4, 0.0), (4, -1.0)] {
            let result = GridSimulator::from_raw(size, scale);
            assert!(
                matches!(result, Err(SimError::InvalidConfiguration(_))),
                "size={size} scale={scale}"
            );
        }
    }

    #[test]
    fn oversized_grid_is_rejected_before_allocation() {
        let result = GridSimulator::from_raw(5_000_000_000, 1.0);
        assert!(matches!(result, Err(SimError::InvalidConfiguration(_))));
    }

    #[test]
    fn perturb_changes_every_cell() -> SimResult<()> {
        let mut sim = GridSimulator::seeded(SimConfig::new(6, 0.5)?, 11)?;
        let before = values(sim.grid())?;
        sim.perturb()?;
        let after = values(sim.grid())?;

        assert!(before.iter().zip(&after).all(|(b, a)| b != a));
        let sq_dev: f64 = before.iter().zip(&after).map(|(b, a)| (a - b).powi(2)).sum();
        assert!(sq_dev > 0.0);
        assert_eq!(sim.steps_taken(), 1);
        Ok(())
    }

    #[test]
    fn curvature_does_not_mutate_grid() -> SimResult<()> {
        let mut sim = GridSimulator::seeded(SimConfig::new(5, 1.0)?, 5)?;
        sim.perturb()?;
        let grid_before = values(sim.grid())?;
        let first = values(&sim.curvature()?)?;
        let second = values(&sim.curvature()?)?;
        assert_eq!(first, second);
        assert_eq!(values(sim.grid())?, grid_before);
        Ok(())
    }

    #[test]
    fn returned_curvature_is_a_snapshot() -> SimResult<()> {
        let mut sim = GridSimulator::seeded(SimConfig::new(3, 1.0)?, 9)?;
        sim.perturb()?;
        let snapshot = sim.curvature()?;
        let kept = values(&snapshot)?;
        sim.perturb()?;
        assert_eq!(values(&snapshot)?, kept);
        Ok(())
    }

    #[test]
    fn run_zero_steps_is_empty_and_leaves_grid_untouched() -> SimResult<()> {
        let mut sim = GridSimulator::seeded(SimConfig::new(3, 1.0)?, 1)?;
        let mut out = Vec::new();
        let curvatures = sim.run_with(0, &mut out)?;
        assert!(curvatures.is_empty());
        assert!(out.is_empty());
        assert!(values(sim.grid())?.iter().all(|v| *v == 0.0));
        Ok(())
    }

    #[test]
    fn run_rejects_negative_steps() -> SimResult<()> {
        let mut sim = GridSimulator::seeded(SimConfig::new(3, 1.0)?, 1)?;
        let result = quiet_run(&mut sim, -1);
        assert!(matches!(result, Err(SimError::InvalidArgument(_))));
        assert_eq!(sim.steps_taken(), 0);
        Ok(())
    }

    #[test]
    fn run_returns_one_square_matrix_per_step() -> SimResult<()> {
        let n = 7;
        let mut sim = GridSimulator::seeded(SimConfig::new(n, 0.1)?, 21)?;
        let curvatures = quiet_run(&mut sim, 4)?;
        assert_eq!(curvatures.len(), 4);
        for c in &curvatures {
            assert_eq!(c.dims2()?, (n, n));
        }
        assert_eq!(sim.grid().dims2()?, (n, n));
        assert_eq!(sim.steps_taken(), 4);
        Ok(())
    }

    #[test]
    fn repeated_runs_continue_from_retained_grid() -> SimResult<()> {
        let config = SimConfig::new(4, 1.0)?;
        let mut split = GridSimulator::seeded(config, 77)?;
        quiet_run(&mut split, 2)?;
        quiet_run(&mut split, 3)?;

        let mut whole = GridSimulator::seeded(config, 77)?;
        quiet_run(&mut whole, 5)?;

        assert_eq!(split.steps_taken(), 5);
        assert_eq!(values(split.grid())?, values(whole.grid())?);
        Ok(())
    }

    #[test]
    fn variance_grows_with_step_count() -> SimResult<()> {
        let scale = 0.5;
        let config = SimConfig::new(60, scale)?;
        for (seed, k) in [(1u64, 1i64), (2, 4), (3, 9)] {
            let mut sim = GridSimulator::seeded(config, seed)?;
            quiet_run(&mut sim, k)?;
            let variance = GridStats::of(sim.grid())?.variance;
            let expected = k as f64 * scale * scale;
            let rel_err = (variance - expected).abs() / expected;
            assert!(rel_err < 0.15, "k={k}: variance {variance}, expected {expected}");
        }
        Ok(())
    }

    #[test]
    fn seeded_two_by_two_matches_draws_and_boundary_differences() -> SimResult<()> {
        let seed = 2024;
        let mut sim = GridSimulator::seeded(SimConfig::new(2, 1.0)?, seed)?;
        sim.perturb()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let draws: Vec<f64> = (0..4).map(|_| normal.sample(&mut rng)).collect();
        assert_eq!(values(sim.grid())?, draws);

        let (a, b, c, d) = (draws[0], draws[1], draws[2], draws[3]);
        // Row pass gives [[c-a, d-b], [c-a, d-b]], column pass (d-b)-(c-a).
        let expected = (d - b) - (c - a);
        for v in values(&sim.curvature()?)? {
            assert!((v - expected).abs() < 1e-12);
        }
        Ok(())
    }

    #[test]
    fn run_echoes_each_step() -> SimResult<()> {
        let mut sim = GridSimulator::seeded(SimConfig::new(2, 1.0)?, 4)?;
        let mut out = Vec::new();
        sim.run_with(2, &mut out)?;
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("\nSimulation step 1:\nSpacetime grid values:\n[["));
        assert!(text.contains("\nSimulation step 2:\n"));
        assert_eq!(text.matches("Calculated curvature:").count(), 2);
        Ok(())
    }

    #[test]
    fn single_cell_grid_has_zero_curvature() -> SimResult<()> {
        let mut sim = GridSimulator::seeded(SimConfig::new(1, 1.0)?, 8)?;
        let curvatures = quiet_run(&mut sim, 2)?;
        for c in curvatures {
            assert_eq!(values(&c)?, vec![0.0]);
        }
        Ok(())
    }
}
