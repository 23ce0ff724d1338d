// Main entry point for the quantum spacetime simulator

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use spacetime_simulator::{
    input::prompt, telemetry::init_tracing, GridSimulator, GridStats, RunSummary, SimResult,
};

#[derive(Debug, Parser)]
#[command(name = "spacetime-simulator")]
struct Args {
    /// Side length of the spacetime grid (prompted for when omitted)
    #[arg(long, allow_negative_numbers = true)]
    grid_size: Option<i64>,

    /// Planck length: standard deviation of the per-cell fluctuations
    #[arg(long, allow_negative_numbers = true)]
    scale: Option<f64>,

    /// Number of simulation steps
    #[arg(long, allow_negative_numbers = true)]
    steps: Option<i64>,

    /// Print a JSON summary of the run when it completes
    #[arg(long)]
    summary: bool,
}

fn given_or_prompt<T, R, W>(
    given: Option<T>,
    reader: &mut R,
    writer: &mut W,
    message: &str,
    field: &'static str,
) -> SimResult<T>
where
    T: FromStr,
    R: BufRead,
    W: Write,
{
    match given {
        Some(value) => Ok(value),
        None => prompt(reader, writer, message, field),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    println!("\nWelcome to the Quantum Spacetime Simulator!\n");

    let mut reader = io::stdin().lock();
    let mut stdout = io::stdout();
    let grid_size: i64 = given_or_prompt(
        args.grid_size,
        &mut reader,
        &mut stdout,
        "Enter the grid size for the spacetime (e.g., 10): ",
        "grid size",
    )?;
    let scale: f64 = given_or_prompt(
        args.scale,
        &mut reader,
        &mut stdout,
        "Enter the Planck length (e.g., 1.616e-35): ",
        "Planck length",
    )?;
    let steps: i64 = given_or_prompt(
        args.steps,
        &mut reader,
        &mut stdout,
        "Enter the number of simulation steps: ",
        "step count",
    )?;

    let mut simulator =
        GridSimulator::from_raw(grid_size, scale).context("failed to set up spacetime grid")?;

    let started_at = Utc::now();
    let start = Instant::now();
    let curvatures = simulator
        .run(steps)
        .with_context(|| format!("simulation of {steps} steps failed"))?;
    let elapsed_secs = start.elapsed().as_secs_f64();

    println!("\nSimulation complete.");

    if args.summary {
        let curvature = curvatures
            .iter()
            .map(GridStats::of)
            .collect::<candle_core::Result<Vec<_>>>()?;
        let summary = RunSummary::new(
            started_at,
            *simulator.config(),
            elapsed_secs,
            GridStats::of(simulator.grid())?,
            curvature,
        );
        println!("{}", summary.to_json()?);
    }

    Ok(())
}
