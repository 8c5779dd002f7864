//! Drive one solver session tick by tick

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use maze_core::MazeEnvironment;
use maze_rl::{create_solver, Algorithm};

use crate::config::MazeConfig;

#[derive(Args)]
pub struct TrainArgs {
    /// Maze text file (overrides run.maze_path)
    #[arg(short, long)]
    pub maze: Option<PathBuf>,

    /// Solver to run: valueiter or sarsalambda
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    /// Stop after this many ticks
    #[arg(short, long)]
    pub ticks: Option<usize>,

    /// Delay between ticks in milliseconds
    #[arg(long)]
    pub tick_interval_ms: Option<u64>,

    /// Number of episodes or sweeps
    #[arg(long)]
    pub iter_count: Option<usize>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Config file to read instead of the default search path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl TrainArgs {
    /// Command-line flags take precedence over file and environment values
    fn apply(&self, config: &mut MazeConfig) {
        if let Some(maze) = &self.maze {
            config.run.maze_path = Some(maze.clone());
        }
        if let Some(algorithm) = self.algorithm {
            config.run.algorithm = algorithm;
        }
        if let Some(ticks) = self.ticks {
            config.run.ticks = Some(ticks);
        }
        if let Some(ms) = self.tick_interval_ms {
            config.run.tick_interval_ms = ms;
        }
        if let Some(iter_count) = self.iter_count {
            config.solver.iter_count = iter_count;
        }
        if let Some(seed) = self.seed {
            config.solver.seed = Some(seed);
        }
    }
}

pub async fn run(args: TrainArgs) -> Result<()> {
    let mut config = MazeConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    let maze_path = config
        .run
        .maze_path
        .clone()
        .context("No maze given; pass --maze or set run.maze_path")?;
    let env = MazeEnvironment::from_file(&maze_path)
        .with_context(|| format!("Failed to load maze {}", maze_path.display()))?;

    let mut solver = create_solver(config.run.algorithm, env, &config.solver)
        .context("Failed to create solver")?;
    info!("Training with {}", solver.params());

    let mut interval = (config.run.tick_interval_ms > 0)
        .then(|| tokio::time::interval(Duration::from_millis(config.run.tick_interval_ms)));

    let mut ticks = 0usize;

    while !tick_limit_reached(config.run.ticks, ticks) {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }

        let was_finished = solver.is_finished();
        let snapshot = solver.advance()?;
        {
            let mut out = std::io::stdout().lock();
            serde_json::to_writer(&mut out, &snapshot)?;
            writeln!(out)?;
            out.flush()?;
        }
        ticks += 1;
        debug!("Tick {} sent", ticks);

        if was_finished {
            break;
        }
    }

    info!(
        "Stopped after {} ticks (finished: {})",
        ticks,
        solver.is_finished()
    );
    Ok(())
}

fn tick_limit_reached(limit: Option<usize>, ticks: usize) -> bool {
    limit.is_some_and(|limit| ticks >= limit)
}
