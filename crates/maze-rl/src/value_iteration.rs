//! Synchronous value iteration with a greedy rollout per iteration

use tracing::{debug, info, warn};

use maze_core::{MazeEnvironment, Position, Result, StateValueTable};

use crate::config::SolverConfig;
use crate::policy::greedy_for_state_value;
use crate::snapshot::{hex_rows, FinishedSnapshot, ProgressSnapshot, Snapshot, ValueDump};
use crate::solver::Solver;

/// Outcome of the greedy rollout after a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rollout {
    pub steps: usize,
    pub reached_goal: bool,
    pub final_position: Position,
}

/// Value iteration over the maze's state-value table
///
/// Each `advance()` runs one full sweep followed by a greedy rollout from the
/// start cell.
pub struct ValueIterationSolver {
    env: MazeEnvironment,
    values: StateValueTable,
    gamma: f64,
    iter_count: usize,
    rollout_steps: usize,
    iteration: usize,
    /// Step count of every rollout that reached the goal
    time_steps: Vec<usize>,
}

impl ValueIterationSolver {
    pub fn new(env: MazeEnvironment, config: &SolverConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = config.rng();
        let values = env.initial_state_values(&mut rng);

        info!(
            "Value iteration solver ready: {} iterations, gamma {}",
            config.iter_count, config.gamma
        );

        Ok(Self {
            env,
            values,
            gamma: config.gamma,
            iter_count: config.iter_count,
            rollout_steps: config.rollout_steps,
            iteration: 0,
            time_steps: Vec::new(),
        })
    }

    pub fn values(&self) -> &StateValueTable {
        &self.values
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Steps taken by each successful rollout, oldest first
    pub fn time_steps(&self) -> &[usize] {
        &self.time_steps
    }

    pub fn env(&self) -> &MazeEnvironment {
        &self.env
    }

    /// One in-place row-major Bellman sweep; returns the largest change
    ///
    /// Walls and the goal are skipped. A free cell with no effective action
    /// keeps its value.
    pub fn sweep(&mut self) -> Result<f64> {
        let positions: Vec<Position> = self.env.grid().positions().collect();
        let mut max_delta: f64 = 0.0;

        for pos in positions {
            if self.env.grid().is_wall(pos) || self.env.grid().is_goal(pos) {
                continue;
            }

            let best = self
                .env
                .effective_actions(pos)?
                .into_iter()
                .map(|(_, t)| t.reward + self.gamma * self.values[[t.next.row, t.next.col]])
                .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))));

            if let Some(best) = best {
                let cell = &mut self.values[[pos.row, pos.col]];
                max_delta = max_delta.max((best - *cell).abs());
                *cell = best;
            }
        }

        Ok(max_delta)
    }

    /// Follow the greedy policy from the start cell for at most
    /// `rollout_steps` steps
    pub fn rollout(&mut self) -> Result<Rollout> {
        let mut state = self.env.reset();

        for t in 0..self.rollout_steps {
            let action = greedy_for_state_value(&mut self.env, &self.values, state)?;
            let transition = self.env.step(action);
            state = transition.next;

            if transition.terminated {
                return Ok(Rollout {
                    steps: t + 1,
                    reached_goal: true,
                    final_position: state,
                });
            }
        }

        Ok(Rollout {
            steps: self.rollout_steps,
            reached_goal: false,
            final_position: state,
        })
    }

    fn finished_snapshot(&self) -> Snapshot {
        Snapshot::Finished(FinishedSnapshot::new(
            ValueDump::from(&self.values),
            self.env.state(),
        ))
    }
}

impl Solver for ValueIterationSolver {
    fn name(&self) -> &str {
        "valueiter"
    }

    fn advance(&mut self) -> Result<Snapshot> {
        if self.is_finished() {
            return Ok(self.finished_snapshot());
        }

        let delta = self.sweep()?;
        self.iteration += 1;
        debug!("Iteration {} sweep delta {:.6}", self.iteration, delta);

        let rollout = self.rollout()?;
        if rollout.reached_goal {
            self.time_steps.push(rollout.steps);
            info!(
                "Iteration {} finished after {} timesteps",
                self.iteration, rollout.steps
            );
        } else {
            warn!(
                "Iteration {} not finished after {} timesteps",
                self.iteration, rollout.steps
            );
        }

        let colors = self.env.render_colors(Some(&self.values))?;
        Ok(Snapshot::Progress(ProgressSnapshot {
            episode: self.iteration,
            step: rollout.steps,
            reached_goal: rollout.reached_goal,
            rgb: hex_rows(&colors),
            start: self.env.start(),
            goal: self.env.goal(),
            current_position: rollout.final_position,
        }))
    }

    fn is_finished(&self) -> bool {
        self.iteration >= self.iter_count
    }

    fn params(&self) -> serde_json::Value {
        serde_json::json!({
            "algorithm": self.name(),
            "gamma": self.gamma,
            "iter_count": self.iter_count,
            "rollout_steps": self.rollout_steps,
            "iteration": self.iteration,
            "time_steps": self.time_steps,
        })
    }
}
