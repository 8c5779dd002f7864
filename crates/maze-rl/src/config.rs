//! Solver hyper-parameters

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use maze_core::{MazeError, Result};

/// Configuration shared by both solvers
///
/// Value iteration only reads `gamma`, `iter_count` and `rollout_steps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Step size, in (0, 1]
    pub alpha: f64,
    /// Discount factor, in (0, 1]
    pub gamma: f64,
    /// Initial exploration rate, in [0, 1]
    pub epsilon: f64,
    /// Trace decay, in [0, 1]
    pub lambda: f64,
    /// Episodes (SARSA) or sweeps (value iteration) before finishing
    pub iter_count: usize,
    /// Step budget of one SARSA episode
    pub max_steps: usize,
    /// Step cap of the greedy rollout after each value-iteration sweep
    pub rollout_steps: usize,
    /// Seed for reproducible runs; entropy-seeded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.95,
            epsilon: 0.1,
            lambda: 0.2,
            iter_count: 2000,
            max_steps: 2000,
            rollout_steps: 50,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Check every parameter against its allowed range
    pub fn validate(&self) -> Result<()> {
        let unit_open = |name: &str, v: f64| {
            if v > 0.0 && v <= 1.0 {
                Ok(())
            } else {
                Err(MazeError::Config(format!("{name} must be in (0, 1], got {v}")))
            }
        };
        let unit_closed = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(MazeError::Config(format!("{name} must be in [0, 1], got {v}")))
            }
        };
        let positive = |name: &str, v: usize| {
            if v > 0 {
                Ok(())
            } else {
                Err(MazeError::Config(format!("{name} must be positive")))
            }
        };

        unit_open("alpha", self.alpha)?;
        unit_open("gamma", self.gamma)?;
        unit_closed("epsilon", self.epsilon)?;
        unit_closed("lambda", self.lambda)?;
        positive("iter_count", self.iter_count)?;
        positive("max_steps", self.max_steps)?;
        positive("rollout_steps", self.rollout_steps)?;
        Ok(())
    }

    /// Random source for a new solver
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
