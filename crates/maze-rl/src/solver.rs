//! Solver trait and construction by algorithm name

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use maze_core::{MazeEnvironment, MazeError, Result};

use crate::config::SolverConfig;
use crate::sarsa::SarsaLambdaSolver;
use crate::snapshot::Snapshot;
use crate::value_iteration::ValueIterationSolver;

/// A maze solver driven one tick at a time
///
/// Calls to `advance` must be sequential; each one runs to completion and
/// leaves the solver ready for the next.
pub trait Solver: Send {
    /// Algorithm name
    fn name(&self) -> &str;

    /// Perform one unit of work and report the render state
    fn advance(&mut self) -> Result<Snapshot>;

    /// True once every iteration has run; further `advance` calls return the
    /// finished snapshot
    fn is_finished(&self) -> bool;

    /// Get solver parameters and progress as JSON
    fn params(&self) -> serde_json::Value;
}

/// Available solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[serde(alias = "value_iteration")]
    ValueIter,
    #[default]
    #[serde(alias = "sarsa_lambda")]
    SarsaLambda,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::ValueIter => "valueiter",
            Algorithm::SarsaLambda => "sarsalambda",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "valueiter" | "value_iteration" => Ok(Algorithm::ValueIter),
            "sarsalambda" | "sarsa_lambda" => Ok(Algorithm::SarsaLambda),
            _ => Err(MazeError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Build a solver for one session
pub fn create_solver(
    algorithm: Algorithm,
    env: MazeEnvironment,
    config: &SolverConfig,
) -> Result<Box<dyn Solver>> {
    info!("Creating {} solver", algorithm);

    let solver: Box<dyn Solver> = match algorithm {
        Algorithm::ValueIter => Box::new(ValueIterationSolver::new(env, config)?),
        Algorithm::SarsaLambda => Box::new(SarsaLambdaSolver::new(env, config)?),
    };
    Ok(solver)
}
