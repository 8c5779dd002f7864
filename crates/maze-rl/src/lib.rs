//! Maze RL - Reinforcement Learning solvers for grid mazes
//!
//! This crate provides a synchronous value-iteration solver and an
//! incremental SARSA(lambda) solver. Both are driven one tick at a time
//! through the [`Solver`] trait and report a serializable [`Snapshot`].

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]

pub mod config;
pub mod policy;
pub mod sarsa;
pub mod snapshot;
pub mod solver;
pub mod value_iteration;

pub use config::SolverConfig;
pub use sarsa::SarsaLambdaSolver;
pub use snapshot::{FinishedSnapshot, ProgressSnapshot, Snapshot, ValueDump};
pub use solver::{create_solver, Algorithm, Solver};
pub use value_iteration::ValueIterationSolver;
