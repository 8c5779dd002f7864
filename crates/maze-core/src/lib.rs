//! Maze Core - grid world types and the maze environment
//!
//! This crate provides the grid parser, the deterministic transition and
//! reward model, the initial value tables and the value-to-color render
//! transform shared by the solvers in `maze-rl`.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod environment;
pub mod error;
pub mod grid;
pub mod render;
pub mod types;

pub use environment::MazeEnvironment;
pub use error::{MazeError, Result};
pub use grid::Grid;
pub use render::{to_hex, Rgb};
pub use types::*;
