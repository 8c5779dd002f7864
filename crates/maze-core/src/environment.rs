//! Maze environment - agent position, transitions and initial value tables

use std::path::Path;

use ndarray::{Array2, Array3};
use rand::Rng;
use tracing::debug;

use crate::error::{MazeError, Result};
use crate::grid::Grid;
use crate::render::Rgb;
use crate::types::{
    Action, ActionValueTable, Cell, Position, StateValueTable, Transition, WALL_VALUE,
};

/// Reward for every move that changes the agent's cell
pub const STEP_REWARD: f64 = -1.0;

/// Reward for a blocked move
pub const BLOCKED_REWARD: f64 = 0.0;

/// A grid plus the agent's current position
#[derive(Debug, Clone)]
pub struct MazeEnvironment {
    grid: Grid,
    state: Position,
}

impl MazeEnvironment {
    /// Create an environment with the agent on the start cell
    pub fn new(grid: Grid) -> Self {
        let state = grid.start();
        Self { grid, state }
    }

    /// Parse maze text into a new environment
    pub fn parse(text: &str) -> Result<Self> {
        Grid::parse(text).map(Self::new)
    }

    /// Read and parse a maze file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let env = Self::parse(&text)?;
        debug!(
            "Loaded maze {:?} ({}x{})",
            path,
            env.grid.rows(),
            env.grid.cols()
        );
        Ok(env)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current agent position
    pub fn state(&self) -> Position {
        self.state
    }

    pub fn start(&self) -> Position {
        self.grid.start()
    }

    pub fn goal(&self) -> Position {
        self.grid.goal()
    }

    /// Move the agent back to the start cell
    pub fn reset(&mut self) -> Position {
        self.state = self.grid.start();
        self.state
    }

    /// Place the agent on `state`; walls and out-of-bounds cells are rejected
    pub fn relocate(&mut self, state: Position) -> Result<()> {
        if !self.grid.is_open(state) {
            return Err(MazeError::InvalidState(state));
        }
        self.state = state;
        Ok(())
    }

    /// Apply `action` from the current position
    pub fn step(&mut self, action: Action) -> Transition {
        let target = self
            .state
            .offset(action)
            .filter(|&next| self.grid.is_open(next));

        let (reward, effective) = match target {
            Some(next) => {
                self.state = next;
                (STEP_REWARD, true)
            }
            None => (BLOCKED_REWARD, false),
        };

        Transition {
            next: self.state,
            reward,
            terminated: self.grid.is_goal(self.state),
            effective,
        }
    }

    /// Simulate `action` from `state` without moving the agent
    pub fn probe(&mut self, state: Position, action: Action) -> Result<Transition> {
        let current = self.state;
        self.relocate(state)?;
        let transition = self.step(action);
        self.state = current;
        Ok(transition)
    }

    /// Actions that move the agent from `state`, in enumeration order
    pub fn effective_actions(&mut self, state: Position) -> Result<Vec<(Action, Transition)>> {
        let mut actions = Vec::with_capacity(Action::ALL.len());
        for action in Action::ALL {
            let transition = self.probe(state, action)?;
            if transition.effective {
                actions.push((action, transition));
            }
        }
        Ok(actions)
    }

    /// Random action values in [0, 1) with wall rows and blocked actions
    /// pinned to [`WALL_VALUE`]
    pub fn initial_action_values<R: Rng + ?Sized>(&mut self, rng: &mut R) -> ActionValueTable {
        let (rows, cols) = self.grid.shape();
        let mut q = Array3::from_shape_simple_fn((rows, cols, Action::ALL.len()), || {
            rng.gen::<f64>()
        });

        for pos in self.grid.positions().collect::<Vec<_>>() {
            if self.grid.is_wall(pos) {
                q.slice_mut(ndarray::s![pos.row, pos.col, ..]).fill(WALL_VALUE);
                continue;
            }
            for action in Action::ALL {
                // Free cells always probe successfully
                let effective = self.probe(pos, action).map_or(false, |t| t.effective);
                if !effective {
                    q[[pos.row, pos.col, action.index()]] = WALL_VALUE;
                }
            }
        }

        q
    }

    /// Random state values in [0, 1) with walls at [`WALL_VALUE`] and the
    /// goal at zero
    pub fn initial_state_values<R: Rng + ?Sized>(&self, rng: &mut R) -> StateValueTable {
        let mut v = Array2::from_shape_simple_fn(self.grid.shape(), || rng.gen::<f64>());
        for (value, cell) in v.iter_mut().zip(self.grid.cells().iter()) {
            if *cell == Cell::Wall {
                *value = WALL_VALUE;
            }
        }
        let goal = self.grid.goal();
        v[[goal.row, goal.col]] = 0.0;
        v
    }

    /// Render colors for the grid, see [`Grid::render_colors`]
    pub fn render_colors(&self, values: Option<&StateValueTable>) -> Result<Array2<Rgb>> {
        self.grid.render_colors(values)
    }
}
