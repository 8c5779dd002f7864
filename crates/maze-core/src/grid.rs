//! Maze grid parsing
//!
//! The text format is one line per row: `#` is a wall, `S` the start, `G`
//! the goal and every other character a free cell. Rows shorter than the
//! widest row are padded with free cells.

use std::str::FromStr;

use ndarray::Array2;

use crate::error::{MazeError, Result};
use crate::types::{Cell, Position};

/// Static maze layout
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Array2<Cell>,
    start: Position,
    goal: Position,
}

impl Grid {
    /// Parse a maze from its text form
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        let rows = lines.len();
        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let mut cells = Array2::from_elem((rows, cols), Cell::Free);
        let mut start = None;
        let mut goal = None;

        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    '#' => cells[[row, col]] = Cell::Wall,
                    'S' => {
                        if start.replace(Position::new(row, col)).is_some() {
                            return Err(MazeError::MultipleStarts);
                        }
                    }
                    'G' => {
                        if goal.replace(Position::new(row, col)).is_some() {
                            return Err(MazeError::MultipleGoals);
                        }
                    }
                    _ => {}
                }
            }
        }

        let start = start.ok_or(MazeError::NoStart)?;
        let goal = goal.ok_or(MazeError::NoGoal)?;

        Ok(Self { cells, start, goal })
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// Cell kind, `None` when out of bounds
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.cells.get([pos.row, pos.col]).copied()
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Wall)
    }

    pub fn is_goal(&self, pos: Position) -> bool {
        self.goal == pos
    }

    /// In bounds and not a wall
    pub fn is_open(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Free)
    }

    /// Every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let (rows, cols) = self.shape();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Position::new(row, col)))
    }
}

impl FromStr for Grid {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
