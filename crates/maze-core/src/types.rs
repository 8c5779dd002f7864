//! Position, Action, Cell and Transition types

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::error::MazeError;

/// Reward value returned by the environment
pub type Reward = f64;

/// State values indexed by `[row, col]`
pub type StateValueTable = Array2<f64>;

/// Action values indexed by `[row, col, action_index]`
pub type ActionValueTable = Array3<f64>;

/// Eligibility traces, same shape as [`ActionValueTable`]
pub type EligibilityTrace = Array3<f64>;

/// Sentinel value for walls and actions that can never move the agent
pub const WALL_VALUE: f64 = -1000.0;

/// A cell coordinate in the maze, serialized as a `[row, col]` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbouring position in the given direction, `None` past the top or
    /// left edge. Bottom/right bounds are checked by the grid.
    pub fn offset(self, action: Action) -> Option<Self> {
        let (dr, dc) = action.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Self { row, col })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<Position> for (usize, usize) {
    fn from(pos: Position) -> Self {
        (pos.row, pos.col)
    }
}

/// Kind of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Free,
    Wall,
}

/// One of the four moves
///
/// The declaration order is the enumeration order used for tie-breaking and
/// for the action axis of Q tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Right,
    Left,
    Down,
    Up,
}

impl Action {
    /// All actions in enumeration order
    pub const ALL: [Action; 4] = [Action::Right, Action::Left, Action::Down, Action::Up];

    /// Index along the action axis
    pub fn index(self) -> usize {
        match self {
            Action::Right => 0,
            Action::Left => 1,
            Action::Down => 2,
            Action::Up => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Number of discrete actions
    pub fn action_space_size() -> usize {
        Self::ALL.len()
    }

    pub fn symbol(self) -> char {
        match self {
            Action::Right => 'R',
            Action::Left => 'L',
            Action::Down => 'D',
            Action::Up => 'U',
        }
    }

    pub fn from_symbol(symbol: char) -> Result<Self, MazeError> {
        match symbol {
            'R' => Ok(Action::Right),
            'L' => Ok(Action::Left),
            'D' => Ok(Action::Down),
            'U' => Ok(Action::Up),
            other => Err(MazeError::InvalidAction(other.to_string())),
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Action::Right => (0, 1),
            Action::Left => (0, -1),
            Action::Down => (1, 0),
            Action::Up => (-1, 0),
        }
    }
}

impl FromStr for Action {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => Self::from_symbol(symbol),
            _ => Err(MazeError::InvalidAction(s.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Outcome of applying an action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub next: Position,
    pub reward: Reward,
    pub terminated: bool,
    /// False when the move was blocked by a wall or the boundary
    pub effective: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_index_roundtrip() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::from_index(i), Some(*action));
        }
        assert_eq!(Action::from_index(4), None);
        assert_eq!(Action::action_space_size(), 4);
    }

    #[test]
    fn test_action_symbols() {
        assert_eq!(Action::from_symbol('R').unwrap(), Action::Right);
        assert_eq!("U".parse::<Action>().unwrap(), Action::Up);
        assert_eq!(Action::Down.to_string(), "D");

        assert!(matches!(
            Action::from_symbol('X'),
            Err(MazeError::InvalidAction(_))
        ));
        assert!(matches!(
            "RL".parse::<Action>(),
            Err(MazeError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_position_offset() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.offset(Action::Right), Some(Position::new(0, 1)));
        assert_eq!(origin.offset(Action::Down), Some(Position::new(1, 0)));
        assert_eq!(origin.offset(Action::Up), None);
        assert_eq!(origin.offset(Action::Left), None);
    }

    #[test]
    fn test_position_serialization() {
        let pos = Position::new(2, 3);
        let json = serde_json::to_string(&pos).unwrap();
        assert_eq!(json, "[2,3]");

        let parsed: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pos);
        assert_eq!(pos.to_string(), "(2, 3)");
    }
}
