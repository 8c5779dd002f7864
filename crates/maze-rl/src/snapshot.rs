//! Serializable render state returned by every tick

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use maze_core::{to_hex, ActionValueTable, Position, Rgb, StateValueTable};

/// Result of one `advance()` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    Finished(FinishedSnapshot),
    Progress(ProgressSnapshot),
}

impl Snapshot {
    pub fn is_finished(&self) -> bool {
        matches!(self, Snapshot::Finished(_))
    }

    pub fn current_position(&self) -> Position {
        match self {
            Snapshot::Finished(s) => s.current_position,
            Snapshot::Progress(s) => s.current_position,
        }
    }

    pub fn as_progress(&self) -> Option<&ProgressSnapshot> {
        match self {
            Snapshot::Progress(s) => Some(s),
            Snapshot::Finished(_) => None,
        }
    }
}

/// Snapshot of a solver that is still training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Episode (SARSA) or iteration (value iteration), starting at 1
    pub episode: usize,
    /// Steps taken in the episode, or rollout length for value iteration
    pub step: usize,
    /// Whether this tick ended on the goal
    pub reached_goal: bool,
    /// Hex colors, row-major
    pub rgb: Vec<Vec<String>>,
    pub start: Position,
    pub goal: Position,
    pub current_position: Position,
}

/// Snapshot of a solver that has run all its iterations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedSnapshot {
    pub finished: bool,
    pub values: ValueDump,
    pub current_position: Position,
}

impl FinishedSnapshot {
    pub fn new(values: ValueDump, current_position: Position) -> Self {
        Self {
            finished: true,
            values,
            current_position,
        }
    }
}

/// Final value table as nested arrays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueDump {
    ActionValues(Vec<Vec<Vec<f64>>>),
    StateValues(Vec<Vec<f64>>),
}

impl From<&StateValueTable> for ValueDump {
    fn from(values: &StateValueTable) -> Self {
        ValueDump::StateValues(values.outer_iter().map(|row| row.to_vec()).collect())
    }
}

impl From<&ActionValueTable> for ValueDump {
    fn from(values: &ActionValueTable) -> Self {
        ValueDump::ActionValues(
            values
                .outer_iter()
                .map(|row| row.outer_iter().map(|cell| cell.to_vec()).collect())
                .collect(),
        )
    }
}

/// Hex strings for a color grid
pub fn hex_rows(colors: &Array2<Rgb>) -> Vec<Vec<String>> {
    colors
        .outer_iter()
        .map(|row| row.iter().map(|&c| to_hex(c)).collect())
        .collect()
}
