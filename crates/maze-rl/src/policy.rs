//! Action selection over state-value and action-value tables
//!
//! Both selectors only consider effective actions and break ties by the
//! enumeration order of [`Action::ALL`] (right, left, down, up).

use rand::seq::SliceRandom;
use rand::Rng;

use maze_core::{
    Action, ActionValueTable, MazeEnvironment, MazeError, Position, Result, StateValueTable,
};

/// Greedy action under a state-value table
///
/// Picks the first effective action whose next state has the strictly
/// highest value.
pub fn greedy_for_state_value(
    env: &mut MazeEnvironment,
    values: &StateValueTable,
    state: Position,
) -> Result<Action> {
    let mut best: Option<(Action, f64)> = None;

    for (action, transition) in env.effective_actions(state)? {
        let value = values[[transition.next.row, transition.next.col]];
        if best.map_or(true, |(_, max)| max < value) {
            best = Some((action, value));
        }
    }

    best.map(|(action, _)| action)
        .ok_or(MazeError::NoEffectiveAction(state))
}

/// Epsilon-greedy action under an action-value table
///
/// The greedy choice is computed first, then a single uniform draw decides
/// whether to explore with a uniformly chosen effective action instead.
/// Returns the action and its index along the action axis.
pub fn epsilon_greedy_for_action_value<R: Rng + ?Sized>(
    env: &mut MazeEnvironment,
    q_values: &ActionValueTable,
    state: Position,
    epsilon: f64,
    rng: &mut R,
) -> Result<(Action, usize)> {
    let candidates: Vec<Action> = env
        .effective_actions(state)?
        .into_iter()
        .map(|(action, _)| action)
        .collect();

    let mut greedy: Option<(Action, f64)> = None;
    for &action in &candidates {
        let value = q_values[[state.row, state.col, action.index()]];
        if greedy.map_or(true, |(_, max)| max < value) {
            greedy = Some((action, value));
        }
    }
    let (greedy, _) = greedy.ok_or(MazeError::NoEffectiveAction(state))?;

    let action = if rng.gen::<f64>() < epsilon {
        candidates.choose(rng).copied().unwrap_or(greedy)
    } else {
        greedy
    };

    Ok((action, action.index()))
}
