//! SARSA(lambda) with eligibility traces, advanced one environment step per
//! tick
//!
//! Nothing lives on the call stack between ticks: the episode/step counters,
//! the trace table, the previous state-action pair and the `q_old` baseline
//! are all fields, and [`EpisodePhase`] tells whether the next tick starts an
//! episode or continues one.

use ndarray::Axis;
use rand::rngs::StdRng;
use tracing::{debug, info};

use maze_core::{
    Action, ActionValueTable, EligibilityTrace, MazeEnvironment, MazeError, Position, Result,
    Reward, StateValueTable,
};

use crate::config::SolverConfig;
use crate::policy::epsilon_greedy_for_action_value;
use crate::snapshot::{hex_rows, FinishedSnapshot, ProgressSnapshot, Snapshot, ValueDump};
use crate::solver::Solver;

/// Fraction of the step budget before which reaching the goal is rewarded
///
/// Compared against the unrounded product `max_steps * 0.975`, not its
/// floor, so with 100 steps an arrival at step 97 still earns the bonus.
pub const GOAL_BONUS_CUTOFF: f64 = 0.975;

/// Reward for reaching the goal before the cutoff
pub const GOAL_REWARD: Reward = 20.0;

/// Reward for every other step
pub const STEP_PENALTY: Reward = -1.0;

/// Shaped reward for the `step`-th step of an episode
///
/// Reaching the goal pays [`GOAL_REWARD`] only while
/// `step < max_steps * GOAL_BONUS_CUTOFF`; a late arrival pays the plain
/// step penalty.
pub fn shaped_reward(terminated: bool, step: usize, max_steps: usize) -> Reward {
    if terminated && (step as f64) < max_steps as f64 * GOAL_BONUS_CUTOFF {
        GOAL_REWARD
    } else {
        STEP_PENALTY
    }
}

/// Exploration rate for a 1-based episode, decaying linearly to zero at the
/// last episode
pub fn decayed_epsilon(epsilon: f64, episode: usize, iter_count: usize) -> f64 {
    epsilon * (1.0 - episode as f64 / iter_count as f64)
}

/// Previous state-action pair of a running episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviousStep {
    pub state: Position,
    pub action: Action,
}

/// Where the solver stands between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    AwaitingEpisodeStart,
    MidEpisode(PreviousStep),
}

/// Loop-carried state of the current episode
#[derive(Debug, Clone)]
struct Session {
    phase: EpisodePhase,
    episode: usize,
    step: usize,
    epsilon: f64,
    q_old: f64,
    trace: EligibilityTrace,
    reached_goal: bool,
}

/// Online SARSA(lambda) over a dense `[row, col, action]` Q table
pub struct SarsaLambdaSolver {
    env: MazeEnvironment,
    q_values: ActionValueTable,
    /// Effective step size `alpha * (1 - lambda)`
    alpha: f64,
    gamma: f64,
    epsilon: f64,
    lambda: f64,
    iter_count: usize,
    max_steps: usize,
    rng: StdRng,
    session: Session,
}

impl SarsaLambdaSolver {
    pub fn new(mut env: MazeEnvironment, config: &SolverConfig) -> Result<Self> {
        config.validate()?;
        let start = env.start();
        if env.effective_actions(start)?.is_empty() {
            return Err(MazeError::NoEffectiveAction(start));
        }
        let mut rng = config.rng();
        let q_values = env.initial_action_values(&mut rng);
        let trace = EligibilityTrace::zeros(q_values.raw_dim());

        info!(
            "SARSA(lambda) solver ready: {} episodes of at most {} steps",
            config.iter_count, config.max_steps
        );

        Ok(Self {
            env,
            q_values,
            alpha: config.alpha * (1.0 - config.lambda),
            gamma: config.gamma,
            epsilon: config.epsilon,
            lambda: config.lambda,
            iter_count: config.iter_count,
            max_steps: config.max_steps,
            rng,
            session: Session {
                phase: EpisodePhase::AwaitingEpisodeStart,
                episode: 0,
                step: 0,
                epsilon: config.epsilon,
                q_old: 0.0,
                trace,
                reached_goal: false,
            },
        })
    }

    pub fn q_values(&self) -> &ActionValueTable {
        &self.q_values
    }

    pub fn trace(&self) -> &EligibilityTrace {
        &self.session.trace
    }

    pub fn phase(&self) -> EpisodePhase {
        self.session.phase
    }

    /// Current episode, 1-based; 0 before the first tick
    pub fn episode(&self) -> usize {
        self.session.episode
    }

    pub fn step(&self) -> usize {
        self.session.step
    }

    /// Exploration rate of the current episode
    pub fn current_epsilon(&self) -> f64 {
        self.session.epsilon
    }

    pub fn env(&self) -> &MazeEnvironment {
        &self.env
    }

    /// `max over actions of Q` per cell
    pub fn state_values(&self) -> StateValueTable {
        self.q_values
            .map_axis(Axis(2), |q| q.fold(f64::NEG_INFINITY, |a, &b| a.max(b)))
    }

    fn select(&mut self, state: Position, epsilon: f64) -> Result<(Action, usize)> {
        epsilon_greedy_for_action_value(&mut self.env, &self.q_values, state, epsilon, &mut self.rng)
    }

    /// Pick the first action, then commit the new episode; a failed pick
    /// leaves the session untouched
    fn start_episode(&mut self) -> Result<()> {
        let episode = self.session.episode + 1;
        let epsilon = decayed_epsilon(self.epsilon, episode, self.iter_count);
        let state = self.env.reset();
        let (action, _) = self.select(state, epsilon)?;

        let session = &mut self.session;
        session.episode = episode;
        session.step = 0;
        session.trace.fill(0.0);
        session.epsilon = epsilon;
        session.reached_goal = false;
        session.q_old = 0.0;
        session.phase = EpisodePhase::MidEpisode(PreviousStep { state, action });

        debug!(
            "Episode {} started, epsilon {:.4}",
            self.session.episode, self.session.epsilon
        );
        Ok(())
    }

    fn continue_episode(&mut self, prev: PreviousStep) -> Result<()> {
        self.session.step += 1;
        let transition = self.env.step(prev.action);
        let reward = shaped_reward(transition.terminated, self.session.step, self.max_steps);
        let epsilon = self.session.epsilon;
        let (action, action_index) = self.select(transition.next, epsilon)?;

        self.td_update(prev, transition.next, action_index, reward);

        self.session.reached_goal = transition.terminated;
        if transition.terminated || self.session.step >= self.max_steps {
            if transition.terminated {
                info!(
                    "Episode {} finished after {} timesteps",
                    self.session.episode, self.session.step
                );
            } else {
                debug!(
                    "Episode {} exhausted its {} step budget",
                    self.session.episode, self.max_steps
                );
            }
            self.session.phase = EpisodePhase::AwaitingEpisodeStart;
        } else {
            self.session.phase = EpisodePhase::MidEpisode(PreviousStep {
                state: transition.next,
                action,
            });
        }
        Ok(())
    }

    /// True-online TD(lambda) update with dutch traces
    fn td_update(&mut self, prev: PreviousStep, state: Position, action_index: usize, reward: Reward) {
        let prev_idx = [prev.state.row, prev.state.col, prev.action.index()];
        let next_idx = [state.row, state.col, action_index];
        let gamma_lambda = self.gamma * self.lambda;
        let session = &mut self.session;
        let q = &mut self.q_values;

        let delta = reward + self.gamma * q[next_idx] - q[prev_idx];

        let z_prev = session.trace[prev_idx];
        session.trace.mapv_inplace(|z| gamma_lambda * z);
        session.trace[prev_idx] += 1.0 - self.alpha * gamma_lambda * z_prev;

        let scale = self.alpha * (delta + q[prev_idx] - session.q_old);
        q.scaled_add(scale, &session.trace);
        let q_prev = q[prev_idx];
        q[prev_idx] -= self.alpha * (q_prev - session.q_old);

        session.q_old = q[next_idx];
    }

    fn progress_snapshot(&self) -> Result<Snapshot> {
        let colors = self.env.render_colors(Some(&self.state_values()))?;
        Ok(Snapshot::Progress(ProgressSnapshot {
            episode: self.session.episode,
            step: self.session.step,
            reached_goal: self.session.reached_goal,
            rgb: hex_rows(&colors),
            start: self.env.start(),
            goal: self.env.goal(),
            current_position: self.env.state(),
        }))
    }
}

impl Solver for SarsaLambdaSolver {
    fn name(&self) -> &str {
        "sarsalambda"
    }

    fn advance(&mut self) -> Result<Snapshot> {
        match self.session.phase {
            EpisodePhase::AwaitingEpisodeStart => {
                if self.is_finished() {
                    return Ok(Snapshot::Finished(FinishedSnapshot::new(
                        ValueDump::from(&self.q_values),
                        self.env.state(),
                    )));
                }
                self.start_episode()?;
            }
            EpisodePhase::MidEpisode(prev) => self.continue_episode(prev)?,
        }

        self.progress_snapshot()
    }

    fn is_finished(&self) -> bool {
        self.session.phase == EpisodePhase::AwaitingEpisodeStart
            && self.session.episode >= self.iter_count
    }

    fn params(&self) -> serde_json::Value {
        serde_json::json!({
            "algorithm": self.name(),
            "alpha": self.alpha,
            "gamma": self.gamma,
            "epsilon": self.epsilon,
            "lambda": self.lambda,
            "iter_count": self.iter_count,
            "max_steps": self.max_steps,
            "episode": self.session.episode,
            "step": self.session.step,
        })
    }
}
