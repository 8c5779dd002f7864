//! Integration tests for the maze solvers
//!
//! These tests drive the solvers through the public `Solver` interface the
//! way an external caller would, one tick at a time.

#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]

use maze_core::{Action, ActionValueTable, MazeEnvironment, Position};
use maze_rl::policy::epsilon_greedy_for_action_value;
use maze_rl::sarsa::{decayed_epsilon, shaped_reward};
use maze_rl::{
    create_solver, Algorithm, SarsaLambdaSolver, Snapshot, Solver, SolverConfig,
    ValueIterationSolver,
};

const SMALL_MAZE: &str = "S..\n.#.\n..G";

const CORRIDOR_MAZE: &str = "\
S.#....
..#.##.
..#..#.
.....#G
";

fn sarsa_config(iter_count: usize, max_steps: usize, seed: u64) -> SolverConfig {
    SolverConfig {
        alpha: 0.1,
        gamma: 0.95,
        epsilon: 0.1,
        lambda: 0.2,
        iter_count,
        max_steps,
        seed: Some(seed),
        ..Default::default()
    }
}

/// Straight-line SARSA(lambda) with nested episode/step loops, stopped after
/// `ticks` units of work counted the same way the solver counts them.
fn uninterrupted_sarsa(text: &str, config: &SolverConfig, ticks: usize) -> ActionValueTable {
    let mut env = MazeEnvironment::parse(text).unwrap();
    let mut rng = config.rng();
    let mut q = env.initial_action_values(&mut rng);
    let mut z = ActionValueTable::zeros(q.raw_dim());
    let alpha = config.alpha * (1.0 - config.lambda);
    let gl = config.gamma * config.lambda;
    let mut done_ticks = 0;

    'episodes: for episode in 1..=config.iter_count {
        done_ticks += 1;
        z.fill(0.0);
        let epsilon = decayed_epsilon(config.epsilon, episode, config.iter_count);
        let mut prev_state = env.reset();
        let (mut prev_action, _) =
            epsilon_greedy_for_action_value(&mut env, &q, prev_state, epsilon, &mut rng).unwrap();
        let mut q_old = 0.0;
        if done_ticks == ticks {
            break;
        }

        for step in 1..=config.max_steps {
            done_ticks += 1;
            let t = env.step(prev_action);
            let reward = shaped_reward(t.terminated, step, config.max_steps);
            let (action, idx) =
                epsilon_greedy_for_action_value(&mut env, &q, t.next, epsilon, &mut rng).unwrap();

            let p = [prev_state.row, prev_state.col, prev_action.index()];
            let n = [t.next.row, t.next.col, idx];
            let delta = reward + config.gamma * q[n] - q[p];
            let z_p = z[p];
            z.mapv_inplace(|v| gl * v);
            z[p] += 1.0 - alpha * gl * z_p;
            let scale = alpha * (delta + q[p] - q_old);
            q.scaled_add(scale, &z);
            let q_p = q[p];
            q[p] -= alpha * (q_p - q_old);
            q_old = q[n];

            prev_state = t.next;
            prev_action = action;
            if done_ticks == ticks {
                break 'episodes;
            }
            if t.terminated {
                break;
            }
        }
    }

    q
}

#[test]
fn test_sarsa_ticks_match_uninterrupted_run() {
    let config = sarsa_config(30, 40, 2024);

    for ticks in [1, 2, 17, 250, 600] {
        let env = MazeEnvironment::parse(CORRIDOR_MAZE).unwrap();
        let mut solver = SarsaLambdaSolver::new(env, &config).unwrap();
        for _ in 0..ticks {
            solver.advance().unwrap();
        }

        let expected = uninterrupted_sarsa(CORRIDOR_MAZE, &config, ticks);
        assert_eq!(solver.q_values(), &expected, "diverged after {ticks} ticks");
    }
}

#[test]
fn test_same_seed_same_trajectory() {
    let config = sarsa_config(10, 60, 77);
    let mut a = create_solver(
        Algorithm::SarsaLambda,
        MazeEnvironment::parse(SMALL_MAZE).unwrap(),
        &config,
    )
    .unwrap();
    let mut b = create_solver(
        Algorithm::SarsaLambda,
        MazeEnvironment::parse(SMALL_MAZE).unwrap(),
        &config,
    )
    .unwrap();

    // Interleaved calls must not influence each other
    for _ in 0..400 {
        let snap_a = a.advance().unwrap();
        let snap_b = b.advance().unwrap();
        assert_eq!(snap_a, snap_b);
    }
    assert_eq!(a.params(), b.params());
}

#[test]
fn test_sarsa_runs_to_completion() {
    let config = sarsa_config(5, 30, 3);
    let env = MazeEnvironment::parse(SMALL_MAZE).unwrap();
    let mut solver = SarsaLambdaSolver::new(env, &config).unwrap();

    let mut ticks = 0;
    let mut last_episode = 0;
    while !solver.is_finished() {
        let snapshot = solver.advance().unwrap();
        let progress = snapshot.as_progress().expect("progress before finishing");
        assert!(progress.episode >= last_episode);
        assert!(progress.step <= config.max_steps);
        assert_eq!(progress.start, Position::new(0, 0));
        assert_eq!(progress.goal, Position::new(2, 2));
        last_episode = progress.episode;
        ticks += 1;
        assert!(ticks <= 5 * (30 + 1), "too many ticks");
    }

    assert_eq!(last_episode, 5);
    let finished = solver.advance().unwrap();
    assert!(finished.is_finished());
    let json = serde_json::to_value(&finished).unwrap();
    assert_eq!(json["finished"], true);
    assert!(json["current_position"].is_array());
    assert_eq!(json["values"].as_array().unwrap().len(), 3);
    assert_eq!(json["values"][0][0].as_array().unwrap().len(), 4);
}

#[test]
fn test_sarsa_learns_goal_bonus() {
    let config = sarsa_config(200, 100, 8);
    let env = MazeEnvironment::parse(SMALL_MAZE).unwrap();
    let mut solver = SarsaLambdaSolver::new(env, &config).unwrap();

    while !solver.is_finished() {
        solver.advance().unwrap();
    }

    let q = solver.q_values();
    let into_goal = q[[1, 2, Action::Down.index()]].max(q[[2, 1, Action::Right.index()]]);
    assert!(into_goal > 5.0, "goal transitions should carry the bonus: {into_goal}");
}

#[test]
fn test_value_iteration_converges_through_advance() {
    let config = SolverConfig {
        gamma: 0.9,
        iter_count: 40,
        seed: Some(4),
        ..Default::default()
    };
    let env = MazeEnvironment::parse(CORRIDOR_MAZE).unwrap();
    let mut solver = ValueIterationSolver::new(env, &config).unwrap();

    let mut snapshots = Vec::new();
    while !solver.is_finished() {
        snapshots.push(solver.advance().unwrap());
    }
    assert_eq!(snapshots.len(), 40);

    // Already at the fixed point
    assert_eq!(solver.sweep().unwrap(), 0.0);

    let last = snapshots.last().and_then(Snapshot::as_progress).unwrap();
    assert!(last.reached_goal);
    assert_eq!(last.current_position, Position::new(3, 6));
    // Shortest path: down 3, right 3, up 3, right 3, down 3
    assert_eq!(last.step, 15);
    assert_eq!(last.rgb.len(), 4);
    assert!(last.rgb.iter().all(|row| row.len() == 7));
}

#[test]
fn test_scenario_rollout_takes_four_steps() {
    let config = SolverConfig {
        iter_count: 20,
        seed: Some(99),
        ..Default::default()
    };
    let mut solver = create_solver(
        Algorithm::ValueIter,
        MazeEnvironment::parse(SMALL_MAZE).unwrap(),
        &config,
    )
    .unwrap();

    let mut last = None;
    while !solver.is_finished() {
        last = Some(solver.advance().unwrap());
    }

    let last = last.unwrap();
    let progress = last.as_progress().unwrap();
    assert!(progress.reached_goal);
    assert_eq!(progress.step, 4);

    // Coordinates go over the wire as [row, col] pairs
    let json = serde_json::to_value(&last).unwrap();
    assert_eq!(json["start"], serde_json::json!([0, 0]));
    assert_eq!(json["goal"], serde_json::json!([2, 2]));
    assert_eq!(json["current_position"], serde_json::json!([2, 2]));
}
