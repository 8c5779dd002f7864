//! Solver Benchmarks
//!
//! Benchmarks for the per-tick hot paths:
//! - SARSA(lambda) tick (dense trace decay over the whole Q table)
//! - Value-iteration sweep
//! - Render transform
//! - Epsilon-greedy action selection
//!
//! ## Performance Targets
//! - SARSA tick on a 20x20 maze: < 20µs
//! - Value-iteration sweep on a 20x20 maze: < 100µs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use maze_core::{MazeEnvironment, Position};
use maze_rl::policy::epsilon_greedy_for_action_value;
use maze_rl::{SarsaLambdaSolver, Solver, SolverConfig, ValueIterationSolver};

/// Open square maze with a wall every third cell on odd rows
fn square_maze(size: usize) -> String {
    let mut rows = Vec::with_capacity(size);
    for r in 0..size {
        let row: String = (0..size)
            .map(|c| match (r, c) {
                (0, 0) => 'S',
                _ if r == size - 1 && c == size - 1 => 'G',
                _ if r % 2 == 1 && c % 3 == 1 => '#',
                _ => '.',
            })
            .collect();
        rows.push(row);
    }
    rows.join("\n")
}

fn config() -> SolverConfig {
    SolverConfig {
        iter_count: usize::MAX / 2,
        max_steps: 500,
        seed: Some(1),
        ..Default::default()
    }
}

fn bench_sarsa_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("sarsa_tick");

    for size in [5, 10, 20] {
        let env = MazeEnvironment::parse(&square_maze(size)).unwrap();
        let mut solver = SarsaLambdaSolver::new(env, &config()).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(solver.advance().unwrap()));
        });
    }

    group.finish();
}

fn bench_value_iteration_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_iteration_sweep");

    for size in [5, 10, 20] {
        let env = MazeEnvironment::parse(&square_maze(size)).unwrap();
        let mut solver = ValueIterationSolver::new(env, &config()).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(solver.sweep().unwrap()));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let env = MazeEnvironment::parse(&square_maze(20)).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let values = env.initial_state_values(&mut rng);

    c.bench_function("render_colors_20x20", |b| {
        b.iter(|| black_box(env.render_colors(Some(&values)).unwrap()));
    });
}

fn bench_action_selection(c: &mut Criterion) {
    let mut env = MazeEnvironment::parse(&square_maze(20)).unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    let q = env.initial_action_values(&mut rng);
    let state = Position::new(2, 2);

    c.bench_function("epsilon_greedy_selection", |b| {
        b.iter(|| {
            black_box(
                epsilon_greedy_for_action_value(&mut env, &q, state, 0.1, &mut rng).unwrap(),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_sarsa_tick,
    bench_value_iteration_sweep,
    bench_render,
    bench_action_selection
);
criterion_main!(benches);
