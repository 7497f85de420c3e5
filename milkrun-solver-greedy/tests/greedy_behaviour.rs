//! Behavioural tests for the greedy optimiser against the public contract.

use milkrun_core::{CostMatrix, OptimizeError, RouteOptimizer};
use milkrun_solver_greedy::{GreedySolver, GreedySolverConfig};
use rstest::{fixture, rstest};

#[fixture]
fn solver() -> GreedySolver {
    GreedySolver::new()
}

fn matrix(rows: Vec<Vec<f64>>) -> CostMatrix {
    CostMatrix::from_rows(rows).expect("test matrix should be valid")
}

#[rstest]
fn worked_example_from_three_stops(solver: GreedySolver) {
    // cost(A,B)=5, cost(A,C)=9, cost(B,C)=3, symmetric, depot=A.
    // Cheapest arc from A is B; C is the only remainder: [A, B, C], cost 8.
    let m = matrix(vec![
        vec![0.0, 5.0, 9.0],
        vec![5.0, 0.0, 3.0],
        vec![9.0, 3.0, 0.0],
    ]);
    let solution = solver.optimize(&m, 0).expect("solvable");
    assert_eq!(solution.order(), &[0, 1, 2]);
    assert_eq!(solution.total_cost(), 8.0);
}

#[rstest]
fn total_cost_matches_matrix_lookups(solver: GreedySolver) {
    let m = matrix(vec![
        vec![0.0, 2.0, 7.0, 4.0],
        vec![3.0, 0.0, 1.0, 9.0],
        vec![6.0, 2.0, 0.0, 5.0],
        vec![4.0, 8.0, 3.0, 0.0],
    ]);
    let solution = solver.optimize(&m, 1).expect("solvable");
    let looked_up: f64 = solution
        .order()
        .windows(2)
        .map(|pair| m.cost(pair[0], pair[1]))
        .sum();
    assert_eq!(solution.total_cost(), looked_up);
}

#[rstest]
fn repeated_solves_are_identical(solver: GreedySolver) {
    let m = matrix(vec![
        vec![0.0, 1.0, 1.0, 1.0],
        vec![1.0, 0.0, 1.0, 1.0],
        vec![1.0, 1.0, 0.0, 1.0],
        vec![1.0, 1.0, 1.0, 0.0],
    ]);
    let first = solver.optimize(&m, 0).expect("solvable");
    let second = solver.optimize(&m, 0).expect("solvable");
    assert_eq!(first, second);
}

#[rstest]
fn asymmetric_costs_are_respected(solver: GreedySolver) {
    // Leaving stop 0 towards 2 is cheap but the return direction is not;
    // the optimiser must read the directed entries.
    let m = matrix(vec![
        vec![0.0, 9.0, 1.0],
        vec![1.0, 0.0, 9.0],
        vec![9.0, 1.0, 0.0],
    ]);
    let solution = solver.optimize(&m, 0).expect("solvable");
    assert_eq!(solution.order(), &[0, 2, 1]);
    assert_eq!(solution.total_cost(), 2.0);
}

#[rstest]
fn improvement_pass_tightens_greedy_detours() {
    // Greedy from 0 takes the locally cheap arc to 2 and walks 0→2→1→3
    // (cost 2+1+2); reversing [2, 1] yields 0→1→2→3 (cost 2.5+1+1).
    let m = matrix(vec![
        vec![0.0, 2.5, 2.0, 3.0],
        vec![2.5, 0.0, 1.0, 2.0],
        vec![2.0, 1.0, 0.0, 1.0],
        vec![3.0, 2.0, 1.0, 0.0],
    ]);

    let greedy_only = GreedySolver::with_config(GreedySolverConfig {
        two_opt: false,
        max_two_opt_passes: 0,
    })
    .optimize(&m, 0)
    .expect("solvable");
    let improved = GreedySolver::new().optimize(&m, 0).expect("solvable");

    assert_eq!(greedy_only.order(), &[0, 2, 1, 3]);
    assert_eq!(greedy_only.total_cost(), 5.0);
    assert_eq!(improved.order(), &[0, 1, 2, 3]);
    assert_eq!(improved.total_cost(), 4.5);
}

#[rstest]
fn isolated_stop_is_reported_not_skipped(solver: GreedySolver) {
    let inf = CostMatrix::UNREACHABLE;
    let m = matrix(vec![
        vec![0.0, 2.0, inf],
        vec![2.0, 0.0, inf],
        vec![inf, inf, 0.0],
    ]);
    assert_eq!(solver.optimize(&m, 0), Err(OptimizeError::NoSolution));
}
