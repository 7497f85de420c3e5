//! Property tests for the greedy optimiser.

use milkrun_core::{CostMatrix, RouteOptimizer};
use milkrun_solver_greedy::{GreedySolver, GreedySolverConfig};
use proptest::prelude::*;

/// Strategy producing a finite cost matrix with a zero diagonal and a
/// depot index inside it.
fn matrix_and_depot() -> impl Strategy<Value = (Vec<Vec<f64>>, usize)> {
    (1_usize..8).prop_flat_map(|n| {
        let rows = proptest::collection::vec(
            proptest::collection::vec(0.0_f64..1000.0, n),
            n,
        )
        .prop_map(move |mut rows| {
            for (i, row) in rows.iter_mut().enumerate() {
                row[i] = 0.0;
            }
            rows
        });
        (rows, 0..n)
    })
}

proptest! {
    #[test]
    fn output_is_a_permutation_starting_at_depot((rows, depot) in matrix_and_depot()) {
        let n = rows.len();
        let matrix = CostMatrix::from_rows(rows).expect("generated matrix is valid");
        let solution = GreedySolver::new()
            .optimize(&matrix, depot)
            .expect("finite matrices always solve");

        prop_assert_eq!(solution.order().len(), n);
        prop_assert_eq!(solution.order()[0], depot);
        let mut sorted: Vec<usize> = solution.order().to_vec();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn total_cost_is_the_sum_of_taken_arcs((rows, depot) in matrix_and_depot()) {
        let matrix = CostMatrix::from_rows(rows).expect("generated matrix is valid");
        let solution = GreedySolver::new()
            .optimize(&matrix, depot)
            .expect("finite matrices always solve");

        let looked_up: f64 = solution
            .order()
            .windows(2)
            .map(|pair| matrix.cost(pair[0], pair[1]))
            .sum();
        prop_assert!((solution.total_cost() - looked_up).abs() < 1e-9);
    }

    #[test]
    fn optimisation_is_deterministic((rows, depot) in matrix_and_depot()) {
        let matrix = CostMatrix::from_rows(rows).expect("generated matrix is valid");
        let solver = GreedySolver::new();
        let first = solver.optimize(&matrix, depot).expect("solvable");
        let second = solver.optimize(&matrix, depot).expect("solvable");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn two_opt_never_worsens_the_construction((rows, depot) in matrix_and_depot()) {
        let matrix = CostMatrix::from_rows(rows).expect("generated matrix is valid");
        let greedy_only = GreedySolver::with_config(GreedySolverConfig {
            two_opt: false,
            max_two_opt_passes: 0,
        })
        .optimize(&matrix, depot)
        .expect("solvable");
        let improved = GreedySolver::new()
            .optimize(&matrix, depot)
            .expect("solvable");

        prop_assert!(improved.total_cost() <= greedy_only.total_cost() + 1e-9);
    }
}
