//! Cheapest-arc construction heuristic.

use log::debug;
use milkrun_core::{CostMatrix, OptimizeError, RouteOptimizer, RouteSolution};

use crate::two_opt;

/// Configuration for [`GreedySolver`].
#[derive(Debug, Clone)]
pub struct GreedySolverConfig {
    /// Run the 2-opt improvement pass after construction.
    pub two_opt: bool,
    /// Upper bound on full 2-opt sweeps over the sequence.
    pub max_two_opt_passes: usize,
}

impl Default for GreedySolverConfig {
    fn default() -> Self {
        Self {
            two_opt: true,
            max_two_opt_passes: 16,
        }
    }
}

/// Route optimiser using cheapest-arc construction plus bounded 2-opt.
///
/// Construction repeatedly appends the unvisited stop with the lowest cost
/// from the current endpoint, breaking ties by the lowest index so results
/// are deterministic. If every remaining arc out of the current endpoint is
/// unreachable, the optimisation reports `NoSolution` rather than skipping
/// a stop.
///
/// # Examples
///
/// ```
/// use milkrun_core::{CostMatrix, RouteOptimizer};
/// use milkrun_solver_greedy::GreedySolver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0.0, 5.0, 9.0],
///     vec![5.0, 0.0, 3.0],
///     vec![9.0, 3.0, 0.0],
/// ])?;
/// let solution = GreedySolver::default().optimize(&matrix, 0)?;
/// assert_eq!(solution.order(), &[0, 1, 2]);
/// assert_eq!(solution.total_cost(), 8.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedySolver {
    config: GreedySolverConfig,
}

impl GreedySolver {
    /// Construct a solver using default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a solver with explicit configuration.
    pub fn with_config(config: GreedySolverConfig) -> Self {
        Self { config }
    }
}

impl RouteOptimizer for GreedySolver {
    fn optimize(&self, matrix: &CostMatrix, depot: usize) -> Result<RouteSolution, OptimizeError> {
        let size = matrix.size();
        if depot >= size {
            return Err(OptimizeError::InvalidInput { depot, size });
        }

        let mut order = cheapest_arc_order(matrix, depot)?;
        debug!(
            "cheapest-arc construction visited {} stops, cost {}",
            order.len(),
            two_opt::path_cost(&order, matrix)
        );

        if self.config.two_opt && size >= 3 {
            let passes = two_opt::improve(&mut order, matrix, self.config.max_two_opt_passes);
            debug!(
                "2-opt converged after {passes} passes, cost {}",
                two_opt::path_cost(&order, matrix)
            );
        }

        // Construction only takes finite arcs, so validation cannot fail
        // past this point.
        RouteSolution::from_order(order, matrix).map_err(|_| OptimizeError::NoSolution)
    }
}

/// Build a visiting order by cheapest-arc extension from the depot.
fn cheapest_arc_order(matrix: &CostMatrix, depot: usize) -> Result<Vec<usize>, OptimizeError> {
    let size = matrix.size();
    let mut visited = vec![false; size];
    visited[depot] = true;
    let mut order = Vec::with_capacity(size);
    order.push(depot);
    let mut current = depot;

    while order.len() < size {
        let mut best: Option<(usize, f64)> = None;
        for next in 0..size {
            if visited[next] {
                continue;
            }
            let cost = matrix.cost(current, next);
            if !cost.is_finite() {
                continue;
            }
            // Strict comparison over an ascending scan keeps the lowest
            // index on ties.
            if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                best = Some((next, cost));
            }
        }
        let Some((next, _)) = best else {
            return Err(OptimizeError::NoSolution);
        };
        visited[next] = true;
        order.push(next);
        current = next;
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn symmetric_triangle() -> CostMatrix {
        CostMatrix::from_rows(vec![
            vec![0.0, 5.0, 9.0],
            vec![5.0, 0.0, 3.0],
            vec![9.0, 3.0, 0.0],
        ])
        .unwrap()
    }

    #[rstest]
    fn picks_cheapest_arc_first(symmetric_triangle: CostMatrix) {
        let solution = GreedySolver::new().optimize(&symmetric_triangle, 0).unwrap();
        assert_eq!(solution.order(), &[0, 1, 2]);
        assert_eq!(solution.total_cost(), 8.0);
    }

    #[rstest]
    fn starts_at_requested_depot(symmetric_triangle: CostMatrix) {
        let solution = GreedySolver::new().optimize(&symmetric_triangle, 2).unwrap();
        assert_eq!(solution.order()[0], 2);
        assert_eq!(solution.order(), &[2, 1, 0]);
    }

    #[rstest]
    fn rejects_out_of_range_depot(symmetric_triangle: CostMatrix) {
        let err = GreedySolver::new()
            .optimize(&symmetric_triangle, 3)
            .unwrap_err();
        assert_eq!(err, OptimizeError::InvalidInput { depot: 3, size: 3 });
    }

    #[rstest]
    fn single_stop_yields_depot_only() {
        let matrix = CostMatrix::from_rows(vec![vec![0.0]]).unwrap();
        let solution = GreedySolver::new().optimize(&matrix, 0).unwrap();
        assert_eq!(solution.order(), &[0]);
        assert_eq!(solution.total_cost(), 0.0);
    }

    #[rstest]
    fn ties_break_by_lowest_index() {
        let matrix = CostMatrix::from_rows(vec![
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ])
        .unwrap();
        let solution = GreedySolver::new().optimize(&matrix, 0).unwrap();
        assert_eq!(solution.order(), &[0, 1, 2]);
    }

    #[rstest]
    fn unreachable_stop_forces_no_solution() {
        // Every arc into and out of stop 1 is unreachable; the stop cannot
        // be skipped, so the solve must fail.
        let inf = CostMatrix::UNREACHABLE;
        let matrix = CostMatrix::from_rows(vec![
            vec![0.0, inf, 2.0],
            vec![inf, 0.0, inf],
            vec![2.0, inf, 0.0],
        ])
        .unwrap();
        let err = GreedySolver::new().optimize(&matrix, 0).unwrap_err();
        assert_eq!(err, OptimizeError::NoSolution);
    }

    #[rstest]
    fn construction_without_improvement_is_available() {
        let config = GreedySolverConfig {
            two_opt: false,
            max_two_opt_passes: 0,
        };
        let matrix = CostMatrix::from_rows(vec![
            vec![0.0, 1.0, 10.0, 10.0],
            vec![1.0, 0.0, 1.0, 10.0],
            vec![10.0, 1.0, 0.0, 1.0],
            vec![10.0, 10.0, 1.0, 0.0],
        ])
        .unwrap();
        let solution = GreedySolver::with_config(config)
            .optimize(&matrix, 0)
            .unwrap();
        assert_eq!(solution.order(), &[0, 1, 2, 3]);
    }
}
