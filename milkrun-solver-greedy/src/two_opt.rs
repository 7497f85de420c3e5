//! Bounded 2-opt improvement over an open visiting order.
//!
//! Reverses sequence segments and keeps only strictly cost-reducing
//! reversals. The depot at position 0 is never moved, and because the cost
//! matrix need not be symmetric each candidate is evaluated by recosting
//! the whole path rather than by the classic two-edge delta.

use milkrun_core::CostMatrix;

/// Tolerance below which a reversal does not count as an improvement,
/// preventing float jitter from cycling the search.
const EPSILON: f64 = 1e-9;

/// Sum of consecutive arc costs along `order`. Unreachable arcs propagate
/// as infinity, which no candidate comparison can beat.
pub(crate) fn path_cost(order: &[usize], matrix: &CostMatrix) -> f64 {
    order
        .windows(2)
        .map(|pair| matrix.cost(pair[0], pair[1]))
        .sum()
}

/// Run first-improvement 2-opt sweeps until convergence or `max_passes`.
///
/// Returns the number of sweeps executed. Candidates are scanned in a
/// fixed order so the result is deterministic for identical inputs.
pub(crate) fn improve(order: &mut [usize], matrix: &CostMatrix, max_passes: usize) -> usize {
    let len = order.len();
    if len < 3 {
        return 0;
    }

    let mut best_cost = path_cost(order, matrix);
    let mut passes = 0;
    while passes < max_passes {
        passes += 1;
        let mut improved = false;
        for i in 1..len - 1 {
            for j in i + 1..len {
                order[i..=j].reverse();
                let candidate = path_cost(order, matrix);
                if candidate + EPSILON < best_cost {
                    best_cost = candidate;
                    improved = true;
                } else {
                    order[i..=j].reverse();
                }
            }
        }
        if !improved {
            break;
        }
    }
    passes
}
