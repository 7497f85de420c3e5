//! Solved visiting orders.

use thiserror::Error;

use crate::CostMatrix;

/// An ordered visiting sequence over every stop of a cost matrix.
///
/// The sequence is a permutation of `0..n` whose first element is the
/// depot; `total_cost` is the sum of the `n - 1` consecutive arc costs. A
/// solution is produced once per optimisation call and immutable
/// thereafter.
///
/// # Examples
///
/// ```
/// use milkrun_core::{CostMatrix, RouteSolution};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0.0, 5.0, 9.0],
///     vec![5.0, 0.0, 3.0],
///     vec![9.0, 3.0, 0.0],
/// ])?;
/// let solution = RouteSolution::from_order(vec![0, 1, 2], &matrix)?;
/// assert_eq!(solution.total_cost(), 8.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSolution {
    order: Vec<usize>,
    total_cost: f64,
}

/// Errors returned by [`RouteSolution::from_order`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteSolutionError {
    /// The sequence length did not match the matrix size.
    #[error("sequence of length {len} does not cover {size} stops")]
    LengthMismatch {
        /// Length of the supplied sequence.
        len: usize,
        /// Matrix size the sequence must cover.
        size: usize,
    },
    /// An index was repeated or out of range.
    #[error("sequence is not a permutation: index {index}")]
    NotPermutation {
        /// The repeated or out-of-range index.
        index: usize,
    },
    /// A consecutive pair carried the unreachable sentinel cost.
    #[error("arc from {from} to {to} is unreachable")]
    UnreachableArc {
        /// Origin stop index.
        from: usize,
        /// Destination stop index.
        to: usize,
    },
}

impl RouteSolution {
    /// Validate an order against its matrix and derive the total cost.
    ///
    /// The order must be a permutation of `0..matrix.size()` and every
    /// consecutive arc must carry a finite cost.
    pub fn from_order(order: Vec<usize>, matrix: &CostMatrix) -> Result<Self, RouteSolutionError> {
        let size = matrix.size();
        if order.len() != size {
            return Err(RouteSolutionError::LengthMismatch {
                len: order.len(),
                size,
            });
        }
        let mut seen = vec![false; size];
        for &index in &order {
            if index >= size || seen[index] {
                return Err(RouteSolutionError::NotPermutation { index });
            }
            seen[index] = true;
        }
        let mut total_cost = 0.0;
        for pair in order.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if !matrix.is_reachable(from, to) {
                return Err(RouteSolutionError::UnreachableArc { from, to });
            }
            total_cost += matrix.cost(from, to);
        }
        Ok(Self { order, total_cost })
    }

    /// The visiting order, starting at the depot.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Sum of the consecutive arc costs along the order.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Number of stops visited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the solution covers no stops. Always false for validated
    /// solutions; present for slice-like ergonomics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn matrix() -> CostMatrix {
        CostMatrix::from_rows(vec![
            vec![0.0, 5.0, 9.0],
            vec![5.0, 0.0, 3.0],
            vec![9.0, 3.0, 0.0],
        ])
        .unwrap()
    }

    #[rstest]
    fn derives_total_cost(matrix: CostMatrix) {
        let solution = RouteSolution::from_order(vec![0, 1, 2], &matrix).unwrap();
        assert_eq!(solution.order(), &[0, 1, 2]);
        assert_eq!(solution.total_cost(), 8.0);
        assert_eq!(solution.len(), 3);
    }

    #[rstest]
    fn rejects_short_sequence(matrix: CostMatrix) {
        let err = RouteSolution::from_order(vec![0, 1], &matrix).unwrap_err();
        assert_eq!(err, RouteSolutionError::LengthMismatch { len: 2, size: 3 });
    }

    #[rstest]
    fn rejects_repeated_index(matrix: CostMatrix) {
        let err = RouteSolution::from_order(vec![0, 1, 1], &matrix).unwrap_err();
        assert_eq!(err, RouteSolutionError::NotPermutation { index: 1 });
    }

    #[rstest]
    fn rejects_unreachable_arc() {
        let matrix = CostMatrix::from_rows(vec![
            vec![0.0, CostMatrix::UNREACHABLE],
            vec![1.0, 0.0],
        ])
        .unwrap();
        let err = RouteSolution::from_order(vec![0, 1], &matrix).unwrap_err();
        assert_eq!(err, RouteSolutionError::UnreachableArc { from: 0, to: 1 });
    }

    #[rstest]
    fn single_stop_has_zero_cost() {
        let matrix = CostMatrix::from_rows(vec![vec![0.0]]).unwrap();
        let solution = RouteSolution::from_order(vec![0], &matrix).unwrap();
        assert_eq!(solution.total_cost(), 0.0);
    }
}
