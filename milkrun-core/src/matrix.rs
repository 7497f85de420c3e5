//! Pairwise travel-cost matrices.
//!
//! A [`CostMatrix`] maps ordered stop-index pairs to a non-negative travel
//! cost. Matrices are validated on construction: they must be square, and
//! every entry must be either a finite non-negative value or the explicit
//! [`CostMatrix::UNREACHABLE`] sentinel. Providers must never encode a
//! missing edge as `0` or a negative number.

use thiserror::Error;

/// A validated square travel-cost matrix, stored row-major.
///
/// `cost(i, j)` is the cost of travelling from the `i`-th to the `j`-th
/// stop of the coordinate list the matrix was built for. The matrix is not
/// required to be symmetric.
///
/// # Examples
///
/// ```
/// use milkrun_core::CostMatrix;
///
/// # fn main() -> Result<(), milkrun_core::CostMatrixError> {
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0.0, 5.0, 9.0],
///     vec![5.0, 0.0, 3.0],
///     vec![9.0, 3.0, 0.0],
/// ])?;
/// assert_eq!(matrix.size(), 3);
/// assert_eq!(matrix.cost(0, 1), 5.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    size: usize,
    costs: Vec<f64>,
}

/// Errors returned by [`CostMatrix::from_rows`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostMatrixError {
    /// No rows were supplied.
    #[error("cost matrix must contain at least one row")]
    Empty,
    /// A row's length did not match the number of rows.
    #[error("cost matrix must be square: {rows} rows but row {row} has {len} entries")]
    NotSquare {
        /// Total number of rows supplied.
        rows: usize,
        /// Index of the offending row.
        row: usize,
        /// Length of the offending row.
        len: usize,
    },
    /// An entry was NaN or negative.
    #[error("cost from {from} to {to} is invalid: {value}")]
    InvalidCost {
        /// Origin index of the offending entry.
        from: usize,
        /// Destination index of the offending entry.
        to: usize,
        /// The rejected value.
        value: f64,
    },
}

impl CostMatrix {
    /// Sentinel cost marking an arc with no feasible route.
    pub const UNREACHABLE: f64 = f64::INFINITY;

    /// Validate and construct a matrix from nested rows.
    ///
    /// Accepts finite non-negative entries and the [`Self::UNREACHABLE`]
    /// sentinel; rejects NaN and negative values (including negative
    /// infinity).
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, CostMatrixError> {
        let size = rows.len();
        if size == 0 {
            return Err(CostMatrixError::Empty);
        }
        let mut costs = Vec::with_capacity(size * size);
        for (from, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(CostMatrixError::NotSquare {
                    rows: size,
                    row: from,
                    len: row.len(),
                });
            }
            for (to, &value) in row.iter().enumerate() {
                if value.is_nan() || value < 0.0 {
                    return Err(CostMatrixError::InvalidCost { from, to, value });
                }
                costs.push(value);
            }
        }
        Ok(Self { size, costs })
    }

    /// Number of stops covered by the matrix.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cost of the arc from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        assert!(from < self.size && to < self.size, "index out of range");
        self.costs[from * self.size + to]
    }

    /// Whether the arc from `from` to `to` carries a finite cost.
    #[must_use]
    pub fn is_reachable(&self, from: usize, to: usize) -> bool {
        self.cost(from, to).is_finite()
    }
}
