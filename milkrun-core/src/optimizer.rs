//! The route-optimisation seam.

use thiserror::Error;

use crate::{CostMatrix, RouteSolution};

/// Errors returned by [`RouteOptimizer::optimize`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizeError {
    /// The depot index was out of range for the matrix. Caller bug; not
    /// retryable.
    #[error("depot index {depot} is out of range for {size} stops")]
    InvalidInput {
        /// The rejected depot index.
        depot: usize,
        /// Number of stops in the matrix.
        size: usize,
    },
    /// No feasible visiting order exists, e.g. an unavoidable arc carries
    /// the unreachable sentinel. A normal outcome, distinguishable from
    /// success; never reported as an empty or partial route.
    #[error("no feasible visiting order exists for the given cost matrix")]
    NoSolution,
}

/// Produce a visiting order over all stops of a cost matrix.
///
/// Implementations must validate `depot < matrix.size()` before solving,
/// always return a full permutation starting at the depot on success, and
/// be deterministic for identical inputs. Optimisation is pure and
/// CPU-bound; implementations must not perform I/O.
/// Optimisers must be `Send + Sync` to operate safely across threads.
pub trait RouteOptimizer: Send + Sync {
    /// Solve for a visiting order starting at `depot`.
    fn optimize(&self, matrix: &CostMatrix, depot: usize) -> Result<RouteSolution, OptimizeError>;
}
