//! Acquire travel-cost matrices for a set of stops.
//!
//! The [`CostMatrixProvider`] trait abstracts the retrieval of pairwise
//! travel costs between [`Stop`]s. Callers supply an ordered slice of stops
//! and receive a [`CostMatrix`] whose indices correspond 1:1 and in order to
//! the input.
//!
//! Providers are the only point where the system may suspend on external
//! I/O; callers own the retry and backoff policy around them. Transient
//! failures ([`MatrixError::Network`], [`MatrixError::Timeout`],
//! [`MatrixError::Http`]) may be retried; contract violations
//! ([`MatrixError::Service`], [`MatrixError::Malformed`]) are hard failures.

use thiserror::Error;

use crate::{CostMatrix, Stop};

/// Errors from [`CostMatrixProvider::get_matrix`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// No stops were provided.
    #[error("at least one stop is required")]
    EmptyInput,
    /// The provider could not be reached.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Description of the underlying transport failure.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Description of the failure.
        message: String,
    },
    /// The provider reported a service-level failure.
    #[error("matrix service error {code}: {message}")]
    Service {
        /// Service status code (e.g. OSRM's `InvalidQuery`).
        code: String,
        /// Service-supplied message, possibly empty.
        message: String,
    },
    /// The response could not be parsed into a matrix matching the input.
    #[error("malformed matrix response: {message}")]
    Malformed {
        /// Description of the contract violation.
        message: String,
    },
}

/// Fetch a pairwise cost matrix for an ordered set of stops.
///
/// Implementers must return a square `n x n` matrix where `n` equals the
/// number of input stops, with row/column order matching the input order.
/// Unreachable pairs are encoded as [`CostMatrix::UNREACHABLE`], never as
/// zero or a negative value.
pub trait CostMatrixProvider {
    /// Return the cost matrix for `stops`.
    fn get_matrix(&self, stops: &[Stop]) -> Result<CostMatrix, MatrixError>;
}
