//! Acquire road network graphs for a geographic region.

use geo::Coord;
use thiserror::Error;

use crate::RoadGraph;

/// Errors from [`RoadNetworkProvider::get_graph`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoadNetworkError {
    /// The requested radius was NaN, infinite, or not positive.
    #[error("radius {0} metres is not a positive finite distance")]
    InvalidRadius(f64),
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
    /// The response could not be parsed into a road graph.
    #[error("malformed road network response: {message}")]
    Malformed {
        /// Description of the contract violation.
        message: String,
    },
}

/// Fetch the road network around a centre point.
///
/// Implementers return every road segment within `radius_m` metres of
/// `center` as a [`RoadGraph`]. Callers are responsible for requesting a
/// radius large enough to cover all stops they intend to reconstruct over.
pub trait RoadNetworkProvider {
    /// Return the road graph for the region.
    fn get_graph(&self, center: Coord<f64>, radius_m: f64) -> Result<RoadGraph, RoadNetworkError>;
}
