//! Error types emitted by the milkrun CLI.

use std::path::PathBuf;

use milkrun_core::{MatrixError, OptimizeError, RoadNetworkError, StopError};
use milkrun_data::ProviderBuildError;
use milkrun_reconstruct::ReconstructError;
use thiserror::Error;

/// Errors emitted by the milkrun CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// The stops file could not be opened or decoded as CSV.
    #[error("failed to read stops file {path:?}: {source}")]
    ReadStops {
        /// Path to the stops file.
        path: PathBuf,
        /// Underlying CSV or IO failure.
        #[source]
        source: csv::Error,
    },
    /// A stops file row carried an out-of-range coordinate.
    #[error("stops file {path:?} row {row}: {source}")]
    InvalidStop {
        /// Path to the stops file.
        path: PathBuf,
        /// One-based data row number.
        row: usize,
        /// The coordinate validation failure.
        #[source]
        source: StopError,
    },
    /// The stops file held no data rows.
    #[error("stops file {path:?} contains no stops")]
    NoStops {
        /// Path to the stops file.
        path: PathBuf,
    },
    /// The stops file exceeded the configured stop limit.
    #[error("stops file {path:?} lists {count} stops; the limit is {limit}")]
    TooManyStops {
        /// Path to the stops file.
        path: PathBuf,
        /// Number of data rows found.
        count: usize,
        /// Configured maximum.
        limit: usize,
    },
    /// The depot index does not name a loaded stop.
    #[error("depot index {depot} is out of range for {count} stops")]
    DepotOutOfRange {
        /// Requested depot index.
        depot: usize,
        /// Number of loaded stops.
        count: usize,
    },
    /// Constructing an HTTP provider failed.
    #[error("failed to build provider for {base_url:?}: {source}")]
    BuildProvider {
        /// The configured service URL.
        base_url: String,
        /// Underlying construction failure.
        #[source]
        source: ProviderBuildError,
    },
    /// Fetching the travel-cost matrix failed.
    #[error("failed to fetch cost matrix: {0}")]
    FetchMatrix(#[from] MatrixError),
    /// The optimiser rejected the matrix or found no feasible route.
    #[error("failed to optimise route: {0}")]
    Optimize(#[from] OptimizeError),
    /// Fetching the road network failed.
    #[error("failed to fetch road network: {0}")]
    FetchRoads(#[from] RoadNetworkError),
    /// Mapping the solved route onto roads failed.
    #[error("failed to reconstruct road path: {0}")]
    Reconstruct(#[from] ReconstructError),
    /// Serialising the plan document failed.
    #[error("failed to serialise plan: {0}")]
    SerialisePlan(#[source] serde_json::Error),
    /// Writing the plan output failed.
    #[error("failed to write plan output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
