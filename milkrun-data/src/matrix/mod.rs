//! Cost-matrix acquisition over HTTP.

mod osrm;
mod provider;

pub use provider::{HttpCostMatrixProvider, HttpCostMatrixProviderConfig, ProviderBuildError};
