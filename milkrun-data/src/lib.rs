//! External collaborators for the milkrun engine.
//!
//! This crate hosts the HTTP-backed implementations of the core provider
//! seams: a cost-matrix provider speaking the OSRM Table API and a road
//! network provider speaking the Overpass API. Both expose synchronous
//! trait surfaces and bridge to async HTTP internally.

#![forbid(unsafe_code)]

pub mod matrix;
pub mod network;

pub use matrix::{HttpCostMatrixProvider, HttpCostMatrixProviderConfig, ProviderBuildError};
pub use network::{OverpassRoadNetworkProvider, OverpassRoadNetworkProviderConfig};
