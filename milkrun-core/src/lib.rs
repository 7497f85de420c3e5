//! Core domain types for the milkrun route-planning engine.
//!
//! These models provide basic validation to keep downstream components
//! honest. Constructors return `Result` to surface invalid input early.
//! The algorithmic pieces live behind the [`RouteOptimizer`],
//! [`CostMatrixProvider`], and [`RoadNetworkProvider`] seams so that the
//! core stays free of I/O and solver internals.

#![forbid(unsafe_code)]

pub mod graph;
pub mod itinerary;
pub mod matrix;
pub mod network;
pub mod optimizer;
pub mod provider;
pub mod solution;
pub mod stop;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use graph::{NodeId, RoadGraph, RoadGraphError};
pub use itinerary::{LegSummary, StitchedItinerary, StopMarker};
pub use matrix::{CostMatrix, CostMatrixError};
pub use network::{RoadNetworkError, RoadNetworkProvider};
pub use optimizer::{OptimizeError, RouteOptimizer};
pub use provider::{CostMatrixProvider, MatrixError};
pub use solution::{RouteSolution, RouteSolutionError};
pub use stop::{Stop, StopError};
