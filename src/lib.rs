//! Facade crate for the milkrun route-planning engine.
//!
//! This crate re-exports the core domain types and exposes the bundled
//! optimiser and road-path reconstruction implementations behind feature
//! flags.

#![forbid(unsafe_code)]

pub use milkrun_core::{
    CostMatrix, CostMatrixError, CostMatrixProvider, LegSummary, MatrixError, NodeId,
    OptimizeError, RoadGraph, RoadGraphError, RoadNetworkError, RoadNetworkProvider,
    RouteOptimizer, RouteSolution, RouteSolutionError, StitchedItinerary, Stop, StopError,
    StopMarker,
};

#[cfg(feature = "solver-greedy")]
pub use milkrun_solver_greedy::{GreedySolver, GreedySolverConfig};

#[cfg(feature = "reconstruct")]
pub use milkrun_reconstruct::{reconstruct, ReconstructError};
