//! Cheapest-arc route construction with optional 2-opt improvement.
//!
//! [`GreedySolver`] implements `milkrun_core::RouteOptimizer` by extending
//! a partial route from its current endpoint with the cheapest arc to an
//! unvisited stop, then optionally tightening the result with a bounded
//! 2-opt pass. The route is an open path: it does not return to the depot.

#![forbid(unsafe_code)]

mod solver;
mod two_opt;

pub use solver::{GreedySolver, GreedySolverConfig};
