//! Map an abstract visiting order back onto a real road network.
//!
//! Given the ordered stop coordinates of a solved route and a read-only
//! [`milkrun_core::RoadGraph`], [`reconstruct`] projects every stop to its
//! nearest road node, finds the shortest road path for each consecutive
//! pair, and stitches the legs into one continuous itinerary. A single
//! disconnected leg aborts the whole reconstruction: the output is either
//! a complete itinerary or an explicit failure.

#![forbid(unsafe_code)]

mod dijkstra;
mod reconstruct;

pub use reconstruct::{reconstruct, ReconstructError};
