//! Stitched road-following itineraries.
//!
//! A [`StitchedItinerary`] is the end product of reconstruction: one
//! continuous polyline of road-graph node positions passing through the
//! nearest-node projection of every stop in solved order, plus per-leg
//! summaries for downstream presentation.

use geo::Coord;
use serde::Serialize;

/// Role of a stop within the final itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopMarker {
    /// First stop of the route.
    Origin,
    /// Intermediate stop.
    Waypoint,
    /// Last stop of the route.
    Destination,
}

impl StopMarker {
    /// Marker for the stop at `position` in a route of `count` stops.
    ///
    /// A single-stop route is marked as its own origin.
    #[must_use]
    pub fn for_position(position: usize, count: usize) -> Self {
        if position == 0 {
            Self::Origin
        } else if position + 1 == count {
            Self::Destination
        } else {
            Self::Waypoint
        }
    }
}

/// Summary of one leg between two consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegSummary {
    /// Position of the leg's origin stop in the visiting order.
    pub from_stop: usize,
    /// Position of the leg's destination stop in the visiting order.
    pub to_stop: usize,
    /// Number of road-graph nodes on the leg, endpoints included.
    pub node_count: usize,
    /// Road-following length of the leg in metres.
    pub length_m: f64,
}

/// A continuous road-following polyline through every stop.
///
/// The polyline is the concatenation of per-leg shortest paths with the
/// duplicated junction node dropped at each leg boundary. A single-stop
/// itinerary contains that stop's projected node and no legs.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchedItinerary {
    /// Road-graph node positions forming the polyline.
    pub points: Vec<Coord<f64>>,
    /// Per-leg summaries, in visiting order.
    pub legs: Vec<LegSummary>,
    /// Sum of the leg lengths in metres.
    pub total_length_m: f64,
}

impl StitchedItinerary {
    /// Number of legs in the itinerary.
    #[must_use]
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }
}
