//! Per-leg path search and stitching.

use geo::Coord;
use log::debug;
use milkrun_core::{LegSummary, NodeId, RoadGraph, StitchedItinerary};
use thiserror::Error;

use crate::dijkstra::shortest_path;

/// Errors returned by [`reconstruct`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructError {
    /// No coordinates were supplied. Caller bug; not retryable.
    #[error("at least one stop coordinate is required")]
    NoStops,
    /// The road graph contains no nodes, so no stop can be projected.
    #[error("road graph is empty; request a larger region")]
    EmptyGraph,
    /// Two consecutive stops project onto disconnected road components.
    /// Aborts the whole reconstruction; no partial itinerary is returned.
    #[error("no road path for leg {leg} (node {from_node} to node {to_node})")]
    UnreachableSegment {
        /// Index of the offending consecutive pair.
        leg: usize,
        /// Projected road node of the leg's origin stop.
        from_node: NodeId,
        /// Projected road node of the leg's destination stop.
        to_node: NodeId,
    },
}

/// Reconstruct the road-following itinerary for an ordered list of stops.
///
/// Each stop is projected to its nearest road node; each consecutive pair
/// is joined by the minimum-length road path; legs are concatenated with
/// the duplicated junction node dropped at every boundary. A single stop
/// yields an itinerary of its projected node and no legs.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use milkrun_core::RoadGraph;
/// use milkrun_reconstruct::reconstruct;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let graph = RoadGraph::new(
///     vec![
///         (1, Coord { x: 0.0, y: 0.0 }),
///         (2, Coord { x: 1.0, y: 0.0 }),
///     ],
///     vec![(1, 2, 120.0)],
/// )?;
/// let stops = [Coord { x: 0.1, y: 0.0 }, Coord { x: 0.9, y: 0.0 }];
/// let itinerary = reconstruct(&stops, &graph)?;
/// assert_eq!(itinerary.leg_count(), 1);
/// assert_eq!(itinerary.total_length_m, 120.0);
/// # Ok(())
/// # }
/// ```
pub fn reconstruct(
    stops: &[Coord<f64>],
    graph: &RoadGraph,
) -> Result<StitchedItinerary, ReconstructError> {
    if stops.is_empty() {
        return Err(ReconstructError::NoStops);
    }
    if graph.is_empty() {
        return Err(ReconstructError::EmptyGraph);
    }

    // Project every stop up front; a non-empty graph always has a nearest
    // node, so the lookup cannot fail past the guard above.
    let projected: Vec<NodeId> = stops
        .iter()
        .filter_map(|&stop| graph.nearest_node(stop))
        .collect();
    debug!("projected {} stops onto road nodes", projected.len());

    let mut points: Vec<Coord<f64>> = Vec::new();
    let mut legs: Vec<LegSummary> = Vec::new();
    let mut total_length_m = 0.0;

    if projected.len() == 1 {
        extend_with_positions(&mut points, graph, &projected, true);
        return Ok(StitchedItinerary {
            points,
            legs,
            total_length_m,
        });
    }

    for (leg, pair) in projected.windows(2).enumerate() {
        let (from_node, to_node) = (pair[0], pair[1]);
        let Some((path, length_m)) = shortest_path(graph, from_node, to_node) else {
            return Err(ReconstructError::UnreachableSegment {
                leg,
                from_node,
                to_node,
            });
        };
        debug!("leg {leg}: {} nodes, {length_m} m", path.len());

        legs.push(LegSummary {
            from_stop: leg,
            to_stop: leg + 1,
            node_count: path.len(),
            length_m,
        });
        total_length_m += length_m;
        // The first node of every leg after the first duplicates the
        // previous leg's endpoint; drop it while stitching.
        extend_with_positions(&mut points, graph, &path, leg == 0);
    }

    Ok(StitchedItinerary {
        points,
        legs,
        total_length_m,
    })
}

fn extend_with_positions(
    points: &mut Vec<Coord<f64>>,
    graph: &RoadGraph,
    path: &[NodeId],
    include_first: bool,
) {
    let skip = usize::from(!include_first);
    points.extend(
        path.iter()
            .skip(skip)
            .filter_map(|&node| graph.node_position(node)),
    );
}
