//! Road network graphs.
//!
//! A [`RoadGraph`] is the read-only road network a reconstruction runs
//! over: nodes with positions, undirected edges with a non-negative length
//! in metres, and an R*-tree over node positions for nearest-node lookup.
//! No component mutates a graph after construction.

use std::collections::HashMap;

use geo::Coord;
use rstar::{primitives::GeomWithData, RTree};
use thiserror::Error;

/// Identifier of a road-graph node (OSM node ids in practice).
pub type NodeId = u64;

type IndexedNode = GeomWithData<[f64; 2], NodeId>;

/// A validated, immutable road network.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use milkrun_core::RoadGraph;
///
/// # fn main() -> Result<(), milkrun_core::RoadGraphError> {
/// let graph = RoadGraph::new(
///     vec![
///         (1, Coord { x: 0.0, y: 0.0 }),
///         (2, Coord { x: 0.001, y: 0.0 }),
///     ],
///     vec![(1, 2, 111.0)],
/// )?;
/// assert_eq!(graph.nearest_node(Coord { x: 0.0002, y: 0.0 }), Some(1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RoadGraph {
    positions: HashMap<NodeId, Coord<f64>>,
    adjacency: HashMap<NodeId, Vec<(NodeId, f64)>>,
    index: RTree<IndexedNode>,
}

/// Errors returned by [`RoadGraph::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoadGraphError {
    /// The same node id appeared twice with different positions.
    #[error("node {id} was declared twice")]
    DuplicateNode {
        /// The repeated node id.
        id: NodeId,
    },
    /// An edge referenced a node that was not declared.
    #[error("edge ({from}, {to}) references unknown node {unknown}")]
    UnknownEndpoint {
        /// Edge origin.
        from: NodeId,
        /// Edge destination.
        to: NodeId,
        /// The undeclared endpoint.
        unknown: NodeId,
    },
    /// An edge length was NaN, infinite, or negative.
    #[error("edge ({from}, {to}) has invalid length {length}")]
    InvalidLength {
        /// Edge origin.
        from: NodeId,
        /// Edge destination.
        to: NodeId,
        /// The rejected length.
        length: f64,
    },
}

impl RoadGraph {
    /// Validate and construct a graph from nodes and undirected edges.
    ///
    /// Edge lengths are metres and must be finite and non-negative; both
    /// endpoints must be declared in `nodes`. Each undirected edge is
    /// stored in both directions.
    pub fn new(
        nodes: Vec<(NodeId, Coord<f64>)>,
        edges: Vec<(NodeId, NodeId, f64)>,
    ) -> Result<Self, RoadGraphError> {
        let mut positions = HashMap::with_capacity(nodes.len());
        let mut indexed = Vec::with_capacity(nodes.len());
        for (id, position) in nodes {
            if positions.insert(id, position).is_some() {
                return Err(RoadGraphError::DuplicateNode { id });
            }
            indexed.push(IndexedNode::new([position.x, position.y], id));
        }

        let mut adjacency: HashMap<NodeId, Vec<(NodeId, f64)>> = HashMap::new();
        for (from, to, length) in edges {
            if !length.is_finite() || length < 0.0 {
                return Err(RoadGraphError::InvalidLength { from, to, length });
            }
            for &endpoint in &[from, to] {
                if !positions.contains_key(&endpoint) {
                    return Err(RoadGraphError::UnknownEndpoint {
                        from,
                        to,
                        unknown: endpoint,
                    });
                }
            }
            adjacency.entry(from).or_default().push((to, length));
            adjacency.entry(to).or_default().push((from, length));
        }

        Ok(Self {
            positions,
            adjacency,
            index: RTree::bulk_load(indexed),
        })
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of a node, if declared.
    #[must_use]
    pub fn node_position(&self, id: NodeId) -> Option<Coord<f64>> {
        self.positions.get(&id).copied()
    }

    /// Neighbours of a node with edge lengths. Empty for unknown or
    /// isolated nodes.
    #[must_use]
    pub fn neighbours(&self, id: NodeId) -> &[(NodeId, f64)] {
        self.adjacency.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Nearest node to `point` in coordinate space, or `None` for an empty
    /// graph. Distance ties are broken by the lowest node id so projection
    /// stays deterministic.
    #[must_use]
    pub fn nearest_node(&self, point: Coord<f64>) -> Option<NodeId> {
        let mut candidates = self
            .index
            .nearest_neighbor_iter_with_distance_2(&[point.x, point.y]);
        let (first, best_distance) = candidates.next()?;
        let mut best = first.data;
        for (node, distance) in candidates {
            if distance > best_distance {
                break;
            }
            best = best.min(node.data);
        }
        Some(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[fixture]
    fn triangle() -> RoadGraph {
        RoadGraph::new(
            vec![
                (1, coord(0.0, 0.0)),
                (2, coord(1.0, 0.0)),
                (3, coord(0.0, 1.0)),
            ],
            vec![(1, 2, 100.0), (2, 3, 140.0)],
        )
        .unwrap()
    }

    #[rstest]
    fn stores_undirected_edges(triangle: RoadGraph) {
        assert_eq!(triangle.neighbours(1), &[(2, 100.0)]);
        assert_eq!(triangle.neighbours(2), &[(1, 100.0), (3, 140.0)]);
        assert!(triangle.neighbours(99).is_empty());
    }

    #[rstest]
    fn nearest_node_picks_closest(triangle: RoadGraph) {
        assert_eq!(triangle.nearest_node(coord(0.9, 0.1)), Some(2));
        assert_eq!(triangle.nearest_node(coord(-5.0, -5.0)), Some(1));
    }

    #[rstest]
    fn nearest_node_breaks_ties_by_lowest_id() {
        let graph = RoadGraph::new(
            vec![(7, coord(-1.0, 0.0)), (4, coord(1.0, 0.0))],
            Vec::new(),
        )
        .unwrap();
        // Both nodes are exactly one unit from the origin.
        assert_eq!(graph.nearest_node(coord(0.0, 0.0)), Some(4));
    }

    #[rstest]
    fn empty_graph_has_no_nearest_node() {
        let graph = RoadGraph::new(Vec::new(), Vec::new()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.nearest_node(coord(0.0, 0.0)), None);
    }

    #[rstest]
    fn rejects_duplicate_nodes() {
        let err = RoadGraph::new(
            vec![(1, coord(0.0, 0.0)), (1, coord(1.0, 1.0))],
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, RoadGraphError::DuplicateNode { id: 1 });
    }

    #[rstest]
    fn rejects_unknown_endpoints() {
        let err = RoadGraph::new(vec![(1, coord(0.0, 0.0))], vec![(1, 2, 10.0)]).unwrap_err();
        assert_eq!(
            err,
            RoadGraphError::UnknownEndpoint {
                from: 1,
                to: 2,
                unknown: 2
            }
        );
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_lengths(#[case] length: f64) {
        let nodes = vec![(1, coord(0.0, 0.0)), (2, coord(1.0, 0.0))];
        let err = RoadGraph::new(nodes, vec![(1, 2, length)]).unwrap_err();
        assert!(matches!(err, RoadGraphError::InvalidLength { .. }));
    }
}
