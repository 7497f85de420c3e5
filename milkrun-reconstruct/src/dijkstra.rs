//! Shortest road paths between projected stop nodes.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use milkrun_core::{NodeId, RoadGraph};

/// Heap entry for the search frontier.
#[derive(Debug, Clone, Copy)]
struct State {
    cost: f64,
    node: NodeId,
}

// The priority queue depends on `Ord`. Flip the ordering on cost so the
// queue becomes a min-heap, and compare nodes on ties to keep `PartialEq`
// and `Ord` consistent.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

/// Minimum-length path from `start` to `goal` over edge lengths.
///
/// Returns the node sequence (endpoints included) and its total length in
/// metres, or `None` when the nodes lie in disconnected components. A
/// search from a node to itself yields the single-node path of length 0.
pub(crate) fn shortest_path(
    graph: &RoadGraph,
    start: NodeId,
    goal: NodeId,
) -> Option<(Vec<NodeId>, f64)> {
    if start == goal {
        return Some((vec![start], 0.0));
    }

    let mut dist: HashMap<NodeId, f64> = HashMap::new();
    let mut prev: HashMap<NodeId, NodeId> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(start, 0.0);
    heap.push(State {
        cost: 0.0,
        node: start,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if node == goal {
            return Some((walk_back(&prev, start, goal), cost));
        }
        // Stale entry for a node already settled via a shorter path.
        if dist.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }
        for &(next, length) in graph.neighbours(node) {
            let candidate = cost + length;
            let better = dist.get(&next).map_or(true, |&best| candidate < best);
            if better {
                dist.insert(next, candidate);
                prev.insert(next, node);
                heap.push(State {
                    cost: candidate,
                    node: next,
                });
            }
        }
    }

    None
}

fn walk_back(prev: &HashMap<NodeId, NodeId>, start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        // Every settled node except the start has a predecessor.
        current = prev[&current];
        path.push(current);
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn diamond() -> RoadGraph {
        // Two routes from 1 to 4: via 2 (length 5) or via 3 (length 3).
        RoadGraph::new(
            vec![
                (1, coord(0.0, 0.0)),
                (2, coord(1.0, 1.0)),
                (3, coord(1.0, -1.0)),
                (4, coord(2.0, 0.0)),
            ],
            vec![(1, 2, 2.0), (2, 4, 3.0), (1, 3, 1.0), (3, 4, 2.0)],
        )
        .unwrap()
    }

    #[test]
    fn finds_the_shorter_of_two_routes() {
        let (path, length) = shortest_path(&diamond(), 1, 4).unwrap();
        assert_eq!(path, vec![1, 3, 4]);
        assert_eq!(length, 3.0);
    }

    #[test]
    fn same_node_is_a_zero_length_path() {
        let (path, length) = shortest_path(&diamond(), 2, 2).unwrap();
        assert_eq!(path, vec![2]);
        assert_eq!(length, 0.0);
    }

    #[test]
    fn disconnected_nodes_yield_none() {
        let graph = RoadGraph::new(
            vec![
                (1, coord(0.0, 0.0)),
                (2, coord(1.0, 0.0)),
                (3, coord(9.0, 9.0)),
            ],
            vec![(1, 2, 1.0)],
        )
        .unwrap();
        assert!(shortest_path(&graph, 1, 3).is_none());
    }

    #[test]
    fn path_is_symmetric_on_undirected_graphs() {
        let (forward, forward_len) = shortest_path(&diamond(), 1, 4).unwrap();
        let (backward, backward_len) = shortest_path(&diamond(), 4, 1).unwrap();
        let mut reversed = backward.clone();
        reversed.reverse();
        assert_eq!(forward, reversed);
        assert_eq!(forward_len, backward_len);
    }
}
