//! Test-only, in-memory collaborator implementations used by unit and
//! behaviour tests across the workspace.

use geo::Coord;

use crate::{
    CostMatrix, CostMatrixProvider, MatrixError, NodeId, RoadGraph, RoadNetworkError,
    RoadNetworkProvider, Stop,
};

/// `CostMatrixProvider` returning a fixed matrix regardless of input.
///
/// The provider still enforces the empty-input contract so tests exercise
/// the same validation path as real providers.
#[derive(Debug, Clone)]
pub struct StaticMatrixProvider {
    matrix: CostMatrix,
}

impl StaticMatrixProvider {
    /// Create a provider that always returns `matrix`.
    pub fn new(matrix: CostMatrix) -> Self {
        Self { matrix }
    }
}

impl CostMatrixProvider for StaticMatrixProvider {
    fn get_matrix(&self, stops: &[Stop]) -> Result<CostMatrix, MatrixError> {
        if stops.is_empty() {
            return Err(MatrixError::EmptyInput);
        }
        Ok(self.matrix.clone())
    }
}

/// `RoadNetworkProvider` returning a fixed graph regardless of the region.
#[derive(Debug, Clone)]
pub struct StaticNetworkProvider {
    graph: RoadGraph,
}

impl StaticNetworkProvider {
    /// Create a provider that always returns `graph`.
    pub fn new(graph: RoadGraph) -> Self {
        Self { graph }
    }
}

impl RoadNetworkProvider for StaticNetworkProvider {
    fn get_graph(
        &self,
        _center: Coord<f64>,
        radius_m: f64,
    ) -> Result<RoadGraph, RoadNetworkError> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(RoadNetworkError::InvalidRadius(radius_m));
        }
        Ok(self.graph.clone())
    }
}

/// Build a fully connected rectangular grid graph for reconstruction tests.
///
/// Nodes are numbered row-major starting at 1 and placed `spacing` apart in
/// coordinate units; horizontal and vertical neighbours are joined by edges
/// of length `edge_m` metres.
///
/// # Panics
///
/// Panics if the grid dimensions are zero; test helper only.
#[must_use]
pub fn grid_graph(width: usize, height: usize, spacing: f64, edge_m: f64) -> RoadGraph {
    assert!(width > 0 && height > 0, "grid must be non-empty");
    let node_id = |col: usize, row: usize| -> NodeId { (row * width + col + 1) as NodeId };

    let mut nodes = Vec::with_capacity(width * height);
    let mut edges = Vec::new();
    for row in 0..height {
        for col in 0..width {
            nodes.push((
                node_id(col, row),
                Coord {
                    x: col as f64 * spacing,
                    y: row as f64 * spacing,
                },
            ));
            if col + 1 < width {
                edges.push((node_id(col, row), node_id(col + 1, row), edge_m));
            }
            if row + 1 < height {
                edges.push((node_id(col, row), node_id(col, row + 1), edge_m));
            }
        }
    }
    RoadGraph::new(nodes, edges).expect("grid graph construction is infallible")
}
