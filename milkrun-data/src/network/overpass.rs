//! Overpass API response types.
//!
//! Deserialisation types for the subset of the Overpass JSON output the
//! road-network provider consumes: `way` elements with their member node
//! ids and inline geometry (the `out geom;` output mode).
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL>

use serde::Deserialize;

/// Top-level Overpass response.
#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    /// Matched elements; empty when the region holds no roads.
    #[serde(default)]
    pub(crate) elements: Vec<OverpassElement>,
}

/// A single Overpass element.
#[derive(Debug, Deserialize)]
pub(crate) struct OverpassElement {
    /// Element kind (`"way"`, `"node"`, ...).
    #[serde(rename = "type")]
    pub(crate) kind: String,
    /// OSM element id.
    pub(crate) id: u64,
    /// Member node ids, present on ways.
    pub(crate) nodes: Option<Vec<u64>>,
    /// Inline member positions, present on ways under `out geom;`.
    pub(crate) geometry: Option<Vec<OverpassPoint>>,
}

/// A latitude/longitude pair from way geometry.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct OverpassPoint {
    /// Latitude in decimal degrees.
    pub(crate) lat: f64,
    /// Longitude in decimal degrees.
    pub(crate) lon: f64,
}
