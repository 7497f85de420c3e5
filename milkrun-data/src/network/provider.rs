//! HTTP-based `RoadNetworkProvider` using the Overpass API.
//!
//! This module provides [`OverpassRoadNetworkProvider`], an implementation
//! of the `RoadNetworkProvider` trait that fetches highway geometry from an
//! Overpass instance and assembles it into a `RoadGraph`.
//!
//! # Architecture
//!
//! Like the cost-matrix provider, this provider bridges async HTTP calls
//! to the synchronous trait by blocking on a Tokio runtime internally.
//! Ways are requested with `out geom;` so node positions arrive inline and
//! no second round trip is needed.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use milkrun_core::RoadNetworkProvider;
//! use milkrun_data::OverpassRoadNetworkProvider;
//!
//! let provider = OverpassRoadNetworkProvider::new(
//!     "https://overpass-api.de/api/interpreter",
//! )?;
//! let graph = provider.get_graph(Coord { x: -0.1, y: 51.5 }, 2000.0)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashMap;
use std::time::Duration;

use geo::{Coord, Distance, Haversine, Point};
use log::debug;
use milkrun_core::{NodeId, RoadGraph, RoadNetworkError, RoadNetworkProvider};
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::overpass::{OverpassElement, OverpassResponse};
use crate::ProviderBuildError;

/// Default public Overpass endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Default user agent for Overpass requests.
const DEFAULT_USER_AGENT: &str = "milkrun-routing/0.1";

/// Default request timeout in seconds.
///
/// Overpass queries over a dense urban area can take noticeably longer
/// than a table lookup, so this is more generous than the matrix default.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for [`OverpassRoadNetworkProvider`].
#[derive(Debug, Clone)]
pub struct OverpassRoadNetworkProviderConfig {
    /// Full interpreter URL (e.g. `"https://overpass-api.de/api/interpreter"`).
    pub base_url: String,
    /// Request timeout duration, also sent as the server-side query timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OverpassRoadNetworkProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OVERPASS_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl OverpassRoadNetworkProviderConfig {
    /// Create a new configuration with the given interpreter URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP-based road-network provider using the Overpass API.
///
/// Queries every `highway` way within a radius of a centre point, then
/// builds an undirected [`RoadGraph`] whose edge lengths are haversine
/// distances between consecutive way nodes.
///
/// # Runtime behaviour
///
/// Identical to the cost-matrix provider: an internal runtime is used
/// unless the caller is already inside a multi-threaded Tokio runtime, in
/// which case that runtime's handle is used with
/// [`tokio::task::block_in_place`].
pub struct OverpassRoadNetworkProvider {
    client: Client,
    config: OverpassRoadNetworkProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for OverpassRoadNetworkProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverpassRoadNetworkProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl OverpassRoadNetworkProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OverpassRoadNetworkProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(
        config: OverpassRoadNetworkProviderConfig,
    ) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Build the Overpass QL query for the region.
    ///
    /// Requests every way tagged `highway` within `radius_m` metres of the
    /// centre, with inline geometry so node positions need no follow-up
    /// query.
    fn build_query(&self, center: Coord<f64>, radius_m: f64) -> String {
        format!(
            "[out:json][timeout:{}];way[highway](around:{radius_m},{},{});out geom;",
            self.config.timeout.as_secs(),
            center.y,
            center.x,
        )
    }

    /// Fetch the road graph asynchronously.
    async fn fetch_graph_async(
        &self,
        center: Coord<f64>,
        radius_m: f64,
    ) -> Result<RoadGraph, RoadNetworkError> {
        let url = &self.config.base_url;
        let query = self.build_query(center, radius_m);
        debug!(
            "requesting roads within {radius_m}m of ({}, {}) from Overpass",
            center.y, center.x
        );

        let response = self
            .client
            .post(url)
            .body(query)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        let overpass_response: OverpassResponse =
            response
                .json()
                .await
                .map_err(|err| RoadNetworkError::Malformed {
                    message: err.to_string(),
                })?;

        convert_response(overpass_response)
    }

    /// Convert a reqwest error to a `RoadNetworkError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RoadNetworkError {
        if error.is_timeout() {
            return RoadNetworkError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return RoadNetworkError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RoadNetworkError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Assemble a `RoadGraph` from decoded Overpass elements.
///
/// Non-way elements are skipped. Each way contributes its member nodes and
/// one edge per consecutive node pair, weighted by haversine distance.
/// Nodes shared between ways are inserted once, which is what joins the
/// ways into a connected graph.
fn convert_response(response: OverpassResponse) -> Result<RoadGraph, RoadNetworkError> {
    let mut positions: HashMap<NodeId, Coord<f64>> = HashMap::new();
    let mut edges: Vec<(NodeId, NodeId, f64)> = Vec::new();

    for element in &response.elements {
        if element.kind != "way" {
            continue;
        }
        let (node_ids, geometry) = way_members(element)?;

        for (&id, point) in node_ids.iter().zip(geometry) {
            positions.entry(id).or_insert(Coord {
                x: point.lon,
                y: point.lat,
            });
        }
        for (pair_ids, pair_points) in node_ids.windows(2).zip(geometry.windows(2)) {
            let length = Haversine.distance(
                Point::new(pair_points[0].lon, pair_points[0].lat),
                Point::new(pair_points[1].lon, pair_points[1].lat),
            );
            edges.push((pair_ids[0], pair_ids[1], length));
        }
    }

    RoadGraph::new(positions.into_iter().collect(), edges).map_err(|err| {
        RoadNetworkError::Malformed {
            message: err.to_string(),
        }
    })
}

/// Extract a way's node ids and geometry, checking they line up.
fn way_members(
    element: &OverpassElement,
) -> Result<(&[NodeId], &[super::overpass::OverpassPoint]), RoadNetworkError> {
    let node_ids = element
        .nodes
        .as_deref()
        .ok_or_else(|| RoadNetworkError::Malformed {
            message: format!("way {} has no node list", element.id),
        })?;
    let geometry = element
        .geometry
        .as_deref()
        .ok_or_else(|| RoadNetworkError::Malformed {
            message: format!("way {} has no geometry", element.id),
        })?;
    if node_ids.len() != geometry.len() {
        return Err(RoadNetworkError::Malformed {
            message: format!(
                "way {} lists {} nodes but {} geometry points",
                element.id,
                node_ids.len(),
                geometry.len()
            ),
        });
    }
    Ok((node_ids, geometry))
}

impl RoadNetworkProvider for OverpassRoadNetworkProvider {
    /// Fetch the road graph around the centre point.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must
    /// be multi-threaded. If called from within a `current_thread`
    /// runtime, the method falls back to using its own internal runtime,
    /// which may block the caller's runtime.
    fn get_graph(&self, center: Coord<f64>, radius_m: f64) -> Result<RoadGraph, RoadNetworkError> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(RoadNetworkError::InvalidRadius(radius_m));
        }

        let future = self.fetch_graph_async(center, radius_m);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
