//! HTTP-based `CostMatrixProvider` using OSRM's Table API.
//!
//! This module provides [`HttpCostMatrixProvider`], an implementation of
//! the `CostMatrixProvider` trait that fetches travel-cost matrices from an
//! OSRM routing service via HTTP.
//!
//! # Architecture
//!
//! The `CostMatrixProvider` trait is synchronous to keep the core library
//! embeddable in synchronous contexts. This provider bridges the async
//! HTTP calls to the sync interface by blocking on a Tokio runtime
//! internally.
//!
//! # Example
//!
//! ```no_run
//! use milkrun_data::HttpCostMatrixProvider;
//! use milkrun_core::{CostMatrixProvider, Stop};
//!
//! let provider = HttpCostMatrixProvider::new("http://router.project-osrm.org")?;
//! let stops = vec![
//!     Stop::from_lat_lng(51.5, -0.1)?,
//!     Stop::from_lat_lng(51.6, -0.2)?,
//! ];
//!
//! let matrix = provider.get_matrix(&stops)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Duration;

use log::debug;
use milkrun_core::{CostMatrix, CostMatrixProvider, MatrixError, Stop};
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::osrm::TableResponse;

/// Error type for provider construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "milkrun-routing/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpCostMatrixProvider`].
#[derive(Debug, Clone)]
pub struct HttpCostMatrixProviderConfig {
    /// Base URL for the OSRM service (e.g. `"http://router.project-osrm.org"`).
    pub base_url: String,
    /// OSRM routing profile segment of the table URL.
    pub profile: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpCostMatrixProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpCostMatrixProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the routing profile (e.g. `"driving"`, `"walking"`).
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
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

/// HTTP-based cost-matrix provider using the OSRM Table API.
///
/// This provider implements the synchronous `CostMatrixProvider` trait by
/// internally blocking on asynchronous HTTP requests. It owns a Tokio
/// runtime that is reused across calls, avoiding the overhead of creating
/// a new runtime per request.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the provider uses its own
/// stored runtime. When called from within an existing multi-threaded
/// Tokio runtime (detected via [`Handle::try_current()`]), it uses that
/// runtime's handle with [`tokio::task::block_in_place`] to avoid nested
/// runtime panics. When called from within a `current_thread` runtime, the
/// provider falls back to its own internal runtime.
pub struct HttpCostMatrixProvider {
    client: Client,
    config: HttpCostMatrixProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpCostMatrixProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCostMatrixProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpCostMatrixProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpCostMatrixProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpCostMatrixProviderConfig) -> Result<Self, ProviderBuildError> {
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

    /// Build the OSRM Table API URL for the given stops.
    ///
    /// The URL format is
    /// `{base_url}/table/v1/{profile}/{coordinates}?annotations=distance`
    /// where coordinates are semicolon-separated `lon,lat` pairs.
    fn build_table_url(&self, stops: &[Stop]) -> String {
        let coords: String = stops
            .iter()
            .map(|stop| format!("{},{}", stop.location.x, stop.location.y))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=distance",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }

    /// Fetch the cost matrix asynchronously.
    async fn fetch_matrix_async(&self, stops: &[Stop]) -> Result<CostMatrix, MatrixError> {
        let url = self.build_table_url(stops);
        debug!("requesting {}x{} table from OSRM", stops.len(), stops.len());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let table_response: TableResponse =
            response.json().await.map_err(|err| MatrixError::Malformed {
                message: err.to_string(),
            })?;

        self.convert_response(table_response, stops.len())
    }

    /// Convert a reqwest error to a `MatrixError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> MatrixError {
        if error.is_timeout() {
            return MatrixError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return MatrixError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        MatrixError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Convert an OSRM response into a validated `CostMatrix`.
    fn convert_response(
        &self,
        response: TableResponse,
        expected: usize,
    ) -> Result<CostMatrix, MatrixError> {
        if !response.is_ok() {
            return Err(MatrixError::Service {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        let distances = response.distances.ok_or_else(|| MatrixError::Malformed {
            message: "OSRM response missing distances array".to_string(),
        })?;

        if distances.len() != expected
            || distances.iter().any(|row| row.len() != expected)
        {
            return Err(MatrixError::Malformed {
                message: format!(
                    "OSRM returned a {} row table for {expected} coordinates",
                    distances.len()
                ),
            });
        }

        // Convert cells to costs, treating null as the unreachable
        // sentinel. Invalid values (negative, NaN, infinite) are also
        // treated as unreachable so the matrix constructor never rejects a
        // decodable response.
        let rows: Vec<Vec<f64>> = distances
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        cell.filter(|&v| v >= 0.0 && v.is_finite())
                            .unwrap_or(CostMatrix::UNREACHABLE)
                    })
                    .collect()
            })
            .collect();

        CostMatrix::from_rows(rows).map_err(|err| MatrixError::Malformed {
            message: err.to_string(),
        })
    }
}

impl CostMatrixProvider for HttpCostMatrixProvider {
    /// Fetch the cost matrix for the given stops.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must
    /// be multi-threaded. If called from within a `current_thread`
    /// runtime, the method falls back to using its own internal runtime,
    /// which may block the caller's runtime.
    fn get_matrix(&self, stops: &[Stop]) -> Result<CostMatrix, MatrixError> {
        if stops.is_empty() {
            return Err(MatrixError::EmptyInput);
        }

        // If we're already inside a Tokio runtime, check the runtime
        // flavour. block_in_place requires a multi-threaded runtime; for
        // current_thread runtimes we fall back to our own stored runtime.
        let future = self.fetch_matrix_async(stops);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn sample_stops() -> Vec<Stop> {
        vec![
            Stop::from_lat_lng(51.5, -0.1).unwrap(),
            Stop::from_lat_lng(51.6, -0.2).unwrap(),
        ]
    }

    fn provider() -> HttpCostMatrixProvider {
        HttpCostMatrixProvider::new("http://osrm.example.com").expect("provider should build")
    }

    #[rstest]
    fn build_table_url_formats_coordinates(sample_stops: Vec<Stop>) {
        let url = provider().build_table_url(&sample_stops);

        assert_eq!(
            url,
            "http://osrm.example.com/table/v1/driving/-0.1,51.5;-0.2,51.6?annotations=distance"
        );
    }

    #[rstest]
    fn build_table_url_strips_trailing_slash(sample_stops: Vec<Stop>) {
        let provider = HttpCostMatrixProvider::new("http://osrm.example.com/")
            .expect("provider should build");

        let url = provider.build_table_url(&sample_stops);

        assert!(url.starts_with("http://osrm.example.com/table/"));
        assert!(!url.contains("//table"));
    }

    #[rstest]
    fn build_table_url_honours_profile(sample_stops: Vec<Stop>) {
        let config =
            HttpCostMatrixProviderConfig::new("http://osrm.example.com").with_profile("walking");
        let provider =
            HttpCostMatrixProvider::with_config(config).expect("provider should build");

        let url = provider.build_table_url(&sample_stops);
        assert!(url.contains("/table/v1/walking/"));
    }

    #[rstest]
    fn convert_response_handles_success() {
        let response = TableResponse {
            code: "Ok".to_string(),
            message: None,
            distances: Some(vec![
                vec![Some(0.0), Some(1205.3)],
                vec![Some(1198.7), Some(0.0)],
            ]),
        };

        let matrix = provider().convert_response(response, 2).expect("should parse");

        assert_eq!(matrix.size(), 2);
        assert_eq!(matrix.cost(0, 1), 1205.3);
        assert_eq!(matrix.cost(1, 0), 1198.7);
        assert_eq!(matrix.cost(0, 0), 0.0);
    }

    #[rstest]
    fn convert_response_maps_nulls_to_unreachable() {
        let response = TableResponse {
            code: "Ok".to_string(),
            message: None,
            distances: Some(vec![vec![Some(0.0), None], vec![None, Some(0.0)]]),
        };

        let matrix = provider().convert_response(response, 2).expect("should parse");

        assert!(!matrix.is_reachable(0, 1));
        assert!(!matrix.is_reachable(1, 0));
    }

    #[rstest]
    fn convert_response_maps_invalid_cells_to_unreachable() {
        let response = TableResponse {
            code: "Ok".to_string(),
            message: None,
            distances: Some(vec![
                vec![Some(0.0), Some(-1.0), Some(f64::NAN)],
                vec![Some(f64::INFINITY), Some(0.0), Some(f64::NEG_INFINITY)],
                vec![Some(100.0), Some(200.0), Some(0.0)],
            ]),
        };

        let matrix = provider().convert_response(response, 3).expect("should parse");

        assert!(!matrix.is_reachable(0, 1));
        assert!(!matrix.is_reachable(0, 2));
        assert!(!matrix.is_reachable(1, 0));
        assert!(!matrix.is_reachable(1, 2));
        assert_eq!(matrix.cost(2, 0), 100.0);
        assert_eq!(matrix.cost(2, 1), 200.0);
    }

    #[rstest]
    fn convert_response_handles_service_error() {
        let response = TableResponse {
            code: "InvalidQuery".to_string(),
            message: Some("Too many coordinates".to_string()),
            distances: None,
        };

        let err = provider().convert_response(response, 2).expect_err("should fail");

        match err {
            MatrixError::Service { code, message } => {
                assert_eq!(code, "InvalidQuery");
                assert_eq!(message, "Too many coordinates");
            }
            _ => panic!("expected Service, got {err:?}"),
        }
    }

    #[rstest]
    fn convert_response_handles_missing_distances() {
        let response = TableResponse {
            code: "Ok".to_string(),
            message: None,
            distances: None,
        };

        let err = provider().convert_response(response, 2).expect_err("should fail");

        assert!(matches!(err, MatrixError::Malformed { .. }));
    }

    #[rstest]
    fn convert_response_rejects_dimension_mismatch() {
        let response = TableResponse {
            code: "Ok".to_string(),
            message: None,
            distances: Some(vec![vec![Some(0.0)]]),
        };

        let err = provider().convert_response(response, 2).expect_err("should fail");

        assert!(matches!(err, MatrixError::Malformed { .. }));
    }

    #[rstest]
    fn empty_input_returns_error() {
        let err = provider().get_matrix(&[]).expect_err("should fail");

        assert_eq!(err, MatrixError::EmptyInput);
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpCostMatrixProviderConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0")
            .with_profile("walking");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.profile, "walking");
    }
}
