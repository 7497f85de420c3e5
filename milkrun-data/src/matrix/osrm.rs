//! OSRM API response types for the Table service.
//!
//! This module provides deserialisation types for the OSRM Table API
//! response format. With `annotations=distance` the Table API returns the
//! road distance of the fastest route between all pairs of supplied
//! coordinates.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#table-service>

use serde::Deserialize;

/// OSRM Table API response.
///
/// The response contains either a distance matrix on success or an error
/// message on failure. The `code` field indicates the response status.
#[derive(Debug, Deserialize)]
pub(crate) struct TableResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"InvalidQuery"` - Invalid query parameters
    /// - `"NoTable"` - Table computation failed
    pub(crate) code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub(crate) message: Option<String>,

    /// Matrix of road distances in metres.
    ///
    /// `distances[i][j]` is the distance from the i-th to the j-th
    /// coordinate. Values are `None` when no route exists between a pair.
    pub(crate) distances: Option<Vec<Vec<Option<f64>>>>,
}

impl TableResponse {
    /// Check if the response indicates success.
    pub(crate) fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}
