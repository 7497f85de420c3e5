//! Geographic stops to be visited by a route.

use geo::Coord;
use thiserror::Error;

/// A single stop on the route: a position and an optional display name.
///
/// Positions follow the `geo` convention: `x` is longitude and `y` is
/// latitude, both in decimal degrees. Stops are immutable once constructed.
///
/// # Examples
///
/// ```
/// use milkrun_core::Stop;
///
/// # fn main() -> Result<(), milkrun_core::StopError> {
/// let stop = Stop::from_lat_lng(51.5, -0.1)?.with_name("Trafalgar Square");
/// assert_eq!(stop.location.y, 51.5);
/// assert_eq!(stop.name.as_deref(), Some("Trafalgar Square"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Geospatial position (`x` = longitude, `y` = latitude).
    pub location: Coord<f64>,
    /// Optional display name used when presenting solutions.
    pub name: Option<String>,
}

/// Errors returned by [`Stop::from_lat_lng`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StopError {
    /// Latitude was not a finite value in `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),
    /// Longitude was not a finite value in `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),
}

impl Stop {
    /// Construct a stop from a position without a name.
    pub fn new(location: Coord<f64>) -> Self {
        Self {
            location,
            name: None,
        }
    }

    /// Validate and construct a stop from latitude/longitude degrees.
    pub fn from_lat_lng(lat: f64, lng: f64) -> Result<Self, StopError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(StopError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(StopError::InvalidLongitude(lng));
        }
        Ok(Self::new(Coord { x: lng, y: lat }))
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
