//! Road-network acquisition over HTTP.

mod overpass;
mod provider;

pub use provider::{OverpassRoadNetworkProvider, OverpassRoadNetworkProviderConfig};
