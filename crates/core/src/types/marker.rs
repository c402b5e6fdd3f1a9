//! Map marker type.

use serde::{Deserialize, Serialize};

use super::{LatLng, MarkerId};

/// A named point of interest on the map.
///
/// Markers are immutable once built and owned by the marker catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Unique within its catalog.
    pub id: MarkerId,
    /// Where the marker sits.
    #[serde(flatten)]
    pub position: LatLng,
    /// Short name shown on the pin and in the details panel.
    pub title: String,
    /// Human-readable address.
    pub address: String,
}

impl Marker {
    /// Create a marker.
    #[must_use]
    pub fn new(
        id: MarkerId,
        position: LatLng,
        title: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id,
            position,
            title: title.into(),
            address: address.into(),
        }
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.position.lat()
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.position.lng()
    }
}
