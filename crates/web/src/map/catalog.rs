//! The marker catalog.

use std::collections::HashSet;

use thiserror::Error;
use wayfarer_core::{LatLng, Marker, MarkerId};

/// Errors building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate marker id {0}")]
    DuplicateId(MarkerId),
}

/// Built-in points of interest: id, lat, lng, title, address.
const BUILTIN: &[(i32, f64, f64, &str, &str)] = &[
    (1, 40.7128, -74.006, "New York", "Manhattan, NY 10001, USA"),
    (2, 51.5074, -0.1278, "London", "Westminster, London, UK"),
    (3, 48.8566, 2.3522, "Paris", "Champ de Mars, Paris, France"),
    (4, 35.6762, 139.6503, "Tokyo", "Shinjuku, Tokyo, Japan"),
    (5, 37.7749, -122.4194, "San Francisco", "California, USA"),
];

/// A fixed set of markers with unique IDs, in display order.
#[derive(Debug, Clone)]
pub struct MarkerCatalog {
    markers: Vec<Marker>,
}

impl MarkerCatalog {
    /// The catalog shipped with the app.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_table(BUILTIN)
    }

    /// Build from a static table. A table with duplicate IDs yields an
    /// empty catalog.
    fn from_table(table: &[(i32, f64, f64, &str, &str)]) -> Self {
        let markers = table
            .iter()
            .filter_map(|&(id, lat, lng, title, address)| match LatLng::new(lat, lng) {
                Ok(position) => Some(Marker::new(MarkerId::new(id), position, title, address)),
                Err(e) => {
                    tracing::warn!(id, error = %e, "skipping built-in marker");
                    None
                }
            })
            .collect();
        Self::from_markers(markers).unwrap_or_else(|e| {
            tracing::error!(error = %e, "built-in marker table is invalid");
            Self {
                markers: Vec::new(),
            }
        })
    }

    /// Build a catalog from arbitrary markers.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two markers share an ID.
    pub fn from_markers(markers: Vec<Marker>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for marker in &markers {
            if !seen.insert(marker.id) {
                return Err(CatalogError::DuplicateId(marker.id));
            }
        }
        Ok(Self { markers })
    }

    #[must_use]
    pub fn all(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
