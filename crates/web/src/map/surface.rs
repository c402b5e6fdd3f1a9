//! The map widget interface.
//!
//! The controller depends on nothing but these traits. Widgets are a
//! replaceable external collaborator: the web app renders from a
//! [`SceneSurface`](super::scene::SceneSurface), tests use recording doubles.

use serde::Serialize;
use thiserror::Error;
use wayfarer_core::{LatLng, Marker};

wayfarer_core::define_id!(PinId);

/// Deepest zoom level the widget supports.
pub const MAX_ZOOM: u8 = 19;

/// Zoom used when flying to the user's position.
pub const LOCATION_ZOOM: u8 = 15;

/// Duration of the fly-to animation, in milliseconds.
pub const FLIGHT_DURATION_MS: u64 = 1500;

/// Errors raised while constructing a surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The widget cannot be used at all.
    #[error("map widget unavailable: {0}")]
    Unavailable(String),

    /// The requested zoom level is beyond the widget's range.
    #[error("zoom level {0} is beyond the widget maximum of 19")]
    ZoomOutOfRange(u8),
}

/// Initial viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

/// Raster tile source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders.
    pub url_template: String,
    pub attribution: String,
}

impl TileLayer {
    pub const OPENSTREETMAP_URL: &'static str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
    pub const OPENSTREETMAP_ATTRIBUTION: &'static str = "&copy; OpenStreetMap contributors";

    #[must_use]
    pub fn openstreetmap() -> Self {
        Self {
            url_template: Self::OPENSTREETMAP_URL.to_string(),
            attribution: Self::OPENSTREETMAP_ATTRIBUTION.to_string(),
        }
    }
}

/// Everything needed to bring a map up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSetup {
    pub view: MapView,
    pub tiles: TileLayer,
}

/// How a pin is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinKind {
    /// A catalog marker.
    Marker,
    /// The distinguished "you are here" pin.
    CurrentLocation,
}

/// A point placed on the surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pin {
    #[serde(flatten)]
    pub position: LatLng,
    pub label: String,
    pub kind: PinKind,
}

impl Pin {
    #[must_use]
    pub fn marker(marker: &Marker) -> Self {
        Self {
            position: marker.position,
            label: marker.title.clone(),
            kind: PinKind::Marker,
        }
    }

    #[must_use]
    pub fn current_location(position: LatLng) -> Self {
        Self {
            position,
            label: "You are here".to_string(),
            kind: PinKind::CurrentLocation,
        }
    }
}

/// An animated viewport move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Flight {
    pub target: LatLng,
    pub zoom: u8,
    pub animate: bool,
    pub duration_ms: u64,
}

impl Flight {
    /// The flight used when centering on the user.
    #[must_use]
    pub const fn to_location(target: LatLng) -> Self {
        Self {
            target,
            zoom: LOCATION_ZOOM,
            animate: true,
            duration_ms: FLIGHT_DURATION_MS,
        }
    }
}

/// A live map widget.
pub trait MapSurface: Send {
    fn add_tile_layer(&mut self, layer: &TileLayer);

    /// Place a pin; the returned ID identifies it in click events.
    fn add_pin(&mut self, pin: Pin) -> PinId;

    fn remove_pin(&mut self, pin: PinId);

    fn fly_to(&mut self, flight: Flight);

    /// Release the widget and everything placed on it.
    fn remove(&mut self);
}

/// Constructs map widgets.
pub trait SurfaceFactory: Send + Sync {
    /// Build a surface showing `view`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] when the widget cannot be constructed.
    fn create(&self, view: &MapView) -> Result<Box<dyn MapSurface>, SurfaceError>;
}
