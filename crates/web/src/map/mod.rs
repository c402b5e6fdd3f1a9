//! Map exploration.
//!
//! # Layout
//!
//! - [`catalog`] - the static marker catalog
//! - [`surface`] - the narrow interface to the map widget
//! - [`scene`] - the widget implementation the web pages render from
//! - [`geolocation`] - device position queries
//! - [`links`] - directions/share URLs and the external opener
//! - [`controller`] - selection and geolocation state machine
//! - [`details`] - details panel presentation
//! - [`mount`] - mounts/unmounts the controller for the app

pub mod catalog;
pub mod controller;
pub mod details;
pub mod geolocation;
pub mod links;
pub mod mount;
pub mod scene;
pub mod surface;

pub use catalog::{CatalogError, MarkerCatalog};
pub use controller::{
    LocationOutcome, LocationRequest, MapContext, MapController, MapStatus, Selection,
};
pub use details::DetailsPanel;
pub use geolocation::{DeviceLocation, Geolocator, LocationError};
pub use links::{ExternalOpener, PendingRedirect};
pub use mount::{MapMount, SharedController};
pub use scene::{Scene, SceneFactory, SharedScene};
pub use surface::{
    Flight, MapSetup, MapSurface, MapView, Pin, PinId, PinKind, SurfaceError, SurfaceFactory,
    TileLayer,
};
