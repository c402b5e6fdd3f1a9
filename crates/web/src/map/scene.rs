//! Scene-backed map widget.
//!
//! A [`SceneSurface`] keeps the widget state as plain data in a
//! [`SharedScene`]; the map page and `/app/map/scene` render from snapshots
//! of it.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use wayfarer_core::LatLng;

use super::surface::{
    Flight, MAX_ZOOM, MapSurface, MapView, Pin, PinId, SurfaceError, SurfaceFactory, TileLayer,
};

/// A pin as placed on the scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenePin {
    pub id: PinId,
    #[serde(flatten)]
    pub pin: Pin,
}

/// Everything currently drawn by the widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub center: LatLng,
    pub zoom: u8,
    pub tiles: Option<TileLayer>,
    pub pins: Vec<ScenePin>,
    /// Most recent fly-to, for the client to animate.
    pub flight: Option<Flight>,
}

impl Scene {
    fn new(view: &MapView) -> Self {
        Self {
            center: view.center,
            zoom: view.zoom,
            tiles: None,
            pins: Vec::new(),
            flight: None,
        }
    }
}

/// Scene slot shared between the widget and the pages.
///
/// Empty while no surface is alive.
#[derive(Debug, Clone, Default)]
pub struct SharedScene {
    inner: Arc<RwLock<Option<Scene>>>,
}

impl SharedScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current scene, `None` when no surface is alive.
    #[must_use]
    pub fn snapshot(&self) -> Option<Scene> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, scene: Option<Scene>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = scene;
    }

    fn update(&self, f: impl FnOnce(&mut Scene)) {
        if let Some(scene) = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            f(scene);
        }
    }
}

/// Builds [`SceneSurface`]s drawing into one [`SharedScene`].
#[derive(Debug, Clone)]
pub struct SceneFactory {
    scene: SharedScene,
}

impl SceneFactory {
    #[must_use]
    pub const fn new(scene: SharedScene) -> Self {
        Self { scene }
    }
}

impl SurfaceFactory for SceneFactory {
    fn create(&self, view: &MapView) -> Result<Box<dyn MapSurface>, SurfaceError> {
        if view.zoom > MAX_ZOOM {
            return Err(SurfaceError::ZoomOutOfRange(view.zoom));
        }
        self.scene.replace(Some(Scene::new(view)));
        Ok(Box::new(SceneSurface {
            scene: self.scene.clone(),
            next_pin: 1,
        }))
    }
}

/// Map widget whose state is a [`Scene`].
#[derive(Debug)]
pub struct SceneSurface {
    scene: SharedScene,
    next_pin: i32,
}

impl MapSurface for SceneSurface {
    fn add_tile_layer(&mut self, layer: &TileLayer) {
        let layer = layer.clone();
        self.scene.update(|scene| scene.tiles = Some(layer));
    }

    fn add_pin(&mut self, pin: Pin) -> PinId {
        let id = PinId::new(self.next_pin);
        self.next_pin += 1;
        self.scene.update(|scene| scene.pins.push(ScenePin { id, pin }));
        id
    }

    fn remove_pin(&mut self, pin: PinId) {
        self.scene.update(|scene| scene.pins.retain(|p| p.id != pin));
    }

    fn fly_to(&mut self, flight: Flight) {
        self.scene.update(|scene| {
            scene.center = flight.target;
            scene.zoom = flight.zoom;
            scene.flight = Some(flight);
        });
    }

    fn remove(&mut self) {
        self.scene.replace(None);
    }
}
