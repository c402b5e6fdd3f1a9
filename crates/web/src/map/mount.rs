//! Map view lifecycle.
//!
//! The map view mounts when the map page is first shown and unmounts on
//! sign-out. A [`MapMount`] keeps the controller alive between requests so
//! the surface is built exactly once per mount.

use std::sync::{Arc, Mutex, PoisonError};

use super::catalog::MarkerCatalog;
use super::controller::{MapContext, MapController};
use super::surface::{MapSetup, SurfaceFactory};

/// Shared controller handle.
pub type SharedController = Arc<Mutex<MapController>>;

#[derive(Clone)]
pub struct MapMount {
    current: Arc<Mutex<Option<SharedController>>>,
    factory: Arc<dyn SurfaceFactory>,
    setup: MapSetup,
    catalog: MarkerCatalog,
    context: MapContext,
}

impl std::fmt::Debug for MapMount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapMount")
            .field("setup", &self.setup)
            .field("markers", &self.catalog.len())
            .field("mounted", &self.current().is_some())
            .finish_non_exhaustive()
    }
}

impl MapMount {
    #[must_use]
    pub fn new(
        factory: Arc<dyn SurfaceFactory>,
        setup: MapSetup,
        catalog: MarkerCatalog,
        context: MapContext,
    ) -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            factory,
            setup,
            catalog,
            context,
        }
    }

    /// The mounted controller, initializing one if the view is not mounted.
    #[must_use]
    pub fn mount(&self) -> SharedController {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(controller) = current.as_ref() {
            return Arc::clone(controller);
        }

        let controller = Arc::new(Mutex::new(MapController::initialize(
            self.factory.as_ref(),
            &self.setup,
            self.catalog.all(),
            self.context.clone(),
        )));
        *current = Some(Arc::clone(&controller));
        controller
    }

    /// The mounted controller, if any.
    #[must_use]
    pub fn current(&self) -> Option<SharedController> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Tear the view down. A no-op when nothing is mounted.
    pub fn unmount(&self) {
        let controller = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(controller) = controller {
            controller
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .teardown();
            tracing::debug!("map view unmounted");
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &MarkerCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn setup(&self) -> &MapSetup {
        &self.setup
    }
}
