//! Map interaction controller.
//!
//! Owns one map surface for its whole life: builds it, wires marker pins to
//! click handlers, tracks the selected marker and the user's position, and
//! releases everything on teardown. After teardown every event, including a
//! late geolocation completion, is ignored.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use url::Url;
use wayfarer_core::{LatLng, Marker};

use super::geolocation::{Geolocator, LocationError};
use super::links::{self, ExternalOpener};
use super::surface::{Flight, MapSetup, MapSurface, Pin, PinId, SurfaceFactory};
use crate::notify::{Notifier, Toast};

/// Collaborators handed to a controller.
#[derive(Clone)]
pub struct MapContext {
    pub notifier: Arc<dyn Notifier>,
    /// `None` when the device has no geolocation capability.
    pub geolocator: Option<Arc<dyn Geolocator>>,
}

/// The marker shown in the details panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    #[default]
    Closed,
    Open(Marker),
}

impl Selection {
    #[must_use]
    pub const fn marker(&self) -> Option<&Marker> {
        match self {
            Self::Closed => None,
            Self::Open(marker) => Some(marker),
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// Lifecycle status of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapStatus {
    /// The surface is up.
    Ready,
    /// The surface could not be built; the view shows a loading state forever.
    Stalled(String),
    /// Torn down.
    Unmounted,
}

/// How a location request ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationOutcome {
    Found(LatLng),
    Failed(LocationError),
    /// No geolocation capability; no query was made.
    NotSupported,
    /// The controller was torn down before the query completed.
    Abandoned,
}

/// Handle to an issued location request.
#[derive(Debug)]
pub enum LocationRequest {
    NotSupported,
    Pending(JoinHandle<LocationOutcome>),
}

impl LocationRequest {
    /// Wait for the request to finish.
    pub async fn outcome(self) -> LocationOutcome {
        match self {
            Self::NotSupported => LocationOutcome::NotSupported,
            Self::Pending(handle) => handle.await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "location task did not complete");
                LocationOutcome::Abandoned
            }),
        }
    }
}

pub struct MapController {
    surface: Option<Box<dyn MapSurface>>,
    handlers: HashMap<PinId, Marker>,
    location_pin: Option<PinId>,
    selection: Selection,
    user_location: Option<LatLng>,
    status: MapStatus,
    context: MapContext,
}

impl std::fmt::Debug for MapController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapController")
            .field("status", &self.status)
            .field("selection", &self.selection)
            .field("user_location", &self.user_location)
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

impl MapController {
    /// Build the surface and place one pin per marker.
    ///
    /// Never fails: if the surface cannot be constructed the error is logged
    /// and the controller is returned in [`MapStatus::Stalled`].
    pub fn initialize(
        factory: &dyn SurfaceFactory,
        setup: &MapSetup,
        markers: &[Marker],
        context: MapContext,
    ) -> Self {
        let mut controller = Self {
            surface: None,
            handlers: HashMap::new(),
            location_pin: None,
            selection: Selection::Closed,
            user_location: None,
            status: MapStatus::Ready,
            context,
        };

        match factory.create(&setup.view) {
            Ok(mut surface) => {
                surface.add_tile_layer(&setup.tiles);
                for marker in markers {
                    let pin = surface.add_pin(Pin::marker(marker));
                    controller.handlers.insert(pin, marker.clone());
                }
                tracing::info!(markers = markers.len(), "map initialized");
                controller.surface = Some(surface);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize map");
                controller.status = MapStatus::Stalled(e.to_string());
            }
        }

        controller
    }

    /// Release the surface and every handler. Idempotent.
    pub fn teardown(&mut self) {
        if self.status == MapStatus::Unmounted {
            return;
        }
        self.handlers.clear();
        self.location_pin = None;
        if let Some(mut surface) = self.surface.take() {
            surface.remove();
        }
        self.status = MapStatus::Unmounted;
        tracing::debug!("map torn down");
    }

    /// Dispatch a click on `pin`. Returns the newly selected marker.
    pub fn handle_click(&mut self, pin: PinId) -> Option<&Marker> {
        let marker = self.handlers.get(&pin).cloned();
        match marker {
            Some(marker) => {
                self.select_marker(marker);
                self.selection.marker()
            }
            None => {
                tracing::debug!(%pin, "click on pin without handler");
                None
            }
        }
    }

    /// Open the details panel for `marker`, replacing any open selection.
    pub fn select_marker(&mut self, marker: Marker) {
        if self.is_unmounted() {
            return;
        }
        tracing::debug!(marker = %marker.id, title = %marker.title, "marker selected");
        self.selection = Selection::Open(marker);
    }

    pub fn close_selection(&mut self) {
        if self.is_unmounted() {
            return;
        }
        self.selection = Selection::Closed;
    }

    /// Open directions to the selected marker.
    pub fn navigate(&self, opener: &dyn ExternalOpener) -> Option<Url> {
        let marker = self.selection.marker()?;
        self.open_link(opener, links::directions_url(marker), "Opening navigation...")
    }

    /// Share the selected marker.
    pub fn share(&self, opener: &dyn ExternalOpener) -> Option<Url> {
        let marker = self.selection.marker()?;
        self.open_link(opener, links::share_url(marker), "Opening WhatsApp...")
    }

    fn open_link(
        &self,
        opener: &dyn ExternalOpener,
        url: Result<Url, url::ParseError>,
        message: &str,
    ) -> Option<Url> {
        match url {
            Ok(url) => {
                opener.open(&url);
                self.context.notifier.notify(Toast::success(message));
                Some(url)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to build external link");
                None
            }
        }
    }

    /// Ask the device for its position.
    ///
    /// Without a geolocator this reports [`LocationRequest::NotSupported`]
    /// right away. Otherwise one query runs on a spawned task that only holds
    /// a weak handle to the controller, so a completion after teardown or
    /// drop is discarded. Must be called within a tokio runtime.
    pub fn request_user_location(this: &Arc<Mutex<Self>>) -> LocationRequest {
        let (geolocator, notifier) = {
            let controller = lock(this);
            (
                controller.context.geolocator.clone(),
                Arc::clone(&controller.context.notifier),
            )
        };

        let Some(geolocator) = geolocator else {
            tracing::info!("geolocation requested but not supported");
            notifier.notify(Toast::error("Geolocation is not supported on this device"));
            return LocationRequest::NotSupported;
        };

        let weak = Arc::downgrade(this);
        LocationRequest::Pending(tokio::spawn(async move {
            let result = geolocator.current_position().await;
            let Some(controller) = weak.upgrade() else {
                tracing::debug!("location arrived after the map was dropped");
                return LocationOutcome::Abandoned;
            };
            lock(&controller).apply_location(result)
        }))
    }

    /// Apply a finished position query.
    pub fn apply_location(&mut self, result: Result<LatLng, LocationError>) -> LocationOutcome {
        if self.is_unmounted() {
            tracing::debug!("location arrived after teardown");
            return LocationOutcome::Abandoned;
        }

        match result {
            Ok(position) => {
                self.user_location = Some(position);
                if let Some(surface) = self.surface.as_mut() {
                    surface.fly_to(Flight::to_location(position));
                    if let Some(previous) = self.location_pin.take() {
                        surface.remove_pin(previous);
                    }
                    self.location_pin = Some(surface.add_pin(Pin::current_location(position)));
                }
                tracing::info!(%position, "user location found");
                self.context.notifier.notify(Toast::success("Location found!"));
                LocationOutcome::Found(position)
            }
            Err(e) => {
                tracing::warn!(error = %e, "geolocation failed");
                self.context
                    .notifier
                    .notify(Toast::error("Couldn't get your location"));
                LocationOutcome::Failed(e)
            }
        }
    }

    // ===== Accessors =====

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub const fn user_location(&self) -> Option<LatLng> {
        self.user_location
    }

    #[must_use]
    pub const fn status(&self) -> &MapStatus {
        &self.status
    }

    /// Pin handles with their markers, in ID order.
    #[must_use]
    pub fn pins(&self) -> Vec<(PinId, &Marker)> {
        let mut pins: Vec<_> = self.handlers.iter().map(|(id, m)| (*id, m)).collect();
        pins.sort_by_key(|(id, _)| *id);
        pins
    }

    fn is_unmounted(&self) -> bool {
        self.status == MapStatus::Unmounted
    }
}

impl Drop for MapController {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn lock(controller: &Mutex<MapController>) -> MutexGuard<'_, MapController> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use tokio::sync::oneshot;
    use wayfarer_core::MarkerId;

    use super::*;
    use crate::map::catalog::MarkerCatalog;
    use crate::map::geolocation::DeviceLocation;
    use crate::map::links::PendingRedirect;
    use crate::map::surface::{MapView, PinKind, SurfaceError, TileLayer};
    use crate::notify::{ToastLevel, ToastQueue};

    // ===== Recording doubles =====

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Tiles,
        AddPin(PinKind),
        RemovePin(PinId),
        FlyTo(Flight),
        Remove,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<Call>>>,
        creations: Arc<Mutex<usize>>,
    }

    impl Recorder {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn creations(&self) -> usize {
            *self.creations.lock().unwrap()
        }
    }

    struct RecordingSurface {
        recorder: Recorder,
        next: i32,
    }

    impl RecordingSurface {
        fn record(&self, call: Call) {
            self.recorder
                .calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(call);
        }
    }

    impl MapSurface for RecordingSurface {
        fn add_tile_layer(&mut self, _layer: &TileLayer) {
            self.record(Call::Tiles);
        }

        fn add_pin(&mut self, pin: Pin) -> PinId {
            self.record(Call::AddPin(pin.kind));
            self.next += 1;
            PinId::new(self.next)
        }

        fn remove_pin(&mut self, pin: PinId) {
            self.record(Call::RemovePin(pin));
        }

        fn fly_to(&mut self, flight: Flight) {
            self.record(Call::FlyTo(flight));
        }

        fn remove(&mut self) {
            self.record(Call::Remove);
        }
    }

    impl SurfaceFactory for Recorder {
        fn create(&self, _view: &MapView) -> Result<Box<dyn MapSurface>, SurfaceError> {
            *self.creations.lock().unwrap() += 1;
            Ok(Box::new(RecordingSurface {
                recorder: self.clone(),
                next: 0,
            }))
        }
    }

    struct BrokenFactory;

    impl SurfaceFactory for BrokenFactory {
        fn create(&self, _view: &MapView) -> Result<Box<dyn MapSurface>, SurfaceError> {
            Err(SurfaceError::Unavailable("no canvas".to_string()))
        }
    }

    /// Resolves when the test sends a result.
    struct GatedLocator {
        rx: Mutex<Option<oneshot::Receiver<Result<LatLng, LocationError>>>>,
    }

    impl Geolocator for GatedLocator {
        fn current_position(&self) -> BoxFuture<'_, Result<LatLng, LocationError>> {
            let rx = self.rx.lock().unwrap().take();
            async move {
                match rx {
                    Some(rx) => rx.await.unwrap_or(Err(LocationError::Timeout)),
                    None => Err(LocationError::Timeout),
                }
            }
            .boxed()
        }
    }

    /// Each query takes the next receiver.
    struct QueuedLocator(Mutex<Vec<oneshot::Receiver<Result<LatLng, LocationError>>>>);

    impl Geolocator for QueuedLocator {
        fn current_position(&self) -> BoxFuture<'_, Result<LatLng, LocationError>> {
            let rx = self.0.lock().unwrap().remove(0);
            async move { rx.await.unwrap_or(Err(LocationError::Timeout)) }.boxed()
        }
    }

    // ===== Helpers =====

    fn setup() -> MapSetup {
        MapSetup {
            view: MapView {
                center: LatLng::new(51.505, -0.09).unwrap(),
                zoom: 3,
            },
            tiles: TileLayer::openstreetmap(),
        }
    }

    fn context(toasts: &ToastQueue, geolocator: Option<Arc<dyn Geolocator>>) -> MapContext {
        MapContext {
            notifier: Arc::new(toasts.clone()),
            geolocator,
        }
    }

    fn controller(recorder: &Recorder, toasts: &ToastQueue) -> MapController {
        MapController::initialize(
            recorder,
            &setup(),
            MarkerCatalog::builtin().all(),
            context(toasts, None),
        )
    }

    fn marker(id: i32) -> Marker {
        MarkerCatalog::builtin()
            .get(MarkerId::new(id))
            .cloned()
            .unwrap()
    }

    // ===== Lifecycle =====

    #[test]
    fn test_initialize_places_tiles_and_marker_pins() {
        let recorder = Recorder::default();
        let map = controller(&recorder, &ToastQueue::new());

        assert_eq!(recorder.creations(), 1);
        assert_eq!(*map.status(), MapStatus::Ready);
        assert_eq!(recorder.calls()[0], Call::Tiles);
        let pins = recorder
            .calls()
            .iter()
            .filter(|c| **c == Call::AddPin(PinKind::Marker))
            .count();
        assert_eq!(pins, 5);
        assert_eq!(map.pins().len(), 5);
        assert_eq!(*map.selection(), Selection::Closed);
    }

    #[test]
    fn test_failed_construction_stalls() {
        let map = MapController::initialize(
            &BrokenFactory,
            &setup(),
            MarkerCatalog::builtin().all(),
            context(&ToastQueue::new(), None),
        );
        assert!(matches!(map.status(), MapStatus::Stalled(reason) if reason.contains("no canvas")));
        assert!(map.pins().is_empty());
    }

    #[test]
    fn test_teardown_releases_surface_once() {
        let recorder = Recorder::default();
        let mut map = controller(&recorder, &ToastQueue::new());

        map.teardown();
        map.teardown();
        drop(map);

        let removes = recorder.calls().iter().filter(|c| **c == Call::Remove).count();
        assert_eq!(removes, 1);
    }

    #[test]
    fn test_drop_tears_down() {
        let recorder = Recorder::default();
        drop(controller(&recorder, &ToastQueue::new()));
        assert_eq!(recorder.calls().last(), Some(&Call::Remove));
    }

    // ===== Selection =====

    #[test]
    fn test_click_selects_marker() {
        let recorder = Recorder::default();
        let mut map = controller(&recorder, &ToastQueue::new());

        let (pin, expected) = map
            .pins()
            .into_iter()
            .find(|(_, m)| m.title == "Paris")
            .map(|(pin, m)| (pin, m.clone()))
            .unwrap();
        let selected = map.handle_click(pin).cloned();

        assert_eq!(selected, Some(expected.clone()));
        assert_eq!(*map.selection(), Selection::Open(expected));
    }

    #[test]
    fn test_click_unknown_pin_is_ignored() {
        let mut map = controller(&Recorder::default(), &ToastQueue::new());
        assert!(map.handle_click(PinId::new(999)).is_none());
        assert_eq!(*map.selection(), Selection::Closed);
    }

    #[test]
    fn test_reselect_replaces_and_close() {
        let mut map = controller(&Recorder::default(), &ToastQueue::new());

        map.select_marker(marker(1));
        map.select_marker(marker(2));
        assert_eq!(map.selection().marker().map(|m| m.id), Some(MarkerId::new(2)));

        map.close_selection();
        assert_eq!(*map.selection(), Selection::Closed);
        map.close_selection();
        assert_eq!(*map.selection(), Selection::Closed);
    }

    #[test]
    fn test_events_after_teardown_are_ignored() {
        let mut map = controller(&Recorder::default(), &ToastQueue::new());
        let pin = map.pins()[0].0;
        map.teardown();

        assert!(map.handle_click(pin).is_none());
        map.select_marker(marker(1));
        assert_eq!(*map.selection(), Selection::Closed);
    }

    // ===== Derived actions =====

    #[test]
    fn test_navigate_and_share_keep_selection() {
        let toasts = ToastQueue::new();
        let mut map = controller(&Recorder::default(), &toasts);
        let opener = PendingRedirect::new();

        assert!(map.navigate(&opener).is_none());
        assert!(opener.take().is_none());

        map.select_marker(marker(1));
        let url = map.navigate(&opener).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.google.com/maps/dir/?api=1&destination=40.7128,-74.006"
        );
        assert_eq!(opener.take(), Some(url));

        let share = map.share(&opener).unwrap();
        assert!(share.as_str().starts_with("https://wa.me/?text=Hey%2C%20check%20out"));
        assert_eq!(map.selection().marker().map(|m| m.id), Some(MarkerId::new(1)));

        let messages: Vec<_> = toasts.drain().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, ["Opening navigation...", "Opening WhatsApp..."]);
    }

    // ===== Geolocation =====

    #[tokio::test]
    async fn test_location_not_supported() {
        let toasts = ToastQueue::new();
        let recorder = Recorder::default();
        let map = Arc::new(Mutex::new(controller(&recorder, &toasts)));
        map.lock().unwrap().select_marker(marker(2));

        let outcome = MapController::request_user_location(&map).outcome().await;

        assert_eq!(outcome, LocationOutcome::NotSupported);
        assert!(map.lock().unwrap().user_location().is_none());
        assert_eq!(*map.lock().unwrap().selection(), Selection::Open(marker(2)));
        let toast = toasts.drain().pop().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert!(toast.message.contains("not supported"));
        assert!(!recorder.calls().iter().any(|c| matches!(c, Call::FlyTo(_))));
    }

    #[tokio::test]
    async fn test_location_found_flies_and_replaces_pin() {
        let toasts = ToastQueue::new();
        let recorder = Recorder::default();
        let first = LatLng::new(48.0, 2.0).unwrap();
        let second = LatLng::new(35.0, 139.0).unwrap();

        let map = Arc::new(Mutex::new(MapController::initialize(
            &recorder,
            &setup(),
            MarkerCatalog::builtin().all(),
            context(&toasts, Some(Arc::new(DeviceLocation::Fixed(first)))),
        )));

        let outcome = MapController::request_user_location(&map).outcome().await;
        assert_eq!(outcome, LocationOutcome::Found(first));
        assert_eq!(map.lock().unwrap().user_location(), Some(first));
        assert!(recorder.calls().contains(&Call::FlyTo(Flight::to_location(first))));

        map.lock().unwrap().apply_location(Ok(second));
        assert_eq!(map.lock().unwrap().user_location(), Some(second));

        let calls = recorder.calls();
        let location_pins = calls
            .iter()
            .filter(|c| **c == Call::AddPin(PinKind::CurrentLocation))
            .count();
        let removed = calls.iter().filter(|c| matches!(c, Call::RemovePin(_))).count();
        assert_eq!(location_pins, 2);
        assert_eq!(removed, 1);

        let messages: Vec<_> = toasts.drain().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, ["Location found!", "Location found!"]);
    }

    #[tokio::test]
    async fn test_location_failures_leave_position_unchanged() {
        for failure in [
            LocationError::PermissionDenied,
            LocationError::PositionUnavailable,
            LocationError::Timeout,
        ] {
            let toasts = ToastQueue::new();
            let map = Arc::new(Mutex::new(MapController::initialize(
                &Recorder::default(),
                &setup(),
                MarkerCatalog::builtin().all(),
                context(&toasts, Some(Arc::new(DeviceLocation::Failing(failure)))),
            )));

            let outcome = MapController::request_user_location(&map).outcome().await;
            assert_eq!(outcome, LocationOutcome::Failed(failure));
            assert!(map.lock().unwrap().user_location().is_none());

            let toast = toasts.drain().pop().unwrap();
            assert_eq!(toast.level, ToastLevel::Error);
            assert_eq!(toast.message, "Couldn't get your location");
        }
    }

    #[tokio::test]
    async fn test_completion_after_teardown_is_ignored() {
        let toasts = ToastQueue::new();
        let recorder = Recorder::default();
        let (tx, rx) = oneshot::channel();
        let locator = GatedLocator {
            rx: Mutex::new(Some(rx)),
        };

        let map = Arc::new(Mutex::new(MapController::initialize(
            &recorder,
            &setup(),
            MarkerCatalog::builtin().all(),
            context(&toasts, Some(Arc::new(locator))),
        )));

        let request = MapController::request_user_location(&map);
        map.lock().unwrap().teardown();
        tx.send(Ok(LatLng::new(1.0, 1.0).unwrap())).unwrap();

        assert_eq!(request.outcome().await, LocationOutcome::Abandoned);
        assert!(map.lock().unwrap().user_location().is_none());
        assert!(toasts.is_empty());
        assert!(!recorder.calls().iter().any(|c| matches!(c, Call::FlyTo(_))));
    }

    #[tokio::test]
    async fn test_completion_after_drop_is_ignored() {
        let toasts = ToastQueue::new();
        let (tx, rx) = oneshot::channel();
        let locator = GatedLocator {
            rx: Mutex::new(Some(rx)),
        };

        let map = Arc::new(Mutex::new(MapController::initialize(
            &Recorder::default(),
            &setup(),
            MarkerCatalog::builtin().all(),
            context(&toasts, Some(Arc::new(locator))),
        )));

        let request = MapController::request_user_location(&map);
        drop(map);
        tx.send(Ok(LatLng::new(1.0, 1.0).unwrap())).unwrap();

        assert_eq!(request.outcome().await, LocationOutcome::Abandoned);
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_requests_last_completed_wins() {
        let toasts = ToastQueue::new();
        let (tx_a, rx_a) = oneshot::channel();
        let (tx_b, rx_b) = oneshot::channel();

        let map = Arc::new(Mutex::new(MapController::initialize(
            &Recorder::default(),
            &setup(),
            MarkerCatalog::builtin().all(),
            context(&toasts, Some(Arc::new(QueuedLocator(Mutex::new(vec![rx_a, rx_b]))))),
        )));

        let a = MapController::request_user_location(&map);
        let b = MapController::request_user_location(&map);

        let later = LatLng::new(10.0, 10.0).unwrap();
        tx_b.send(Ok(LatLng::new(5.0, 5.0).unwrap())).unwrap();
        let _ = b.outcome().await;
        tx_a.send(Ok(later)).unwrap();
        let _ = a.outcome().await;

        assert_eq!(map.lock().unwrap().user_location(), Some(later));
    }
}
