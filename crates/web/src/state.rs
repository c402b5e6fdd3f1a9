//! Application state shared across handlers.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use crate::config::WebConfig;
use crate::map::{
    Geolocator, MapContext, MapMount, MarkerCatalog, SceneFactory, SharedScene,
};
use crate::notify::ToastQueue;
use crate::services::auth::PhoneSignIn;
use crate::services::chat::ChatService;
use crate::services::settings::Preferences;
use crate::session::{SessionStore, SlotStorage};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Locks inside are never held
/// across an `.await`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    session: RwLock<SessionStore>,
    toasts: ToastQueue,
    map: MapMount,
    scene: SharedScene,
    phone: Mutex<PhoneSignIn>,
    chat: ChatService,
    preferences: Mutex<Preferences>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Web app configuration
    /// * `slot` - Storage holding the persisted identity; the session is
    ///   hydrated from it immediately
    #[must_use]
    pub fn new(config: WebConfig, slot: Box<dyn SlotStorage>) -> Self {
        let session = SessionStore::hydrate(slot);
        let toasts = ToastQueue::new();
        let scene = SharedScene::new();

        let geolocator = config
            .device_location
            .map(|device| Arc::new(device) as Arc<dyn Geolocator>);
        let map = MapMount::new(
            Arc::new(SceneFactory::new(scene.clone())),
            config.map.clone(),
            MarkerCatalog::builtin(),
            MapContext {
                notifier: Arc::new(toasts.clone()),
                geolocator,
            },
        );
        let chat = ChatService::new(config.chat_reply_delay);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                session: RwLock::new(session),
                toasts,
                map,
                scene,
                phone: Mutex::new(PhoneSignIn::default()),
                chat,
                preferences: Mutex::new(Preferences::default()),
            }),
        }
    }

    /// Get a reference to the web app configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Read access to the session store.
    pub fn session(&self) -> RwLockReadGuard<'_, SessionStore> {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access to the session store.
    pub fn session_mut(&self) -> RwLockWriteGuard<'_, SessionStore> {
        self.inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Pending toasts, drained by the next rendered page.
    #[must_use]
    pub fn toasts(&self) -> &ToastQueue {
        &self.inner.toasts
    }

    /// The map view lifecycle.
    #[must_use]
    pub fn map(&self) -> &MapMount {
        &self.inner.map
    }

    /// What the map widget currently shows.
    #[must_use]
    pub fn scene(&self) -> &SharedScene {
        &self.inner.scene
    }

    pub fn phone_sign_in(&self) -> MutexGuard<'_, PhoneSignIn> {
        self.inner
            .phone
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn chat(&self) -> &ChatService {
        &self.inner.chat
    }

    pub fn preferences(&self) -> MutexGuard<'_, Preferences> {
        self.inner
            .preferences
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
