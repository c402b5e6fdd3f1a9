//! Integration tests for Wayfarer.
//!
//! The app runs in-process: requests go straight through the router with
//! `tower::ServiceExt::oneshot`, and the session slot lives in a temporary
//! directory that survives [`TestApp::restart`].
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p wayfarer-integration-tests
//! ```

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tempfile::TempDir;
use tower::ServiceExt;
use wayfarer_web::config::WebConfig;
use wayfarer_web::session::{FileSlot, IDENTITY_SLOT_KEY, SlotStorage};
use wayfarer_web::state::AppState;

/// A running app backed by a temporary slot directory.
pub struct TestApp {
    dir: TempDir,
    env: Vec<(String, String)>,
    state: AppState,
    router: Router,
}

/// What a request produced.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// `Location` header of a redirect.
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Assert a 303 to `path`.
    #[track_caller]
    pub fn assert_redirect(&self, path: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(path));
    }
}

impl TestApp {
    /// Start with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Start with extra `WAYFARER_*` variables.
    #[must_use]
    pub fn with_env(vars: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create slot directory");
        let env = vars
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::start(dir, env)
    }

    fn start(dir: TempDir, env: Vec<(String, String)>) -> Self {
        let data_dir = dir.path().to_path_buf();
        let config = WebConfig::from_lookup(|key| {
            if key == "WAYFARER_DATA_DIR" {
                return Some(data_dir.display().to_string());
            }
            env.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .expect("Failed to build configuration");

        let state = AppState::new(config, Box::new(FileSlot::new(dir.path())));
        let router = wayfarer_web::router(state.clone());
        Self {
            dir,
            env,
            state,
            router,
        }
    }

    /// Simulate a relaunch: fresh in-memory state over the same slot.
    #[must_use]
    pub fn restart(self) -> Self {
        self.state.map().unmount();
        Self::start(self.dir, self.env)
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// The slot directory.
    #[must_use]
    pub fn slot(&self) -> FileSlot {
        FileSlot::new(self.dir.path())
    }

    /// File holding the persisted identity.
    #[must_use]
    pub fn identity_path(&self) -> PathBuf {
        self.slot()
            .path_for(IDENTITY_SLOT_KEY)
            .expect("identity key is valid")
    }

    /// Raw persisted identity record.
    #[must_use]
    pub fn persisted_identity(&self) -> Option<String> {
        self.slot()
            .read(IDENTITY_SLOT_KEY)
            .expect("Failed to read slot")
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// POST a urlencoded form.
    pub async fn post(&self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        let body = form
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sign in through the email form.
    pub async fn sign_in(&self, email: &str) {
        self.post("/auth/email", &[("email", email), ("password", "x")])
            .await
            .assert_redirect("/app/map");
    }

    /// The map scene as JSON, `null` when no map is mounted.
    pub async fn scene(&self) -> serde_json::Value {
        let response = self.get("/app/map/scene").await;
        assert_eq!(response.status, StatusCode::OK);
        serde_json::from_str(&response.body).expect("scene is JSON")
    }

    /// The pin ID drawn for the marker titled `title`.
    pub async fn pin_for(&self, title: &str) -> i64 {
        let scene = self.scene().await;
        scene["pins"]
            .as_array()
            .expect("scene has pins")
            .iter()
            .find(|pin| pin["label"] == title)
            .and_then(|pin| pin["id"].as_i64())
            .expect("pin for marker")
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
