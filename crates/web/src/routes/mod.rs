//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Entry page (sign-in forms)
//! GET  /health                        - Health check
//!
//! # Sign-in
//! POST /auth/email                    - Email sign-in
//! POST /auth/phone/code               - Phone sign-in, send code
//! POST /auth/phone/verify             - Phone sign-in, verify code
//! POST /auth/phone/back               - Phone sign-in, back to number entry
//! POST /auth/social/{provider}        - Social sign-in
//! POST /auth/logout                   - Sign out
//!
//! # App (requires auth)
//! GET  /app                           - Redirects to /app/map
//! GET  /app/map                       - Map view
//! GET  /app/map/scene                 - Map widget state (JSON)
//! POST /app/map/pins/{pin}/click      - Marker click
//! POST /app/map/selection/close       - Close the details panel
//! POST /app/map/selection/navigate    - Directions to the selected marker
//! POST /app/map/selection/share       - Share the selected marker
//! POST /app/map/location              - Locate the device
//! GET  /app/chat                      - Chat view
//! POST /app/chat                      - Send a chat message
//! GET  /app/settings                  - Settings view
//! POST /app/settings/{preference}     - Toggle a preference
//! ```
//!
//! Anything else renders the not-found page.

pub mod chat;
pub mod entry;
pub mod map;
pub mod settings;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};

use crate::middleware::RequireAuth;
use crate::navigation::Route;
use crate::notify::Toast;
use crate::state::AppState;

// =============================================================================
// Page chrome
// =============================================================================

/// What every page renders around its content.
#[derive(Debug, Clone, Default)]
pub struct PageChrome {
    /// Toasts raised since the last rendered page.
    pub toasts: Vec<Toast>,
    pub dark_mode: bool,
    /// The tab to highlight in the app navigation.
    pub active: Option<Route>,
}

impl PageChrome {
    /// Take the pending toasts for a page showing `active`.
    #[must_use]
    pub fn take(state: &AppState, active: Option<Route>) -> Self {
        Self {
            toasts: state.toasts().drain(),
            dark_mode: state.preferences().dark_mode,
            active,
        }
    }

    /// Path of the highlighted tab, empty outside the app.
    #[must_use]
    pub fn active_path(&self) -> &'static str {
        self.active.map_or("", Route::path)
    }
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub chrome: PageChrome,
    pub path: String,
}

// =============================================================================
// Routers
// =============================================================================

/// Create the sign-in routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/email", post(entry::email_sign_in))
        .route("/phone/code", post(entry::send_phone_code))
        .route("/phone/verify", post(entry::verify_phone_code))
        .route("/phone/back", post(entry::phone_back))
        .route("/social/{provider}", post(entry::social_sign_in))
        .route("/logout", post(entry::logout))
}

/// Create the map routes router.
pub fn map_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(map::show))
        .route("/scene", get(map::scene))
        .route("/pins/{pin}/click", post(map::click_pin))
        .route("/selection/close", post(map::close_selection))
        .route("/selection/navigate", post(map::navigate))
        .route("/selection/share", post(map::share))
        .route("/location", post(map::locate))
}

/// Create the guarded app routes router.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(app_index))
        .nest("/map", map_routes())
        .route("/chat", get(chat::show).post(chat::send))
        .route("/settings", get(settings::show))
        .route("/settings/{preference}", post(settings::toggle))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(entry::show))
        .nest("/auth", auth_routes())
        .nest("/app", app_routes())
        .fallback(not_found)
}

/// The `/app` index. The guard redirects it before this runs.
async fn app_index(_auth: RequireAuth) -> Redirect {
    Redirect::to(Route::Map.path())
}

/// Render the not-found page.
pub async fn not_found(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), "no route");
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            chrome: PageChrome::take(&state, None),
            path: uri.path().to_string(),
        },
    )
}
