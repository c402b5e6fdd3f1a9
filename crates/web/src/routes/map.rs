//! Map view route handlers.

use std::sync::{MutexGuard, PoisonError};

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use super::PageChrome;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::map::{
    DetailsPanel, MapController, MapStatus, PendingRedirect, PinId, Scene, SharedController,
};
use crate::middleware::RequireAuth;
use crate::navigation::Route;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// A clickable marker pin.
pub struct PinView {
    pub id: PinId,
    pub title: String,
    pub coordinates: String,
}

/// Map page template.
#[derive(Template, WebTemplate)]
#[template(path = "map.html")]
pub struct MapTemplate {
    pub chrome: PageChrome,
    /// Why the map is stuck loading, if it is.
    pub stalled: Option<String>,
    pub pins: Vec<PinView>,
    pub panel: Option<DetailsPanel>,
    pub user_location: Option<String>,
    pub attribution: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the map, mounting it on first view.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, _auth: RequireAuth) -> impl IntoResponse {
    let controller = state.map().mount();
    let map = lock(&controller);

    let stalled = match map.status() {
        MapStatus::Stalled(reason) => Some(reason.clone()),
        MapStatus::Ready | MapStatus::Unmounted => None,
    };
    let pins = map
        .pins()
        .into_iter()
        .map(|(id, marker)| PinView {
            id,
            title: marker.title.clone(),
            coordinates: marker.position.to_string(),
        })
        .collect();
    let panel = DetailsPanel::for_selection(map.selection());
    let user_location = map.user_location().map(|p| p.to_string());
    drop(map);

    MapTemplate {
        chrome: PageChrome::take(&state, Some(Route::Map)),
        stalled,
        pins,
        panel,
        user_location,
        attribution: state.map().setup().tiles.attribution.clone(),
    }
}

/// What the map widget currently shows.
#[instrument(skip_all)]
pub async fn scene(State(state): State<AppState>, _auth: RequireAuth) -> Json<Option<Scene>> {
    let _controller = state.map().mount();
    Json(state.scene().snapshot())
}

/// A click on a pin.
#[instrument(skip_all, fields(pin = %pin))]
pub async fn click_pin(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(pin): Path<PinId>,
) -> Result<Redirect> {
    let controller = state.map().mount();
    let selected = lock(&controller)
        .handle_click(pin)
        .map(|marker| (marker.id.to_string(), marker.title.clone()));

    let (id, title) = selected.ok_or_else(|| AppError::NotFound(format!("pin {pin}")))?;
    add_breadcrumb(
        "map",
        "Selected marker",
        Some(&[("marker_id", id.as_str()), ("title", title.as_str())]),
    );
    Ok(Redirect::to(Route::Map.path()))
}

/// Close the details panel.
pub async fn close_selection(State(state): State<AppState>, _auth: RequireAuth) -> Redirect {
    if let Some(controller) = state.map().current() {
        lock(&controller).close_selection();
    }
    Redirect::to(Route::Map.path())
}

/// Open directions to the selected marker.
#[instrument(skip_all)]
pub async fn navigate(State(state): State<AppState>, _auth: RequireAuth) -> Redirect {
    open_external(&state, |map, opener| map.navigate(opener))
}

/// Share the selected marker.
#[instrument(skip_all)]
pub async fn share(State(state): State<AppState>, _auth: RequireAuth) -> Redirect {
    open_external(&state, |map, opener| map.share(opener))
}

/// Locate the device and center the map on it.
#[instrument(skip_all)]
pub async fn locate(State(state): State<AppState>, _auth: RequireAuth) -> Redirect {
    let controller = state.map().mount();
    let outcome = MapController::request_user_location(&controller)
        .outcome()
        .await;
    tracing::debug!(?outcome, "location request finished");
    Redirect::to(Route::Map.path())
}

// =============================================================================
// Helpers
// =============================================================================

fn lock(controller: &SharedController) -> MutexGuard<'_, MapController> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run a link action and redirect the browser to the opened URL. Without an
/// open selection the map is shown again.
fn open_external(
    state: &AppState,
    action: impl FnOnce(&MapController, &PendingRedirect) -> Option<url::Url>,
) -> Redirect {
    let opener = PendingRedirect::new();
    if let Some(controller) = state.map().current() {
        let map = lock(&controller);
        let _ = action(&*map, &opener);
    }

    opener.take().map_or_else(
        || Redirect::to(Route::Map.path()),
        |url| Redirect::to(url.as_str()),
    )
}
