//! Settings route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::instrument;
use wayfarer_core::Identity;

use super::PageChrome;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::navigation::Route;
use crate::notify::{Notifier, Toast};
use crate::services::settings::{Preference, Preferences};
use crate::state::AppState;

/// A preference row with its current value.
pub struct PreferenceView {
    pub preference: Preference,
    pub enabled: bool,
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub chrome: PageChrome,
    pub identity: Identity,
    pub preferences: Vec<PreferenceView>,
}

impl SettingsTemplate {
    fn rows(preferences: &Preferences) -> Vec<PreferenceView> {
        Preference::ALL
            .into_iter()
            .map(|preference| PreferenceView {
                preference,
                enabled: preferences.get(preference),
            })
            .collect()
    }
}

/// Display the settings page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> impl IntoResponse {
    let preferences = SettingsTemplate::rows(&state.preferences());
    SettingsTemplate {
        chrome: PageChrome::take(&state, Some(Route::Settings)),
        identity,
        preferences,
    }
}

/// Flip a preference.
#[instrument(skip_all, fields(preference = %preference))]
pub async fn toggle(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(preference): Path<String>,
) -> Result<Redirect> {
    let preference: Preference = preference.parse().map_err(AppError::NotFound)?;
    let enabled = state.preferences().toggle(preference);
    tracing::info!(%preference, enabled, "preference toggled");

    if preference == Preference::DarkMode {
        let message = if enabled {
            "Dark mode activated"
        } else {
            "Light mode activated"
        };
        state.toasts().notify(Toast::success(message));
    }
    Ok(Redirect::to(Route::Settings.path()))
}
