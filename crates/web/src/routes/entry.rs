//! Entry page and sign-in route handlers.
//!
//! Every sign-in flow ends the same way: the fabricated identity is handed to
//! the session store, a toast is queued and the browser is sent to the map.
//! Form validation failures queue an error toast and return to the entry
//! page without touching the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;
use wayfarer_core::Identity;

use super::PageChrome;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::OptionalAuth;
use crate::navigation::Route;
use crate::notify::{Notifier, Toast};
use crate::services::auth::{self, AuthError, SocialProvider};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Email sign-in form data.
#[derive(Debug, Deserialize)]
pub struct EmailForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Phone number form data.
#[derive(Debug, Deserialize)]
pub struct PhoneForm {
    #[serde(default)]
    pub phone: String,
}

/// Verification code form data.
#[derive(Debug, Deserialize)]
pub struct CodeForm {
    #[serde(default)]
    pub code: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Entry page template.
#[derive(Template, WebTemplate)]
#[template(path = "entry.html")]
pub struct EntryTemplate {
    pub chrome: PageChrome,
    /// Who is signed in, if anyone.
    pub signed_in: Option<String>,
    /// Number the phone flow sent a code to.
    pub code_sent_to: Option<String>,
    pub providers: &'static [SocialProvider],
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the entry page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(identity): OptionalAuth,
) -> impl IntoResponse {
    let code_sent_to = state.phone_sign_in().phone().map(str::to_string);
    EntryTemplate {
        chrome: PageChrome::take(&state, None),
        signed_in: identity.map(|i| i.label().to_string()),
        code_sent_to,
        providers: &SocialProvider::ALL,
    }
}

/// Handle email sign-in.
#[instrument(skip_all)]
pub async fn email_sign_in(
    State(state): State<AppState>,
    Form(form): Form<EmailForm>,
) -> Result<Redirect> {
    let password = SecretString::from(form.password);
    match auth::email_sign_in(&form.email, &password) {
        Ok(identity) => complete_sign_in(&state, identity, "Signed in successfully!"),
        Err(e) => Ok(reject(&state, &e)),
    }
}

/// Start phone sign-in by "sending" a code.
#[instrument(skip_all)]
pub async fn send_phone_code(
    State(state): State<AppState>,
    Form(form): Form<PhoneForm>,
) -> Redirect {
    let sent = state.phone_sign_in().send_code(form.phone.trim());
    match sent {
        Ok(()) => {
            state.toasts().notify(Toast::success("OTP sent to your phone"));
            Redirect::to(Route::Entry.path())
        }
        Err(e) => reject(&state, &e),
    }
}

/// Finish phone sign-in with the code.
#[instrument(skip_all)]
pub async fn verify_phone_code(
    State(state): State<AppState>,
    Form(form): Form<CodeForm>,
) -> Result<Redirect> {
    let verified = state.phone_sign_in().verify(form.code.trim());
    match verified {
        Ok(identity) => complete_sign_in(&state, identity, "Signed in successfully!"),
        Err(e) => Ok(reject(&state, &e)),
    }
}

/// Return to phone number entry.
pub async fn phone_back(State(state): State<AppState>) -> Redirect {
    state.phone_sign_in().back();
    Redirect::to(Route::Entry.path())
}

/// Handle social sign-in.
#[instrument(skip_all, fields(provider = %provider))]
pub async fn social_sign_in(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Redirect> {
    let provider: SocialProvider = provider.parse()?;
    complete_sign_in(
        &state,
        provider.sign_in(),
        &format!("Signed in with {provider}!"),
    )
}

/// Sign out and return to the entry page.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Redirect {
    let navigation = state.session_mut().logout();
    state.map().unmount();
    *state.phone_sign_in() = auth::PhoneSignIn::default();
    clear_sentry_user();

    state.toasts().notify(Toast::success("Logged out successfully!"));
    Redirect::to(navigation.route().path())
}

// =============================================================================
// Helpers
// =============================================================================

fn complete_sign_in(state: &AppState, identity: Identity, message: &str) -> Result<Redirect> {
    state.session_mut().login(identity.clone()).map_err(AppError::from)?;
    set_sentry_user(&identity);

    state.toasts().notify(Toast::success(message));
    Ok(Redirect::to(Route::Map.path()))
}

fn reject(state: &AppState, error: &AuthError) -> Redirect {
    tracing::info!(error = %error, "sign-in form rejected");
    state.toasts().notify(Toast::error(error.to_string()));
    Redirect::to(Route::Entry.path())
}
