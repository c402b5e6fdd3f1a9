//! Authentication extractors.
//!
//! Route handlers in the guarded area take [`RequireAuth`]; the route guard
//! decides whether the request proceeds or is redirected.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use wayfarer_core::Identity;

use crate::navigation::{GuardDecision, Navigation, Route, guard};
use crate::state::AppState;

/// Extractor that requires a signed-in identity.
///
/// Unauthenticated requests are redirected to the entry page; the `/app`
/// index is redirected to the map.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(identity): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", identity.label())
/// }
/// ```
pub struct RequireAuth(pub Identity);

/// Rejection carrying the navigation the guard asked for.
#[derive(Debug)]
pub struct AuthRejection(pub Navigation);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        // 303 keeps the rejected URL out of the browser history.
        Redirect::to(self.0.route().path()).into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Nested routers see the URI with their prefix stripped.
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |original| original.0.path());
        let route = Route::from_path(path);
        let identity = state.session().current_identity().cloned();

        match guard(route, identity.is_some()) {
            GuardDecision::Redirect(navigation) => {
                tracing::debug!(
                    path,
                    to = navigation.route().path(),
                    "route guard redirect"
                );
                Err(AuthRejection(navigation))
            }
            GuardDecision::Allow => identity
                .map(Self)
                .ok_or(AuthRejection(Navigation::Replace(Route::Entry))),
        }
    }
}

/// Extractor that optionally gets the signed-in identity.
///
/// Unlike `RequireAuth`, this never rejects.
pub struct OptionalAuth(pub Option<Identity>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.session().current_identity().cloned()))
    }
}
