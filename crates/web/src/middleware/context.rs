//! Request context middleware.
//!
//! Tags every request with an ID and the signed-in user so log lines and
//! Sentry events can be correlated. The ID is taken from an upstream
//! `x-request-id` header when present, otherwise a UUID v4 is generated.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

use crate::state::AppState;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Record the request ID and user in the current span and the Sentry scope,
/// and echo the ID back in the response headers.
pub async fn request_context_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);
    let user = state
        .session()
        .current_identity()
        .map(|identity| identity.label().to_string());

    let span = Span::current();
    span.record("request_id", request_id.as_str());
    if let Some(user) = &user {
        span.record("user", user.as_str());
    }

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
