//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request context (request ID, signed-in user)
//!
//! Route protection is done by the [`RequireAuth`] extractor rather than a
//! layer, so each handler states whether it is guarded.

pub mod auth;
pub mod context;

pub use auth::{AuthRejection, OptionalAuth, RequireAuth};
pub use context::{REQUEST_ID_HEADER, request_context_middleware};
