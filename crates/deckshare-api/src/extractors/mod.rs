//! Custom Axum extractors.

pub mod json;
pub mod owner;
pub mod session;

pub use json::ValidatedJson;
pub use owner::OwnerUser;
pub use session::ViewerSession;

use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// The bearer credential of the request, if any.
pub(crate) fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
