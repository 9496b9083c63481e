//! Optional viewer session bearer token.
//!
//! The token is only extracted here; the verification service decides
//! whether the link needs one and whether it matches.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::bearer_token;

/// Raw viewer session token, when the request carries one.
#[derive(Debug, Clone, Default)]
pub struct ViewerSession(pub Option<String>);

impl ViewerSession {
    /// The token, if present.
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ViewerSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ViewerSession(bearer_token(parts).map(str::to_string)))
    }
}
