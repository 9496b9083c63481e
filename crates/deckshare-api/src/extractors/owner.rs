//! `OwnerUser` extractor: pulls the owner JWT from the Authorization header,
//! validates it, and injects an [`OwnerContext`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use deckshare_core::error::AppError;
use deckshare_service::context::OwnerContext;

use super::bearer_token;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated deck owner available in handlers.
#[derive(Debug, Clone)]
pub struct OwnerUser(pub OwnerContext);

impl std::ops::Deref for OwnerUser {
    type Target = OwnerContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for OwnerUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::authentication("Missing or malformed Authorization header"))?;
        let claims = state.owner_decoder.decode(token)?;
        Ok(OwnerUser(OwnerContext::new(claims.user_id())))
    }
}
