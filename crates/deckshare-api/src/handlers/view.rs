//! Deck content access.

use axum::Json;
use axum::extract::{Path, State};

use crate::dto::response::ViewResponse;
use crate::error::ApiError;
use crate::extractors::ViewerSession;
use crate::state::AppState;

/// GET /view/{token}
pub async fn view_deck(
    State(state): State<AppState>,
    Path(token): Path<String>,
    session: ViewerSession,
) -> Result<Json<ViewResponse>, ApiError> {
    let grant = state.verification.view(&token, session.token()).await?;
    Ok(Json(ViewResponse {
        url: grant.url,
        expires_in: grant.expires_in,
        is_downloadable: grant.is_downloadable,
    }))
}
