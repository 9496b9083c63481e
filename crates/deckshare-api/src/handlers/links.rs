//! Owner link-management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use deckshare_entity::share::ShareLinkOptions;

use crate::dto::request::{CreateLinkRequest, ListLinksQuery, SetIdentifierRequest};
use crate::dto::response::{LinkCodeResponse, LinkResponse, SuccessResponse};
use crate::error::ApiError;
use crate::extractors::{OwnerUser, ValidatedJson};
use crate::state::AppState;

/// POST /links
pub async fn create_link(
    State(state): State<AppState>,
    owner: OwnerUser,
    ValidatedJson(req): ValidatedJson<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), ApiError> {
    let options = ShareLinkOptions {
        recipient_email: req.recipient_email,
        allowed_emails: req.allowed_emails,
        allowed_domains: req.allowed_domains,
        is_downloadable: req.is_downloadable,
        expires_in_days: req.expires_in_days,
        link_id: req.link_id,
    };

    let link = state
        .share_links
        .create(&owner, req.deck_id, req.access_level, options)
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// GET /links?deckId=
pub async fn list_links(
    State(state): State<AppState>,
    owner: OwnerUser,
    Query(query): Query<ListLinksQuery>,
) -> Result<Json<Vec<LinkResponse>>, ApiError> {
    let links = state.share_links.list(&owner, query.deck_id).await?;
    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// PUT /links/{token}/identifier
pub async fn set_identifier(
    State(state): State<AppState>,
    owner: OwnerUser,
    Path(token): Path<String>,
    ValidatedJson(req): ValidatedJson<SetIdentifierRequest>,
) -> Result<Json<LinkResponse>, ApiError> {
    let link = state
        .share_links
        .set_identifier(&owner, &token, &req.link_id)
        .await?;
    Ok(Json(link.into()))
}

/// DELETE /links/{token}
pub async fn revoke_link(
    State(state): State<AppState>,
    owner: OwnerUser,
    Path(token): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.share_links.revoke(&owner, &token).await?;
    Ok(Json(SuccessResponse::with_message("Share link revoked")))
}

/// POST /links/{token}/code
pub async fn issue_link_code(
    State(state): State<AppState>,
    owner: OwnerUser,
    Path(token): Path<String>,
) -> Result<Json<LinkCodeResponse>, ApiError> {
    let issued = state.share_links.issue_link_code(&owner, &token).await?;
    Ok(Json(LinkCodeResponse {
        code: issued.code,
        expires_at: issued.expires_at,
    }))
}
