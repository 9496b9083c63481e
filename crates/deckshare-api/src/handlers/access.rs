//! Viewer access handlers: code request and check, requirements lookup and
//! the legacy verification paths.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use deckshare_service::access::LinkRequirements;

use crate::dto::request::{EmailAccessRequest, TokenQuery, VerifyCodeRequest, VerifyLinkCodeRequest};
use crate::dto::response::{CodeSentResponse, ResolveResponse, SuccessResponse, VerifyCodeResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /access/request-code
pub async fn request_code(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<EmailAccessRequest>,
) -> Result<Json<CodeSentResponse>, ApiError> {
    let receipt = state
        .verification
        .request_code(&req.token, &req.email)
        .await?;

    Ok(Json(CodeSentResponse {
        success: true,
        message: receipt.message,
        sent_to: receipt.sent_to,
    }))
}

/// POST /access/verify-code
pub async fn verify_code(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyCodeRequest>,
) -> Result<Json<VerifyCodeResponse>, ApiError> {
    let session = state
        .verification
        .verify_code(&req.token, &req.email, &req.code)
        .await?;

    Ok(Json(VerifyCodeResponse {
        success: true,
        access_token: session.access_token,
        expires_at: session.expires_at,
    }))
}

/// GET /access/requirements?token=
pub async fn requirements(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<LinkRequirements>, ApiError> {
    Ok(Json(state.verification.requirements(&query.token).await?))
}

/// POST /access/evaluate
pub async fn evaluate(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<EmailAccessRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .verification
        .evaluate_email(&req.token, &req.email)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /access/verify-link-code
pub async fn verify_link_code(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyLinkCodeRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .verification
        .verify_link_code(&req.token, &req.code)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// GET /access/resolve/{owner_id}/{identifier}
pub async fn resolve(
    State(state): State<AppState>,
    Path((owner_id, identifier)): Path<(Uuid, String)>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let token = state
        .share_links
        .resolve_identifier(owner_id, &identifier)
        .await?;
    Ok(Json(ResolveResponse { token }))
}
