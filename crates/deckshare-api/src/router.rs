//! Route table.

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::handlers::{access, health, links, view};
use crate::state::AppState;

/// Builds the router with every endpoint bound to `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/detailed", get(health::health_detailed))
        .route("/access/request-code", post(access::request_code))
        .route("/access/verify-code", post(access::verify_code))
        .route("/access/requirements", get(access::requirements))
        .route("/access/evaluate", post(access::evaluate))
        .route("/access/verify-link-code", post(access::verify_link_code))
        .route(
            "/access/resolve/{owner_id}/{identifier}",
            get(access::resolve),
        )
        .route("/view/{token}", get(view::view_deck))
        .route("/links", post(links::create_link).get(links::list_links))
        .route("/links/{token}", delete(links::revoke_link))
        .route("/links/{token}/identifier", put(links::set_identifier))
        .route("/links/{token}/code", post(links::issue_link_code))
        .with_state(state)
}
