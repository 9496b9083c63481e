//! Integration tests for the viewer access endpoints.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");

    let response = app.request("GET", "/health/detailed", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["database"], "disabled");
    assert_eq!(response.body["cache"], "connected");
    assert_eq!(response.body["cache_provider"], "memory");
}

#[tokio::test]
async fn test_whitelisted_flow_over_http() {
    let app = helpers::TestApp::new();
    let token = app
        .create_link(
            Uuid::new_v4(),
            json!({ "accessLevel": "whitelisted", "allowedDomains": ["x.com"] }),
        )
        .await;

    let response = app
        .request(
            "GET",
            &format!("/access/requirements?token={token}"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["accessLevel"], "whitelisted");
    assert_eq!(response.body["requireVerification"], true);
    assert!(response.body.get("allowedDomains").is_none());

    let response = app
        .request(
            "POST",
            "/access/request-code",
            Some(json!({ "token": token, "email": "a@x.com" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["sentTo"], "a***@x.com");

    let response = app
        .request(
            "POST",
            "/access/request-code",
            Some(json!({ "token": token, "email": "b@y.com" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let code = app.outbox.code_for("a@x.com");
    let response = app
        .request(
            "POST",
            "/access/verify-code",
            Some(json!({ "token": token, "email": "a@x.com", "code": code })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let session = response.body["accessToken"].as_str().unwrap().to_string();

    let response = app
        .request("GET", &format!("/view/{token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", &format!("/view/{token}"), None, Some(&session))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["expiresIn"], 3600);

    let response = app
        .request(
            "POST",
            "/access/verify-code",
            Some(json!({ "token": token, "email": "a@x.com", "code": code })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid or expired OTP");
    assert_eq!(response.body["details"]["remainingAttempts"], 4);
}

#[tokio::test]
async fn test_throttled_request_is_429() {
    let app = helpers::TestApp::new();
    let token = app
        .create_link(
            Uuid::new_v4(),
            json!({ "accessLevel": "restricted", "recipientEmail": "lp@fund.vc" }),
        )
        .await;
    let body = json!({ "token": token, "email": "lp@fund.vc" });

    let first = app
        .request("POST", "/access/request-code", Some(body.clone()), None)
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .request("POST", "/access/request-code", Some(body), None)
        .await;
    assert_eq!(second.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(second.body["error"], "RATE_LIMITED");
    assert!(second.body["details"]["retryAfterSeconds"].as_u64().is_some());
}

#[tokio::test]
async fn test_expired_link_is_410() {
    let app = helpers::TestApp::new();
    let token = app
        .create_link(
            Uuid::new_v4(),
            json!({ "accessLevel": "restricted", "recipientEmail": "lp@fund.vc" }),
        )
        .await;
    app.links
        .update(&token, |l| l.expires_at = Some(Utc::now() - Duration::minutes(1)));

    let response = app
        .request(
            "POST",
            "/access/request-code",
            Some(json!({ "token": token, "email": "lp@fund.vc" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.body["error"], "EXPIRED");

    let response = app
        .request(
            "GET",
            &format!("/access/requirements?token={token}"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::GONE);
}

#[tokio::test]
async fn test_unknown_token_is_404() {
    let app = helpers::TestApp::new();
    let response = app
        .request("GET", "/access/requirements?token=nope", None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.request("GET", "/view/nope", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_bodies_are_400() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/access/request-code",
            Some(json!({ "token": "", "email": "a@x.com" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["fields"], json!(["token"]));

    let response = app
        .request(
            "POST",
            "/access/verify-code",
            Some(json!({ "token": "abc" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_public_link_opens_without_session() {
    let app = helpers::TestApp::new();
    let token = app
        .create_link(
            Uuid::new_v4(),
            json!({ "accessLevel": "public", "isDownloadable": true }),
        )
        .await;

    let response = app
        .request("GET", &format!("/view/{token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["isDownloadable"], true);

    let response = app
        .request(
            "POST",
            "/access/request-code",
            Some(json!({ "token": token, "email": "a@x.com" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_evaluate_reports_match_only() {
    let app = helpers::TestApp::new();
    let token = app
        .create_link(
            Uuid::new_v4(),
            json!({ "accessLevel": "whitelisted", "allowedEmails": ["Partner@Fund.vc"] }),
        )
        .await;

    let response = app
        .request(
            "POST",
            "/access/evaluate",
            Some(json!({ "token": token, "email": "partner@fund.vc" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true }));

    let response = app
        .request(
            "POST",
            "/access/evaluate",
            Some(json!({ "token": token, "email": "intruder@fund.vc" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
