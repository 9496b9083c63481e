//! Integration tests for the owner link-management endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_owner_endpoints_require_token() {
    let app = helpers::TestApp::new();
    let body = json!({ "deckId": Uuid::new_v4(), "accessLevel": "public" });

    let response = app.request("POST", "/links", Some(body.clone()), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("POST", "/links", Some(body), Some("not.a.jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_create_validates_input() {
    let app = helpers::TestApp::new();
    let owner = Uuid::new_v4();
    let bearer = app.owner_token(owner);
    let deck_id = app.add_deck(owner);

    let response = app
        .request(
            "POST",
            "/links",
            Some(json!({ "deckId": deck_id, "accessLevel": "whitelisted" })),
            Some(&bearer),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/links",
            Some(json!({ "deckId": deck_id, "accessLevel": "public", "expiresInDays": 12 })),
            Some(&bearer),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let foreign_deck = app.add_deck(Uuid::new_v4());
    let response = app
        .request(
            "POST",
            "/links",
            Some(json!({ "deckId": foreign_deck, "accessLevel": "public" })),
            Some(&bearer),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_identifier_lifecycle() {
    let app = helpers::TestApp::new();
    let owner = Uuid::new_v4();
    let bearer = app.owner_token(owner);
    let first = app.create_link(owner, json!({ "accessLevel": "public" })).await;
    let second = app.create_link(owner, json!({ "accessLevel": "public" })).await;

    let response = app
        .request(
            "PUT",
            &format!("/links/{first}/identifier"),
            Some(json!({ "linkId": "My Deck!" })),
            Some(&bearer),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["linkId"], "my_deck");

    let response = app
        .request(
            "PUT",
            &format!("/links/{second}/identifier"),
            Some(json!({ "linkId": "my_deck" })),
            Some(&bearer),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "GET",
            &format!("/access/resolve/{owner}/my_deck"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token"], first.as_str());
}

#[tokio::test]
async fn test_list_and_revoke() {
    let app = helpers::TestApp::new();
    let owner = Uuid::new_v4();
    let bearer = app.owner_token(owner);
    let token = app.create_link(owner, json!({ "accessLevel": "public" })).await;
    let deck_id = app.links.0.lock().unwrap()[0].deck_id;

    let response = app
        .request("GET", &format!("/links?deckId={deck_id}"), None, Some(&bearer))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 1);

    for _ in 0..2 {
        let response = app
            .request("DELETE", &format!("/links/{token}"), None, Some(&bearer))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app
        .request("GET", &format!("/view/{token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_link_code() {
    let app = helpers::TestApp::new();
    let owner = Uuid::new_v4();
    let bearer = app.owner_token(owner);
    let token = app
        .create_link(
            owner,
            json!({ "accessLevel": "restricted", "recipientEmail": "lp@fund.vc" }),
        )
        .await;

    let response = app
        .request(
            "POST",
            &format!("/links/{token}/code"),
            None,
            Some(&app.owner_token(Uuid::new_v4())),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("POST", &format!("/links/{token}/code"), None, Some(&bearer))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let code = response.body["code"].as_str().unwrap().to_string();

    let body = json!({ "token": token, "code": code });
    let response = app
        .request("POST", "/access/verify-link-code", Some(body.clone()), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);

    let response = app
        .request("POST", "/access/verify-link-code", Some(body), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
