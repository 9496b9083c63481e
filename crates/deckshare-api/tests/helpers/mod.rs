//! Shared test helpers for API integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use deckshare_api::{AppState, build_app};
use deckshare_auth::jwt::{OwnerTokenDecoder, SessionTokenIssuer, SessionTokenVerifier};
use deckshare_auth::otp::RateLimitedCodeStore;
use deckshare_cache::CacheManager;
use deckshare_cache::memory::MemoryCacheProvider;
use deckshare_core::config::{AccessConfig, AuthConfig, MailConfig, ServerConfig};
use deckshare_core::error::AppError;
use deckshare_core::result::AppResult;
use deckshare_core::traits::{BlobStore, NotificationSink};
use deckshare_database::repositories::{DeckStore, ShareLinkStore};
use deckshare_entity::deck::Deck;
use deckshare_entity::share::{CreateShareLink, ShareLink};
use deckshare_service::access::VerificationDeps;
use deckshare_service::{ShareLinkService, VerificationService};

const OWNER_SECRET: &str = "owner-secret-for-api-tests-0123456789abcdef";

#[derive(Debug, Default)]
pub struct Links(pub Mutex<Vec<ShareLink>>);

impl Links {
    pub fn update(&self, token: &str, f: impl FnOnce(&mut ShareLink)) {
        if let Some(link) = self.0.lock().unwrap().iter_mut().find(|l| l.token == token) {
            f(link);
        }
    }
}

fn clashes(rows: &[ShareLink], user_id: Uuid, link_id: &str, token: &str) -> bool {
    rows.iter()
        .any(|l| l.user_id == user_id && l.token != token && l.link_id.as_deref() == Some(link_id))
}

#[async_trait]
impl ShareLinkStore for Links {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        Ok(self.0.lock().unwrap().iter().find(|l| l.token == token).cloned())
    }

    async fn find_by_identifier(
        &self,
        user_id: Uuid,
        link_id: &str,
    ) -> AppResult<Option<ShareLink>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.user_id == user_id && l.link_id.as_deref() == Some(link_id))
            .cloned())
    }

    async fn list_for_deck(&self, user_id: Uuid, deck_id: Uuid) -> AppResult<Vec<ShareLink>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == user_id && l.deck_id == deck_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink> {
        let mut rows = self.0.lock().unwrap();
        if let Some(link_id) = &data.link_id {
            if clashes(&rows, data.user_id, link_id, &data.token) {
                return Err(AppError::conflict("Link identifier is already in use"));
            }
        }
        let link = ShareLink {
            id: Uuid::now_v7(),
            token: data.token.clone(),
            link_id: data.link_id.clone(),
            user_id: data.user_id,
            deck_id: data.deck_id,
            access_level: data.access_level,
            recipient_email: data.recipient_email.clone(),
            allowed_emails: data.allowed_emails.clone(),
            allowed_domains: data.allowed_domains.clone(),
            is_downloadable: data.is_downloadable,
            created_at: data.created_at,
            expires_at: Some(data.expires_at),
            verification_code: None,
            verification_code_expires_at: None,
            is_verified: false,
        };
        rows.push(link.clone());
        Ok(link)
    }

    async fn set_identifier(
        &self,
        user_id: Uuid,
        token: &str,
        link_id: &str,
    ) -> AppResult<Option<ShareLink>> {
        let mut rows = self.0.lock().unwrap();
        if clashes(&rows, user_id, link_id, token) {
            return Err(AppError::conflict("Link identifier is already in use"));
        }
        Ok(rows
            .iter_mut()
            .find(|l| l.user_id == user_id && l.token == token)
            .map(|l| {
                l.link_id = Some(link_id.to_string());
                l.clone()
            }))
    }

    async fn delete_owned(&self, user_id: Uuid, token: &str) -> AppResult<bool> {
        let mut rows = self.0.lock().unwrap();
        let before = rows.len();
        rows.retain(|l| !(l.user_id == user_id && l.token == token));
        Ok(rows.len() < before)
    }

    async fn mark_verified(&self, token: &str) -> AppResult<()> {
        self.update(token, |l| l.is_verified = true);
        Ok(())
    }

    async fn set_legacy_code(
        &self,
        user_id: Uuid,
        token: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut rows = self.0.lock().unwrap();
        let Some(link) = rows.iter_mut().find(|l| l.user_id == user_id && l.token == token) else {
            return Ok(false);
        };
        link.verification_code = Some(code.to_string());
        link.verification_code_expires_at = Some(expires_at);
        Ok(true)
    }

    async fn clear_legacy_code(&self, token: &str) -> AppResult<()> {
        self.update(token, |l| {
            l.verification_code = None;
            l.verification_code_expires_at = None;
        });
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Decks(pub Mutex<Vec<Deck>>);

#[async_trait]
impl DeckStore for Decks {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Deck>> {
        Ok(self.0.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }
}

#[derive(Debug)]
pub struct Blobs;

#[async_trait]
impl BlobStore for Blobs {
    async fn create_signed_url(&self, path: &str, ttl: Duration) -> AppResult<String> {
        Ok(format!("https://blobs.test/{path}?ttl={}", ttl.as_secs()))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Mail sink keeping every body so tests can read the code back.
#[derive(Debug, Default)]
pub struct Outbox(pub Mutex<Vec<(String, String)>>);

impl Outbox {
    pub fn code_for(&self, address: &str) -> String {
        self.0
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == address)
            .and_then(|(_, body)| {
                body.split(|c: char| !c.is_ascii_digit())
                    .find(|part| part.len() == 6)
                    .map(str::to_string)
            })
            .expect("no code delivered")
    }
}

#[async_trait]
impl NotificationSink for Outbox {
    async fn send(&self, address: &str, _subject: &str, body: &str) -> AppResult<()> {
        self.0
            .lock()
            .unwrap()
            .push((address.to_string(), body.to_string()));
        Ok(())
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct TestApp {
    pub router: Router,
    pub links: Arc<Links>,
    pub decks: Arc<Decks>,
    pub outbox: Arc<Outbox>,
}

impl TestApp {
    pub fn new() -> Self {
        let auth = AuthConfig {
            session_secret: "session-secret-for-api-tests-0123456789abcdef".to_string(),
            owner_jwt_secret: OWNER_SECRET.to_string(),
            owner_jwt_audience: None,
        };
        let access = AccessConfig::default();
        let links = Arc::new(Links::default());
        let decks = Arc::new(Decks::default());
        let outbox = Arc::new(Outbox::default());
        let cache = CacheManager::from_backend(Arc::new(MemoryCacheProvider::new()), "memory");
        let blobs: Arc<dyn BlobStore> = Arc::new(Blobs);

        let verification = VerificationService::new(
            VerificationDeps {
                links: links.clone(),
                decks: decks.clone(),
                blobs: blobs.clone(),
                notifier: outbox.clone(),
                codes: RateLimitedCodeStore::new(cache.clone(), &access),
                issuer: SessionTokenIssuer::new(&auth),
                verifier: SessionTokenVerifier::new(&auth),
            },
            access.clone(),
            &MailConfig::default(),
        );

        let state = AppState {
            db: None,
            cache,
            blobs,
            share_links: Arc::new(ShareLinkService::new(links.clone(), decks.clone(), access)),
            verification: Arc::new(verification),
            owner_decoder: Arc::new(OwnerTokenDecoder::new(&auth)),
            started_at: Instant::now(),
        };

        Self {
            router: build_app(state, &ServerConfig::default()),
            links,
            decks,
            outbox,
        }
    }

    /// Adds a deck for `user_id` and returns its id.
    pub fn add_deck(&self, user_id: Uuid) -> Uuid {
        let deck = Deck {
            id: Uuid::new_v4(),
            user_id,
            title: "Series A".to_string(),
            file_path: format!("{user_id}/series-a.pdf"),
            created_at: Utc::now(),
        };
        let id = deck.id;
        self.decks.0.lock().unwrap().push(deck);
        id
    }

    /// Signs an owner token the way the identity provider would.
    pub fn owner_token(&self, user_id: Uuid) -> String {
        let claims = serde_json::json!({
            "sub": user_id,
            "exp": (Utc::now() + chrono::Duration::hours(1)).timestamp(),
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(OWNER_SECRET.as_bytes()),
        )
        .unwrap()
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }

    /// Creates a link through the owner API and returns its token.
    pub async fn create_link(&self, owner: Uuid, body: Value) -> String {
        let deck_id = self.add_deck(owner);
        let mut body = body;
        body["deckId"] = serde_json::json!(deck_id);
        let response = self
            .request("POST", "/links", Some(body), Some(&self.owner_token(owner)))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }
}
