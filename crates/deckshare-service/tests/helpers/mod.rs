//! Shared in-memory collaborators for service integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use deckshare_auth::jwt::{SessionTokenIssuer, SessionTokenVerifier};
use deckshare_auth::otp::RateLimitedCodeStore;
use deckshare_cache::CacheManager;
use deckshare_cache::memory::MemoryCacheProvider;
use deckshare_core::config::{AccessConfig, AuthConfig, MailConfig};
use deckshare_core::error::AppError;
use deckshare_core::result::AppResult;
use deckshare_core::traits::{BlobStore, NotificationSink};
use deckshare_database::repositories::{DeckStore, ShareLinkStore};
use deckshare_entity::deck::Deck;
use deckshare_entity::share::{CreateShareLink, ShareLink};
use deckshare_service::access::VerificationDeps;
use deckshare_service::{ShareLinkService, VerificationService};

/// Share links kept in a vector, with the same owner scoping and
/// uniqueness rules as the database.
#[derive(Debug, Default)]
pub struct InMemoryLinks {
    pub rows: Mutex<Vec<ShareLink>>,
}

impl InMemoryLinks {
    pub fn get(&self, token: &str) -> Option<ShareLink> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.token == token)
            .cloned()
    }

    pub fn update(&self, token: &str, f: impl FnOnce(&mut ShareLink)) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(link) = rows.iter_mut().find(|l| l.token == token) {
            f(link);
        }
    }
}

fn identifier_taken(rows: &[ShareLink], user_id: Uuid, link_id: &str, except: &str) -> bool {
    rows.iter().any(|l| {
        l.user_id == user_id && l.token != except && l.link_id.as_deref() == Some(link_id)
    })
}

#[async_trait]
impl ShareLinkStore for InMemoryLinks {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        Ok(self.get(token))
    }

    async fn find_by_identifier(
        &self,
        user_id: Uuid,
        link_id: &str,
    ) -> AppResult<Option<ShareLink>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.user_id == user_id && l.link_id.as_deref() == Some(link_id))
            .cloned())
    }

    async fn list_for_deck(&self, user_id: Uuid, deck_id: Uuid) -> AppResult<Vec<ShareLink>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == user_id && l.deck_id == deck_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(link_id) = &data.link_id {
            if identifier_taken(&rows, data.user_id, link_id, &data.token) {
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
        let mut rows = self.rows.lock().unwrap();
        if !rows.iter().any(|l| l.user_id == user_id && l.token == token) {
            return Ok(None);
        }
        if identifier_taken(&rows, user_id, link_id, token) {
            return Err(AppError::conflict("Link identifier is already in use"));
        }
        let link = rows
            .iter_mut()
            .find(|l| l.user_id == user_id && l.token == token)
            .map(|l| {
                l.link_id = Some(link_id.to_string());
                l.clone()
            });
        Ok(link)
    }

    async fn delete_owned(&self, user_id: Uuid, token: &str) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
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
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|l| l.user_id == user_id && l.token == token) {
            Some(link) => {
                link.verification_code = Some(code.to_string());
                link.verification_code_expires_at = Some(expires_at);
                Ok(true)
            }
            None => Ok(false),
        }
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
pub struct InMemoryDecks {
    pub rows: Mutex<Vec<Deck>>,
}

impl InMemoryDecks {
    pub fn add(&self, user_id: Uuid) -> Deck {
        let deck = Deck {
            id: Uuid::new_v4(),
            user_id,
            title: "Seed round".to_string(),
            file_path: format!("{user_id}/seed.pdf"),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(deck.clone());
        deck
    }
}

#[async_trait]
impl DeckStore for InMemoryDecks {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Deck>> {
        Ok(self.rows.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }
}

/// Blob store that signs by appending the TTL.
#[derive(Debug, Default)]
pub struct FakeBlobStore;

#[async_trait]
impl BlobStore for FakeBlobStore {
    async fn create_signed_url(&self, path: &str, ttl: Duration) -> AppResult<String> {
        Ok(format!("https://blobs.test/{path}?expires={}", ttl.as_secs()))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Records every message; can be switched to fail.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<(String, String, String)>>,
    pub fail: Mutex<bool>,
}

impl RecordingSink {
    /// The 6-digit code in the most recent message to `address`.
    pub fn last_code_for(&self, address: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _, _)| to == address)
            .and_then(|(_, _, body)| {
                body.split(|c: char| !c.is_ascii_digit())
                    .find(|part| part.len() == 6)
                    .map(str::to_string)
            })
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, address: &str, subject: &str, body: &str) -> AppResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(AppError::external_service("relay down"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((address.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        session_secret: "session-secret-for-tests-0123456789abcdef".to_string(),
        owner_jwt_secret: "owner-secret-for-tests-0123456789abcdef".to_string(),
        owner_jwt_audience: None,
    }
}

/// Fully wired services over in-memory collaborators.
pub struct TestServices {
    pub links: Arc<InMemoryLinks>,
    pub decks: Arc<InMemoryDecks>,
    pub sink: Arc<RecordingSink>,
    pub cache: CacheManager,
    pub share_links: ShareLinkService,
    pub verification: VerificationService,
    pub verifier: SessionTokenVerifier,
}

impl TestServices {
    pub fn new() -> Self {
        let links = Arc::new(InMemoryLinks::default());
        let decks = Arc::new(InMemoryDecks::default());
        let sink = Arc::new(RecordingSink::default());
        let cache = CacheManager::from_backend(Arc::new(MemoryCacheProvider::new()), "memory");
        let access = AccessConfig::default();
        let auth = auth_config();

        let share_links = ShareLinkService::new(links.clone(), decks.clone(), access.clone());
        let verifier = SessionTokenVerifier::new(&auth);
        let verification = VerificationService::new(
            VerificationDeps {
                links: links.clone(),
                decks: decks.clone(),
                blobs: Arc::new(FakeBlobStore),
                notifier: sink.clone(),
                codes: RateLimitedCodeStore::new(cache.clone(), &access),
                issuer: SessionTokenIssuer::new(&auth),
                verifier: verifier.clone(),
            },
            access,
            &MailConfig::default(),
        );

        Self {
            links,
            decks,
            sink,
            cache,
            share_links,
            verification,
            verifier,
        }
    }
}
