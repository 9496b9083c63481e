//! DeckShare server
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use deckshare_api::{AppState, build_app};
use deckshare_auth::jwt::{OwnerTokenDecoder, SessionTokenIssuer, SessionTokenVerifier};
use deckshare_auth::otp::RateLimitedCodeStore;
use deckshare_cache::CacheManager;
use deckshare_core::config::AppConfig;
use deckshare_core::traits::BlobStore;
use deckshare_database::DatabasePool;
use deckshare_database::repositories::{DeckRepository, ShareLinkRepository};
use deckshare_service::access::VerificationDeps;
use deckshare_service::{ShareLinkService, SmtpNotificationSink, VerificationService};
use deckshare_storage::HttpBlobStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("DECKSHARE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("Failed to load configuration")?;

    init_logging(&config);

    run(config).await.inspect_err(|e| {
        tracing::error!(error = %format!("{e:#}"), "Server error");
    })
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = config.environment.as_str(),
        "Starting DeckShare"
    );

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    deckshare_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Cache (refuses to start when unreachable) ────────
    let cache = CacheManager::new(&config.cache)
        .await
        .context("Cache initialization failed")?;

    // ── Step 3: Outbound collaborators ───────────────────────────
    let blobs: Arc<dyn BlobStore> = Arc::new(HttpBlobStore::new(&config.storage)?);
    let notifier = Arc::new(SmtpNotificationSink::new(&config.mail)?);

    // ── Step 4: Repositories and services ────────────────────────
    let links = Arc::new(ShareLinkRepository::new(db.pool().clone()));
    let decks = Arc::new(DeckRepository::new(db.pool().clone()));

    let share_links = Arc::new(ShareLinkService::new(
        links.clone(),
        decks.clone(),
        config.access.clone(),
    ));
    let verification = Arc::new(VerificationService::new(
        VerificationDeps {
            links,
            decks,
            blobs: blobs.clone(),
            notifier,
            codes: RateLimitedCodeStore::new(cache.clone(), &config.access),
            issuer: SessionTokenIssuer::new(&config.auth),
            verifier: SessionTokenVerifier::new(&config.auth),
        },
        config.access.clone(),
        &config.mail,
    ));

    let state = AppState {
        db: Some(db.clone()),
        cache: cache.clone(),
        blobs,
        share_links,
        verification,
        owner_decoder: Arc::new(OwnerTokenDecoder::new(&config.auth)),
        started_at: Instant::now(),
    };

    // ── Step 5: Serve until a shutdown signal arrives ────────────
    let app = build_app(state, &config.server);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "DeckShare server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    tokio::select! {
        result = server.into_future() => result.context("HTTP server failed")?,
        _ = async {
            let _ = shutdown_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(grace_seconds = grace.as_secs(), "Graceful shutdown timed out; dropping open connections");
        }
    }

    // ── Step 6: Release backing services ─────────────────────────
    cache.close().await;
    db.close().await;
    info!("DeckShare server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
