//! Schema migrations embedded from `migrations/`.

use std::time::Instant;

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use deckshare_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Version of the newest embedded migration.
pub fn latest_version() -> Option<i64> {
    MIGRATOR.iter().map(|m| m.version).max()
}

/// Bring the decks and share links schema up to [`latest_version`].
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let started = Instant::now();
    info!(
        embedded = MIGRATOR.iter().count(),
        target_version = latest_version(),
        "Applying schema migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Schema migration failed: {e}"),
            e,
        )
    })?;

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Schema is up to date"
    );
    Ok(())
}
