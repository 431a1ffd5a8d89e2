//! Embedded schema migrations for the profile store.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use usermgmt_core::error::{AppError, ErrorKind};
use usermgmt_core::result::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Applies pending migrations and returns how many the binary embeds.
pub async fn run_migrations(pool: &PgPool) -> AppResult<usize> {
    let embedded = MIGRATOR.iter().count();
    info!(embedded, "Applying profile store migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Profile store migration failed: {e}"),
            e,
        )
    })?;

    Ok(embedded)
}
