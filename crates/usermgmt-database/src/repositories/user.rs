//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use usermgmt_core::error::{AppError, ErrorKind};
use usermgmt_core::result::AppResult;
use usermgmt_core::types::{escape_like, UserId};
use usermgmt_entity::user::UserEntity;

use crate::store::IdentityLookup;

/// Repository for the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `ILIKE` pattern matching `text` literally anywhere in the column.
fn contains_pattern(text: &str) -> String {
    format!("%{}%", escape_like(text))
}

#[async_trait]
impl IdentityLookup for UserRepository {
    async fn find_ids_by_name_containing(&self, text: &str) -> AppResult<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT id FROM users \
             WHERE first_name ILIKE $1 ESCAPE '\\' OR last_name ILIKE $1 ESCAPE '\\' \
                OR concat_ws(' ', first_name, last_name) ILIKE $1 ESCAPE '\\' \
             ORDER BY created_at ASC",
        )
        .bind(contains_pattern(text))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search users by name", e))
    }

    async fn find_ids_by_email_containing(&self, text: &str) -> AppResult<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT id FROM users WHERE email ILIKE $1 ESCAPE '\\' ORDER BY created_at ASC",
        )
        .bind(contains_pattern(text))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to search users by email", e)
        })
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<UserEntity>> {
        sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ada"), "%ada%");
        assert_eq!(contains_pattern("_"), r"%\_%");
        assert_eq!(contains_pattern("%"), r"%\%%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
