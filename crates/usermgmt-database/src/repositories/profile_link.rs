//! Profile link repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use usermgmt_core::error::{AppError, ErrorKind};
use usermgmt_core::result::AppResult;
use usermgmt_core::types::{
    PageRequest, PageResponse, PredicateSet, ProfileId, ProfileLinkId, SortField, UserId,
};
use usermgmt_entity::link::ProfileLink;
use usermgmt_entity::profile::ProfileType;

use crate::query::{ColumnSet, push_order_and_page, push_predicates};
use crate::store::ProfileLinkStore;

const LINK_COLUMNS: ColumnSet = ColumnSet {
    filterable: &["id", "profile_id", "user_id", "access_level", "created_by"],
    sortable: &["created_at", "updated_at", "access_level"],
    default_sort: "created_at",
};

/// Repository for the `profile_link` table.
#[derive(Debug, Clone)]
pub struct ProfileLinkRepository {
    pool: PgPool,
}

impl ProfileLinkRepository {
    /// Create a new profile link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn filtered<'a>(
        select: &str,
        profile_type: ProfileType,
        predicates: &PredicateSet,
    ) -> AppResult<QueryBuilder<'a, Postgres>> {
        let mut builder = QueryBuilder::new(select);
        builder.push(" FROM profile_link WHERE profile_type = ");
        builder.push_bind(profile_type);
        push_predicates(&mut builder, predicates, &LINK_COLUMNS)?;
        Ok(builder)
    }
}

#[async_trait]
impl ProfileLinkStore for ProfileLinkRepository {
    async fn find_by_user(
        &self,
        profile_type: ProfileType,
        user_id: UserId,
    ) -> AppResult<Vec<ProfileLink>> {
        sqlx::query_as::<_, ProfileLink>(
            "SELECT * FROM profile_link WHERE profile_type = $1 AND user_id = $2 \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(profile_type)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user links", e))
    }

    async fn find_by_profile_and_user(
        &self,
        profile_type: ProfileType,
        profile_id: ProfileId,
        user_id: UserId,
    ) -> AppResult<Option<ProfileLink>> {
        sqlx::query_as::<_, ProfileLink>(
            "SELECT * FROM profile_link WHERE profile_type = $1 AND profile_id = $2 AND user_id = $3",
        )
        .bind(profile_type)
        .bind(profile_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find profile link", e))
    }

    async fn find_by_id(&self, id: ProfileLinkId) -> AppResult<Option<ProfileLink>> {
        sqlx::query_as::<_, ProfileLink>("SELECT * FROM profile_link WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find profile link", e)
            })
    }

    async fn insert(&self, link: &ProfileLink) -> AppResult<ProfileLink> {
        sqlx::query_as::<_, ProfileLink>(
            "INSERT INTO profile_link \
             (id, profile_id, user_id, profile_type, access_level, created_by, last_updated_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(link.id)
        .bind(link.profile_id)
        .bind(link.user_id)
        .bind(link.profile_type)
        .bind(link.access_level)
        .bind(link.created_by)
        .bind(link.last_updated_by)
        .bind(link.created_at)
        .bind(link.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::with_source(
                ErrorKind::Conflict,
                format!(
                    "User {} is already linked to {} profile {}",
                    link.user_id,
                    link.profile_type.label(),
                    link.profile_id
                ),
                e,
            ),
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert profile link", e),
        })
    }

    async fn update(&self, link: &ProfileLink) -> AppResult<ProfileLink> {
        sqlx::query_as::<_, ProfileLink>(
            "UPDATE profile_link SET access_level = $2, last_updated_by = $3, updated_at = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(link.id)
        .bind(link.access_level)
        .bind(link.last_updated_by)
        .bind(link.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update profile link", e))?
        .ok_or_else(|| AppError::missing("Profile link", link.id))
    }

    async fn delete(&self, id: ProfileLinkId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM profile_link WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete profile link", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn search(
        &self,
        profile_type: ProfileType,
        predicates: &PredicateSet,
        page: &PageRequest,
        sort: Option<&SortField>,
    ) -> AppResult<PageResponse<ProfileLink>> {
        let mut count = Self::filtered("SELECT COUNT(*)", profile_type, predicates)?;
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count profile links", e)
            })?;

        let mut select = Self::filtered("SELECT *", profile_type, predicates)?;
        push_order_and_page(&mut select, sort, &LINK_COLUMNS, page.limit(), page.offset());
        let links = select
            .build_query_as::<ProfileLink>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search profile links", e)
            })?;

        Ok(PageResponse::new(links, page, total as u64))
    }
}
