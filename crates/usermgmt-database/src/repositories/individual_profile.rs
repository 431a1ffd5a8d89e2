//! Individual profile repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};

use usermgmt_core::error::{AppError, ErrorKind};
use usermgmt_core::result::AppResult;
use usermgmt_core::types::{PageRequest, PageResponse, PredicateSet, ProfileId};
use usermgmt_entity::profile::IndividualProfile;

use crate::query::{ColumnSet, push_order_and_page, push_predicates};
use crate::store::IndividualProfileStore;

const INDIVIDUAL_COLUMNS: ColumnSet = ColumnSet {
    filterable: &["id", "first_name", "middle_name", "last_name", "email", "ssn"],
    sortable: &["created_at", "last_name"],
    default_sort: "created_at",
};

/// Repository for the `individual_profile` table.
#[derive(Debug, Clone)]
pub struct IndividualProfileRepository {
    pool: PgPool,
}

impl IndividualProfileRepository {
    /// Create a new individual profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IndividualProfileStore for IndividualProfileRepository {
    async fn find_by_id(&self, id: ProfileId) -> AppResult<Option<IndividualProfile>> {
        sqlx::query_as::<_, IndividualProfile>("SELECT * FROM individual_profile WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find individual profile", e)
            })
    }

    async fn insert(&self, profile: &IndividualProfile) -> AppResult<IndividualProfile> {
        sqlx::query_as::<_, IndividualProfile>(
            "INSERT INTO individual_profile \
             (id, first_name, middle_name, last_name, email, ssn, mailing_address, primary_address, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(profile.id)
        .bind(&profile.first_name)
        .bind(&profile.middle_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(&profile.ssn)
        .bind(&profile.mailing_address)
        .bind(&profile.primary_address)
        .bind(profile.created_by)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert individual profile", e)
        })
    }

    async fn update(&self, profile: &IndividualProfile) -> AppResult<IndividualProfile> {
        sqlx::query_as::<_, IndividualProfile>(
            "UPDATE individual_profile SET first_name = $2, middle_name = $3, last_name = $4, \
             email = $5, ssn = $6, mailing_address = $7, primary_address = $8, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(profile.id)
        .bind(&profile.first_name)
        .bind(&profile.middle_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(&profile.ssn)
        .bind(&profile.mailing_address)
        .bind(&profile.primary_address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update individual profile", e)
        })?
        .ok_or_else(|| AppError::missing("Individual profile", profile.id))
    }

    async fn search(
        &self,
        predicates: &PredicateSet,
        page: &PageRequest,
    ) -> AppResult<PageResponse<IndividualProfile>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM individual_profile WHERE TRUE");
        push_predicates(&mut count, predicates, &INDIVIDUAL_COLUMNS)?;
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count individual profiles", e)
            })?;

        let mut select = QueryBuilder::new("SELECT * FROM individual_profile WHERE TRUE");
        push_predicates(&mut select, predicates, &INDIVIDUAL_COLUMNS)?;
        push_order_and_page(&mut select, None, &INDIVIDUAL_COLUMNS, page.limit(), page.offset());
        let profiles = select
            .build_query_as::<IndividualProfile>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search individual profiles", e)
            })?;

        Ok(PageResponse::new(profiles, page, total as u64))
    }
}
