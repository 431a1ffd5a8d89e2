//! Employer profile repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use usermgmt_core::error::{AppError, ErrorKind};
use usermgmt_core::result::AppResult;
use usermgmt_core::types::ProfileId;
use usermgmt_entity::profile::EmployerProfile;

use crate::store::EmployerProfileStore;

/// Repository for the `employer_profile` table.
#[derive(Debug, Clone)]
pub struct EmployerProfileRepository {
    pool: PgPool,
}

impl EmployerProfileRepository {
    /// Create a new employer profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployerProfileStore for EmployerProfileRepository {
    async fn find_by_id(&self, id: ProfileId) -> AppResult<Option<EmployerProfile>> {
        sqlx::query_as::<_, EmployerProfile>("SELECT * FROM employer_profile WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find employer profile", e)
            })
    }

    async fn insert(&self, profile: &EmployerProfile) -> AppResult<EmployerProfile> {
        sqlx::query_as::<_, EmployerProfile>(
            "INSERT INTO employer_profile \
             (id, fein, legal_name, other_names, employer_type, industry, summary_of_business, \
              business_phone, mailing_address, locations, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *",
        )
        .bind(profile.id)
        .bind(&profile.fein)
        .bind(&profile.legal_name)
        .bind(&profile.other_names)
        .bind(&profile.employer_type)
        .bind(&profile.industry)
        .bind(&profile.summary_of_business)
        .bind(&profile.business_phone)
        .bind(&profile.mailing_address)
        .bind(&profile.locations)
        .bind(profile.created_by)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert employer profile", e)
        })
    }

    async fn update(&self, profile: &EmployerProfile) -> AppResult<EmployerProfile> {
        sqlx::query_as::<_, EmployerProfile>(
            "UPDATE employer_profile SET fein = $2, legal_name = $3, other_names = $4, \
             employer_type = $5, industry = $6, summary_of_business = $7, business_phone = $8, \
             mailing_address = $9, locations = $10, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(profile.id)
        .bind(&profile.fein)
        .bind(&profile.legal_name)
        .bind(&profile.other_names)
        .bind(&profile.employer_type)
        .bind(&profile.industry)
        .bind(&profile.summary_of_business)
        .bind(&profile.business_phone)
        .bind(&profile.mailing_address)
        .bind(&profile.locations)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update employer profile", e)
        })?
        .ok_or_else(|| AppError::missing("Employer profile", profile.id))
    }
}
