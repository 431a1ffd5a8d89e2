//! In-memory individual and employer profile stores.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use usermgmt_core::error::AppError;
use usermgmt_core::result::AppResult;
use usermgmt_core::types::{PageRequest, PageResponse, PredicateSet, ProfileId};
use usermgmt_entity::profile::{EmployerProfile, IndividualProfile};

use super::paginate;
use crate::store::{EmployerProfileStore, IndividualProfileStore};

#[derive(Debug, Default)]
pub struct MemoryIndividualProfileStore {
    profiles: RwLock<Vec<IndividualProfile>>,
}

impl MemoryIndividualProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IndividualProfileStore for MemoryIndividualProfileStore {
    async fn find_by_id(&self, id: ProfileId) -> AppResult<Option<IndividualProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, profile: &IndividualProfile) -> AppResult<IndividualProfile> {
        let mut profiles = self.profiles.write().await;
        if profiles.iter().any(|p| p.id == profile.id) {
            return Err(AppError::conflict(format!(
                "Individual profile {} already exists",
                profile.id
            )));
        }
        profiles.push(profile.clone());
        Ok(profile.clone())
    }

    async fn update(&self, profile: &IndividualProfile) -> AppResult<IndividualProfile> {
        let mut profiles = self.profiles.write().await;
        let existing = profiles
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or_else(|| {
                AppError::missing("Individual profile", profile.id)
            })?;
        *existing = profile.clone();
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn search(
        &self,
        predicates: &PredicateSet,
        page: &PageRequest,
    ) -> AppResult<PageResponse<IndividualProfile>> {
        let profiles = self.profiles.read().await;
        let matched = profiles
            .iter()
            .filter(|p| predicates.matches(*p))
            .cloned()
            .collect();
        Ok(paginate(matched, page))
    }
}

#[derive(Debug, Default)]
pub struct MemoryEmployerProfileStore {
    profiles: RwLock<Vec<EmployerProfile>>,
}

impl MemoryEmployerProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployerProfileStore for MemoryEmployerProfileStore {
    async fn find_by_id(&self, id: ProfileId) -> AppResult<Option<EmployerProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, profile: &EmployerProfile) -> AppResult<EmployerProfile> {
        let mut profiles = self.profiles.write().await;
        if profiles.iter().any(|p| p.id == profile.id) {
            return Err(AppError::conflict(format!(
                "Employer profile {} already exists",
                profile.id
            )));
        }
        profiles.push(profile.clone());
        Ok(profile.clone())
    }

    async fn update(&self, profile: &EmployerProfile) -> AppResult<EmployerProfile> {
        let mut profiles = self.profiles.write().await;
        let existing = profiles
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or_else(|| {
                AppError::missing("Employer profile", profile.id)
            })?;
        *existing = profile.clone();
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }
}
