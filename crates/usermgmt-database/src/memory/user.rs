//! In-memory identity lookup.

use async_trait::async_trait;
use tokio::sync::RwLock;

use usermgmt_core::result::AppResult;
use usermgmt_core::types::UserId;
use usermgmt_entity::user::UserEntity;

use crate::store::IdentityLookup;

/// Users held in a process-local vector.
#[derive(Debug, Default)]
pub struct MemoryIdentityLookup {
    users: RwLock<Vec<UserEntity>>,
}

impl MemoryIdentityLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user.
    pub async fn upsert(&self, user: UserEntity) {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl IdentityLookup for MemoryIdentityLookup {
    async fn find_ids_by_name_containing(&self, text: &str) -> AppResult<Vec<UserId>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| {
                [u.first_name.as_deref(), u.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|part| contains_ignore_case(part, text))
                    || contains_ignore_case(&u.full_name(), text)
            })
            .map(|u| u.id)
            .collect())
    }

    async fn find_ids_by_email_containing(&self, text: &str) -> AppResult<Vec<UserId>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| u.email.as_deref().is_some_and(|e| contains_ignore_case(e, text)))
            .map(|u| u.id)
            .collect())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<UserEntity>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}
