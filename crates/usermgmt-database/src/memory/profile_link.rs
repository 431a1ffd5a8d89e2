//! In-memory profile link store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use usermgmt_core::error::AppError;
use usermgmt_core::result::AppResult;
use usermgmt_core::types::{
    PageRequest, PageResponse, PredicateSet, ProfileId, ProfileLinkId, SortDirection, SortField,
    UserId,
};
use usermgmt_entity::link::ProfileLink;
use usermgmt_entity::profile::ProfileType;

use super::paginate;
use crate::store::ProfileLinkStore;

/// Profile links held in a process-local vector.
#[derive(Debug, Default)]
pub struct MemoryProfileLinkStore {
    links: RwLock<Vec<ProfileLink>>,
}

impl MemoryProfileLinkStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links across both profile types.
    pub async fn len(&self) -> usize {
        self.links.read().await.len()
    }

    /// Whether the store holds no links.
    pub async fn is_empty(&self) -> bool {
        self.links.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileLinkStore for MemoryProfileLinkStore {
    async fn find_by_user(
        &self,
        profile_type: ProfileType,
        user_id: UserId,
    ) -> AppResult<Vec<ProfileLink>> {
        let links = self.links.read().await;
        Ok(links
            .iter()
            .filter(|l| l.profile_type == profile_type && l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_profile_and_user(
        &self,
        profile_type: ProfileType,
        profile_id: ProfileId,
        user_id: UserId,
    ) -> AppResult<Option<ProfileLink>> {
        let links = self.links.read().await;
        Ok(links
            .iter()
            .find(|l| {
                l.profile_type == profile_type && l.profile_id == profile_id && l.user_id == user_id
            })
            .cloned())
    }

    async fn find_by_id(&self, id: ProfileLinkId) -> AppResult<Option<ProfileLink>> {
        let links = self.links.read().await;
        Ok(links.iter().find(|l| l.id == id).cloned())
    }

    async fn insert(&self, link: &ProfileLink) -> AppResult<ProfileLink> {
        let mut links = self.links.write().await;
        let duplicate = links.iter().any(|l| {
            l.profile_type == link.profile_type
                && l.profile_id == link.profile_id
                && l.user_id == link.user_id
        });
        if duplicate {
            return Err(AppError::conflict(format!(
                "User {} is already linked to {} profile {}",
                link.user_id,
                link.profile_type.label(),
                link.profile_id
            )));
        }
        links.push(link.clone());
        Ok(link.clone())
    }

    async fn update(&self, link: &ProfileLink) -> AppResult<ProfileLink> {
        let mut links = self.links.write().await;
        let existing = links
            .iter_mut()
            .find(|l| l.id == link.id)
            .ok_or_else(|| AppError::missing("Profile link", link.id))?;
        existing.access_level = link.access_level;
        existing.last_updated_by = link.last_updated_by;
        existing.updated_at = link.updated_at;
        Ok(existing.clone())
    }

    async fn delete(&self, id: ProfileLinkId) -> AppResult<bool> {
        let mut links = self.links.write().await;
        let before = links.len();
        links.retain(|l| l.id != id);
        Ok(links.len() < before)
    }

    async fn search(
        &self,
        profile_type: ProfileType,
        predicates: &PredicateSet,
        page: &PageRequest,
        sort: Option<&SortField>,
    ) -> AppResult<PageResponse<ProfileLink>> {
        let links = self.links.read().await;
        let mut matched: Vec<ProfileLink> = links
            .iter()
            .filter(|l| l.profile_type == profile_type && predicates.matches(*l))
            .cloned()
            .collect();

        if let Some(sort) = sort {
            match sort.field.as_str() {
                "updated_at" => matched.sort_by_key(|l| l.updated_at),
                "access_level" => matched.sort_by(|a, b| {
                    a.access_level.as_str().cmp(b.access_level.as_str())
                }),
                _ => matched.sort_by_key(|l| l.created_at),
            }
            if sort.direction == SortDirection::Desc {
                matched.reverse();
            }
        }

        Ok(paginate(matched, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usermgmt_core::types::FilterField;
    use usermgmt_entity::link::NewProfileLink;
    use usermgmt_entity::profile::ProfileAccessLevel;

    fn link(profile_type: ProfileType, user_id: UserId, level: ProfileAccessLevel) -> ProfileLink {
        NewProfileLink {
            profile_id: ProfileId::new(),
            user_id,
            profile_type,
            access_level: level,
            created_by: UserId::new(),
        }
        .into_link()
    }

    #[tokio::test]
    async fn test_find_by_user_keeps_insertion_order() {
        let store = MemoryProfileLinkStore::new();
        let user = UserId::new();
        let first = link(ProfileType::Individual, user, ProfileAccessLevel::Admin);
        let second = link(ProfileType::Individual, user, ProfileAccessLevel::Reader);
        let other_type = link(ProfileType::Employer, user, ProfileAccessLevel::Admin);
        store.insert(&first).await.unwrap();
        store.insert(&other_type).await.unwrap();
        store.insert(&second).await.unwrap();

        let found = store.find_by_user(ProfileType::Individual, user).await.unwrap();
        assert_eq!(found, vec![first, second]);
    }

    #[tokio::test]
    async fn test_duplicate_pair_conflicts() {
        let store = MemoryProfileLinkStore::new();
        let original = link(ProfileType::Employer, UserId::new(), ProfileAccessLevel::Reader);
        store.insert(&original).await.unwrap();

        let mut duplicate = original.clone();
        duplicate.id = ProfileLinkId::new();
        let err = store.insert(&duplicate).await.unwrap_err();
        assert_eq!(err.kind, usermgmt_core::error::ErrorKind::Conflict);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_search_applies_predicates_and_type() {
        let store = MemoryProfileLinkStore::new();
        let user = UserId::new();
        store
            .insert(&link(ProfileType::Employer, user, ProfileAccessLevel::Admin))
            .await
            .unwrap();
        store
            .insert(&link(ProfileType::Employer, user, ProfileAccessLevel::AgencyReadonly))
            .await
            .unwrap();
        store
            .insert(&link(ProfileType::Individual, user, ProfileAccessLevel::Admin))
            .await
            .unwrap();

        let predicates =
            PredicateSet::new().and(FilterField::ne("access_level", "AGENCY_READONLY"));
        let page = store
            .search(ProfileType::Employer, &predicates, &PageRequest::default(), None)
            .await
            .unwrap();

        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].access_level, ProfileAccessLevel::Admin);
    }

    #[tokio::test]
    async fn test_search_past_the_last_page_is_empty() {
        let store = MemoryProfileLinkStore::new();
        store
            .insert(&link(ProfileType::Employer, UserId::new(), ProfileAccessLevel::Reader))
            .await
            .unwrap();

        let far = PageRequest {
            page: u64::MAX / 2,
            page_size: 25,
        };
        let page = store
            .search(ProfileType::Employer, &PredicateSet::new(), &far, None)
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 1);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let store = MemoryProfileLinkStore::new();
        let stored = link(ProfileType::Employer, UserId::new(), ProfileAccessLevel::Reader);
        store.insert(&stored).await.unwrap();

        assert!(store.delete(stored.id).await.unwrap());
        assert!(!store.delete(stored.id).await.unwrap());
        assert!(store.is_empty().await);
    }
}
