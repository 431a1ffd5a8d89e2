//! Store traits consumed by the service and auth layers.
//!
//! Each trait has a Postgres implementation in [`crate::repositories`] and
//! an in-memory implementation in [`crate::memory`].

use async_trait::async_trait;

use usermgmt_core::result::AppResult;
use usermgmt_core::types::{
    PageRequest, PageResponse, PredicateSet, ProfileId, ProfileLinkId, SortField, UserId,
};
use usermgmt_entity::link::ProfileLink;
use usermgmt_entity::profile::{EmployerProfile, IndividualProfile, ProfileType};
use usermgmt_entity::user::UserEntity;

/// Link persistence, keyed by profile type.
#[async_trait]
pub trait ProfileLinkStore: Send + Sync + std::fmt::Debug + 'static {
    /// All links of one type held by `user_id`, in a stable order.
    async fn find_by_user(
        &self,
        profile_type: ProfileType,
        user_id: UserId,
    ) -> AppResult<Vec<ProfileLink>>;

    /// The link between `profile_id` and `user_id`, if any.
    async fn find_by_profile_and_user(
        &self,
        profile_type: ProfileType,
        profile_id: ProfileId,
        user_id: UserId,
    ) -> AppResult<Option<ProfileLink>>;

    async fn find_by_id(&self, id: ProfileLinkId) -> AppResult<Option<ProfileLink>>;

    /// Insert a new link. Fails with a conflict if the (profile, user) pair
    /// is already linked.
    async fn insert(&self, link: &ProfileLink) -> AppResult<ProfileLink>;

    /// Persist changes to an existing link.
    async fn update(&self, link: &ProfileLink) -> AppResult<ProfileLink>;

    /// Delete a link. Returns `true` if a row was removed.
    async fn delete(&self, id: ProfileLinkId) -> AppResult<bool>;

    /// Page through links of one type matching every predicate.
    async fn search(
        &self,
        profile_type: ProfileType,
        predicates: &PredicateSet,
        page: &PageRequest,
        sort: Option<&SortField>,
    ) -> AppResult<PageResponse<ProfileLink>>;
}

/// Identity lookups used to translate text search into user ids.
#[async_trait]
pub trait IdentityLookup: Send + Sync + std::fmt::Debug + 'static {
    /// Users whose first, last, or full name contains `text`, ignoring case.
    async fn find_ids_by_name_containing(&self, text: &str) -> AppResult<Vec<UserId>>;

    /// Users whose email contains `text`, ignoring case.
    async fn find_ids_by_email_containing(&self, text: &str) -> AppResult<Vec<UserId>>;

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<UserEntity>>;
}

#[async_trait]
pub trait IndividualProfileStore: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: ProfileId) -> AppResult<Option<IndividualProfile>>;

    async fn insert(&self, profile: &IndividualProfile) -> AppResult<IndividualProfile>;

    async fn update(&self, profile: &IndividualProfile) -> AppResult<IndividualProfile>;

    async fn search(
        &self,
        predicates: &PredicateSet,
        page: &PageRequest,
    ) -> AppResult<PageResponse<IndividualProfile>>;
}

#[async_trait]
pub trait EmployerProfileStore: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: ProfileId) -> AppResult<Option<EmployerProfile>>;

    async fn insert(&self, profile: &EmployerProfile) -> AppResult<EmployerProfile>;

    async fn update(&self, profile: &EmployerProfile) -> AppResult<EmployerProfile>;
}
