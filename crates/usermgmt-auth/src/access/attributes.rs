//! Principal attributes handed to the policy engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use usermgmt_core::config::access::ACCESS_PROFILES_ATTRIBUTE;
use usermgmt_core::result::AppResult;
use usermgmt_entity::link::AccessProfile;

use super::aggregator::AccessProfileAggregator;
use crate::context::SecurityContext;

/// Key/value facts about the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag {
    attributes: BTreeMap<String, Value>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Decode the access profiles stored under `key`.
    ///
    /// Returns `None` when the key is absent.
    pub fn access_profiles(&self, key: &str) -> AppResult<Option<Vec<AccessProfile>>> {
        self.attributes
            .get(key)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .map_err(Into::into)
    }
}

/// Computes the caller's attribute bag for one authorization decision.
#[derive(Debug, Clone)]
pub struct PrincipalAttributeProvider {
    aggregator: AccessProfileAggregator,
    profiles_key: String,
}

impl PrincipalAttributeProvider {
    /// Creates a provider that stores profiles under `"accessProfiles"`.
    pub fn new(aggregator: AccessProfileAggregator) -> Self {
        Self::with_key(aggregator, ACCESS_PROFILES_ATTRIBUTE)
    }

    /// Creates a provider with a custom attribute key.
    pub fn with_key(aggregator: AccessProfileAggregator, profiles_key: impl Into<String>) -> Self {
        Self {
            aggregator,
            profiles_key: profiles_key.into(),
        }
    }

    /// The attribute key holding the access profiles.
    pub fn profiles_key(&self) -> &str {
        &self.profiles_key
    }

    /// Build the attribute bag for the current caller.
    ///
    /// Anonymous callers get a bag without the profiles key.
    pub async fn attributes(&self, context: &dyn SecurityContext) -> AppResult<AttributeBag> {
        let mut bag = AttributeBag::new();
        if let Some(user_id) = context.user_id() {
            let profiles = self.aggregator.access_profiles(user_id).await?;
            bag.insert(self.profiles_key.clone(), serde_json::to_value(profiles)?);
        }
        Ok(bag)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::Caller;
    use usermgmt_core::types::{ProfileId, UserId};
    use usermgmt_database::memory::MemoryProfileLinkStore;
    use usermgmt_database::store::ProfileLinkStore;
    use usermgmt_entity::link::NewProfileLink;
    use usermgmt_entity::profile::{ProfileAccessLevel, ProfileType};
    use usermgmt_entity::user::UserType;

    async fn provider_with_links(user: UserId) -> (PrincipalAttributeProvider, AccessProfileAggregator) {
        let store = Arc::new(MemoryProfileLinkStore::new());
        for (profile_type, level) in [
            (ProfileType::Employer, ProfileAccessLevel::Admin),
            (ProfileType::Individual, ProfileAccessLevel::Reader),
        ] {
            let link = NewProfileLink {
                profile_id: ProfileId::new(),
                user_id: user,
                profile_type,
                access_level: level,
                created_by: user,
            }
            .into_link();
            store.insert(&link).await.unwrap();
        }
        let aggregator = AccessProfileAggregator::new(store);
        (PrincipalAttributeProvider::new(aggregator.clone()), aggregator)
    }

    #[tokio::test]
    async fn test_anonymous_caller_has_no_profiles_key() {
        let (provider, _) = provider_with_links(UserId::new()).await;
        let bag = provider.attributes(&Caller::anonymous()).await.unwrap();

        assert!(!bag.contains_key("accessProfiles"));
        assert!(bag.is_empty());
        assert_eq!(bag.access_profiles("accessProfiles").unwrap(), None);
    }

    #[tokio::test]
    async fn test_authenticated_caller_gets_aggregator_output() {
        let user = UserId::new();
        let (provider, aggregator) = provider_with_links(user).await;
        let bag = provider
            .attributes(&Caller::authenticated(user, UserType::Public))
            .await
            .unwrap();

        let expected = aggregator.access_profiles(user).await.unwrap();
        assert_eq!(bag.access_profiles("accessProfiles").unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn test_custom_key() {
        let user = UserId::new();
        let (_, aggregator) = provider_with_links(user).await;
        let provider = PrincipalAttributeProvider::with_key(aggregator, "profiles");
        let bag = provider
            .attributes(&Caller::authenticated(user, UserType::Agency))
            .await
            .unwrap();

        assert!(bag.contains_key("profiles"));
        assert!(!bag.contains_key("accessProfiles"));
    }
}
