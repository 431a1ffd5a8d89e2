//! In-process policy engine evaluating access profiles.

use std::collections::HashMap;

use async_trait::async_trait;

use usermgmt_core::config::access::ACCESS_PROFILES_ATTRIBUTE;
use usermgmt_core::result::AppResult;
use usermgmt_entity::profile::ProfileAccessLevel;

use super::engine::{PolicyEngine, Principal, ProfileAction, ResourceDescriptor};

/// Grants an action when the principal holds an access profile for the
/// resource at or above the level the action requires.
///
/// Actions without a required level are granted to any linked principal.
#[derive(Debug, Clone)]
pub struct LocalPolicyEngine {
    /// Action → minimum access level.
    required: HashMap<ProfileAction, Option<ProfileAccessLevel>>,
    profiles_key: String,
}

impl LocalPolicyEngine {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let required = HashMap::from([
            (ProfileAction::View, None),
            (ProfileAction::Update, Some(ProfileAccessLevel::Writer)),
            (ProfileAction::Link, Some(ProfileAccessLevel::Admin)),
            (ProfileAction::DeleteLink, Some(ProfileAccessLevel::Admin)),
            (ProfileAction::Invite, Some(ProfileAccessLevel::Admin)),
        ]);
        Self {
            required,
            profiles_key: ACCESS_PROFILES_ATTRIBUTE.to_string(),
        }
    }

    /// Read access profiles from a different attribute key.
    pub fn with_profiles_key(mut self, key: impl Into<String>) -> Self {
        self.profiles_key = key.into();
        self
    }

    /// Override the level required for one action.
    pub fn require(mut self, action: ProfileAction, level: Option<ProfileAccessLevel>) -> Self {
        self.required.insert(action, level);
        self
    }
}

impl Default for LocalPolicyEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PolicyEngine for LocalPolicyEngine {
    async fn is_allowed(
        &self,
        principal: &Principal,
        action: ProfileAction,
        resource: &ResourceDescriptor,
    ) -> AppResult<bool> {
        let Some(profiles) = principal.attributes.access_profiles(&self.profiles_key)? else {
            return Ok(false);
        };
        let required = self.required.get(&action).copied().flatten();

        Ok(profiles.iter().any(|p| {
            p.id == resource.id
                && p.profile_type == resource.profile_type
                && required.is_none_or(|level| p.level.has_equal_or_more_access(&level))
        }))
    }
}
