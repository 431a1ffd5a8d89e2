//! Policy engine abstraction.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use usermgmt_core::result::AppResult;
use usermgmt_core::types::{ProfileId, UserId};
use usermgmt_entity::profile::ProfileType;

use crate::access::AttributeBag;

/// Operations guarded on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileAction {
    /// Read the profile and its links.
    View,
    /// Change profile data.
    Update,
    /// Add a user to the profile or change a user's access level.
    Link,
    /// Remove a user from the profile.
    DeleteLink,
    /// Invite someone to the profile.
    Invite,
}

impl ProfileAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Update => "update",
            Self::Link => "link",
            Self::DeleteLink => "delete-link",
            Self::Invite => "invite",
        }
    }
}

impl fmt::Display for ProfileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The profile a check is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub id: ProfileId,
    #[serde(rename = "kind")]
    pub profile_type: ProfileType,
}

impl ResourceDescriptor {
    pub fn individual(id: ProfileId) -> Self {
        Self {
            id,
            profile_type: ProfileType::Individual,
        }
    }

    pub fn employer(id: ProfileId) -> Self {
        Self {
            id,
            profile_type: ProfileType::Employer,
        }
    }
}

/// The caller as seen by the policy engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// `None` for anonymous callers.
    pub id: Option<UserId>,
    pub attributes: AttributeBag,
}

/// Opaque allow/deny decision service.
#[async_trait]
pub trait PolicyEngine: Send + Sync + std::fmt::Debug + 'static {
    /// Decide whether `principal` may perform `action` on `resource`.
    async fn is_allowed(
        &self,
        principal: &Principal,
        action: ProfileAction,
        resource: &ResourceDescriptor,
    ) -> AppResult<bool>;
}
