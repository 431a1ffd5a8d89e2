//! Derived access profile.

use serde::{Deserialize, Serialize};

use usermgmt_core::types::ProfileId;

use super::model::ProfileLink;
use crate::profile::{ProfileAccessLevel, ProfileType};

/// One profile the caller can reach, and how strongly.
///
/// Never persisted. Recomputed from the caller's links on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessProfile {
    pub id: ProfileId,
    #[serde(rename = "type")]
    pub profile_type: ProfileType,
    pub level: ProfileAccessLevel,
}

impl From<&ProfileLink> for AccessProfile {
    fn from(link: &ProfileLink) -> Self {
        Self {
            id: link.profile_id,
            profile_type: link.profile_type,
            level: link.access_level,
        }
    }
}
