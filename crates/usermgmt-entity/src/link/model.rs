//! Profile link entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use usermgmt_core::types::{FilterTarget, FilterValue, ProfileId, ProfileLinkId, UserId};

use crate::profile::{ProfileAccessLevel, ProfileType};

/// Association between one identity and one profile.
///
/// Individual and employer links share this shape and are told apart by
/// `profile_type`. At most one link exists per (profile, user) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProfileLink {
    pub id: ProfileLinkId,
    pub profile_id: ProfileId,
    pub user_id: UserId,
    pub profile_type: ProfileType,
    pub access_level: ProfileAccessLevel,
    /// Identity that created the link.
    pub created_by: UserId,
    pub last_updated_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileLink {
    /// Replace the access level, stamping who changed it.
    pub fn set_access_level(&mut self, level: ProfileAccessLevel, updated_by: UserId) {
        self.access_level = level;
        self.last_updated_by = Some(updated_by);
        self.updated_at = Utc::now();
    }
}

impl FilterTarget for ProfileLink {
    fn filter_value(&self, field: &str) -> Option<FilterValue> {
        match field {
            "id" => Some(FilterValue::Uuid(self.id.into_uuid())),
            "profile_id" => Some(FilterValue::Uuid(self.profile_id.into_uuid())),
            "user_id" => Some(FilterValue::Uuid(self.user_id.into_uuid())),
            "profile_type" => Some(FilterValue::from(self.profile_type.as_str())),
            "access_level" => Some(FilterValue::from(self.access_level.as_str())),
            "created_by" => Some(FilterValue::Uuid(self.created_by.into_uuid())),
            _ => None,
        }
    }
}

/// Data required to create a new link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfileLink {
    pub profile_id: ProfileId,
    pub user_id: UserId,
    pub profile_type: ProfileType,
    pub access_level: ProfileAccessLevel,
    pub created_by: UserId,
}

impl NewProfileLink {
    /// Materialize the link with a fresh id and timestamps.
    pub fn into_link(self) -> ProfileLink {
        let now = Utc::now();
        ProfileLink {
            id: ProfileLinkId::new(),
            profile_id: self.profile_id,
            user_id: self.user_id,
            profile_type: self.profile_type,
            access_level: self.access_level,
            created_by: self.created_by,
            last_updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(level: ProfileAccessLevel) -> ProfileLink {
        NewProfileLink {
            profile_id: ProfileId::new(),
            user_id: UserId::new(),
            profile_type: ProfileType::Employer,
            access_level: level,
            created_by: UserId::new(),
        }
        .into_link()
    }

    #[test]
    fn test_set_access_level_replaces() {
        let mut link = link(ProfileAccessLevel::Reader);
        let editor = UserId::new();
        link.set_access_level(ProfileAccessLevel::Admin, editor);

        assert_eq!(link.access_level, ProfileAccessLevel::Admin);
        assert_eq!(link.last_updated_by, Some(editor));
    }

    #[test]
    fn test_filter_values_use_machine_names() {
        let link = link(ProfileAccessLevel::AgencyReadonly);
        assert_eq!(
            link.filter_value("access_level"),
            Some(FilterValue::String("AGENCY_READONLY".into()))
        );
        assert_eq!(
            link.filter_value("profile_type"),
            Some(FilterValue::String("EMPLOYER".into()))
        );
        assert_eq!(link.filter_value("nope"), None);
    }
}
