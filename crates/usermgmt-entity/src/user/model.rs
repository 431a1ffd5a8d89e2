//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use usermgmt_core::types::UserId;

use super::user_type::UserType;

/// A registered identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserEntity {
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    /// `"first last"` with missing parts omitted.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_skips_missing_parts() {
        let now = Utc::now();
        let mut user = UserEntity {
            id: UserId::new(),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: None,
            user_type: UserType::Public,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(user.full_name(), "Ada Lovelace");

        user.first_name = None;
        assert_eq!(user.full_name(), "Lovelace");
    }
}
