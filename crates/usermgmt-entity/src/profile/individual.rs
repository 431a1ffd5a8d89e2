//! Individual profile entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use usermgmt_core::types::{FilterTarget, FilterValue, ProfileId, UserId};

use super::address::Address;

/// A person's profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IndividualProfile {
    pub id: ProfileId,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Social security number.
    pub ssn: Option<String>,
    pub mailing_address: Option<Json<Address>>,
    pub primary_address: Option<Json<Address>>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IndividualProfile {
    /// Create a new, unsaved profile.
    pub fn new(created_by: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            first_name: None,
            middle_name: None,
            last_name: None,
            email: None,
            ssn: None,
            mailing_address: None,
            primary_address: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mailing_address(&self) -> Option<&Address> {
        self.mailing_address.as_ref().map(|a| &a.0)
    }

    pub fn primary_address(&self) -> Option<&Address> {
        self.primary_address.as_ref().map(|a| &a.0)
    }
}

impl FilterTarget for IndividualProfile {
    fn filter_value(&self, field: &str) -> Option<FilterValue> {
        let text = |v: &Option<String>| v.clone().map(FilterValue::String);
        match field {
            "id" => Some(FilterValue::Uuid(self.id.into_uuid())),
            "first_name" => text(&self.first_name),
            "middle_name" => text(&self.middle_name),
            "last_name" => text(&self.last_name),
            "email" => text(&self.email),
            "ssn" => text(&self.ssn),
            _ => None,
        }
    }
}
