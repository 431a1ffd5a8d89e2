//! Employer profile entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use usermgmt_core::types::{ProfileId, UserId};

use super::address::Address;

/// A business's profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployerProfile {
    pub id: ProfileId,
    /// Federal employer identification number.
    pub fein: Option<String>,
    pub legal_name: Option<String>,
    pub other_names: Vec<String>,
    /// Ownership type, e.g. `"LLC"`.
    pub employer_type: Option<String>,
    pub industry: Option<String>,
    pub summary_of_business: Option<String>,
    pub business_phone: Option<String>,
    pub mailing_address: Option<Json<Address>>,
    pub locations: Json<Vec<Address>>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployerProfile {
    /// Create a new, unsaved profile.
    pub fn new(created_by: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            fein: None,
            legal_name: None,
            other_names: Vec::new(),
            employer_type: None,
            industry: None,
            summary_of_business: None,
            business_phone: None,
            mailing_address: None,
            locations: Json(Vec::new()),
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mailing_address(&self) -> Option<&Address> {
        self.mailing_address.as_ref().map(|a| &a.0)
    }

    pub fn locations(&self) -> &[Address] {
        &self.locations.0
    }
}
