//! Profile kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use usermgmt_core::AppError;
use usermgmt_core::events::AuditEventBusinessObject;

/// Kind of profile a link points at. Fixed once the link exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "profile_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileType {
    Employer,
    Individual,
}

impl ProfileType {
    /// Return the machine value, e.g. `"EMPLOYER"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employer => "EMPLOYER",
            Self::Individual => "INDIVIDUAL",
        }
    }

    /// Return the display label, e.g. `"employer"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Employer => "employer",
            Self::Individual => "individual",
        }
    }

    /// Business object kind used when auditing this profile type.
    pub fn business_object(&self) -> AuditEventBusinessObject {
        match self {
            Self::Employer => AuditEventBusinessObject::Employer,
            Self::Individual => AuditEventBusinessObject::Individual,
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EMPLOYER" => Ok(Self::Employer),
            "INDIVIDUAL" => Ok(Self::Individual),
            _ => Err(AppError::validation(format!(
                "Invalid profile type: '{s}'. Expected one of: EMPLOYER, INDIVIDUAL"
            ))),
        }
    }
}
