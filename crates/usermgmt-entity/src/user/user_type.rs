//! Identity class enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use usermgmt_core::AppError;

/// Class of identity behind a request.
///
/// Public users are unprivileged; agency users are internal staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Public,
    Agency,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Agency => "agency",
        }
    }

    /// Whether callers of this class may see restricted-tier links.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Self::Agency)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "agency" => Ok(Self::Agency),
            _ => Err(AppError::validation(format!(
                "Invalid user type: '{s}'. Expected one of: public, agency"
            ))),
        }
    }
}
