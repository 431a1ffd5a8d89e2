//! Access level carried by a profile link.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use usermgmt_core::AppError;

/// Permission tier of a profile link.
///
/// Ordered `Admin > Writer > Reader`. `AgencyReadonly` is a restricted tier
/// granted by agency staff; links at that level are hidden from public
/// callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "profile_access_level", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileAccessLevel {
    Admin,
    Writer,
    Reader,
    AgencyReadonly,
}

impl ProfileAccessLevel {
    /// Return the machine value, e.g. `"AGENCY_READONLY"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Writer => "WRITER",
            Self::Reader => "READER",
            Self::AgencyReadonly => "AGENCY_READONLY",
        }
    }

    /// Return the display label, e.g. `"Agency Readonly"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Writer => "Writer",
            Self::Reader => "Reader",
            Self::AgencyReadonly => "Agency Readonly",
        }
    }

    /// Parse a display label. Matching is exact.
    pub fn from_label(label: &str) -> Option<Self> {
        [Self::Admin, Self::Writer, Self::Reader, Self::AgencyReadonly]
            .into_iter()
            .find(|level| level.label() == label)
    }

    /// Whether links at this level must be redacted for public callers.
    pub fn is_hidden_for_public_users(&self) -> bool {
        matches!(self, Self::AgencyReadonly)
    }

    /// Whether this level grants at least what `other` grants.
    ///
    /// `Admin` covers everything, `Writer` covers everything except `Admin`,
    /// and the remaining levels only cover themselves.
    pub fn has_equal_or_more_access(&self, other: &ProfileAccessLevel) -> bool {
        match self {
            Self::Admin => true,
            Self::Writer => !matches!(other, Self::Admin),
            _ => self == other,
        }
    }
}

impl fmt::Display for ProfileAccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileAccessLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "WRITER" => Ok(Self::Writer),
            "READER" => Ok(Self::Reader),
            "AGENCY_READONLY" => Ok(Self::AgencyReadonly),
            _ => Self::from_label(s).ok_or_else(|| {
                AppError::validation(format!(
                    "Invalid access level: '{s}'. Expected one of: ADMIN, WRITER, READER, AGENCY_READONLY"
                ))
            }),
        }
    }
}
