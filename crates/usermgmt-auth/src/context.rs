//! Caller identity lookup.

use usermgmt_core::types::UserId;
use usermgmt_entity::user::UserType;

/// Resolves who is making the current request.
pub trait SecurityContext: Send + Sync {
    /// The authenticated identity, or `None` for anonymous requests.
    fn user_id(&self) -> Option<UserId>;

    /// The caller's identity class, when known.
    fn user_type(&self) -> Option<UserType>;

    /// Whether the caller may see restricted-tier links.
    ///
    /// Callers whose class is unknown are treated as unprivileged.
    fn is_privileged(&self) -> bool {
        self.user_type().is_some_and(|t| t.is_privileged())
    }
}

/// A plain resolved caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Option<UserId>,
    pub user_type: Option<UserType>,
}

impl Caller {
    /// An authenticated caller.
    pub fn authenticated(user_id: UserId, user_type: UserType) -> Self {
        Self {
            user_id: Some(user_id),
            user_type: Some(user_type),
        }
    }

    /// A caller with no identity.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl SecurityContext for Caller {
    fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    fn user_type(&self) -> Option<UserType> {
        self.user_type
    }
}
