//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use usermgmt_auth::context::SecurityContext;
use usermgmt_core::types::UserId;
use usermgmt_entity::user::UserType;

/// Context for the current authenticated request.
///
/// Passed into service methods so that every operation knows who is acting
/// and which request trace it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The caller's identity class.
    pub user_type: UserType,
    /// Trace identifier propagated into audit events.
    pub trace_id: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, user_type: UserType) -> Self {
        Self {
            user_id,
            user_type,
            trace_id: None,
            request_time: Utc::now(),
        }
    }

    /// Attach a trace identifier.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

impl SecurityContext for RequestContext {
    fn user_id(&self) -> Option<UserId> {
        Some(self.user_id)
    }

    fn user_type(&self) -> Option<UserType> {
        Some(self.user_type)
    }
}
