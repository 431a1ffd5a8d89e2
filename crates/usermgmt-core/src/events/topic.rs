//! Logical publisher topics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical destination for an outbound event.
///
/// Transports map each topic to a concrete channel name through
/// [`TopicNames`](crate::config::events::TopicNames).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublisherTopic {
    ApplicationRoleReporting,
    AuditEventsRecording,
    NotificationRequests,
}

impl PublisherTopic {
    /// All known topics.
    pub const ALL: [PublisherTopic; 3] = [
        Self::ApplicationRoleReporting,
        Self::AuditEventsRecording,
        Self::NotificationRequests,
    ];

    /// Return the canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplicationRoleReporting => "APPLICATION_ROLE_REPORTING",
            Self::AuditEventsRecording => "AUDIT_EVENTS_RECORDING",
            Self::NotificationRequests => "NOTIFICATION_REQUESTS",
        }
    }
}

impl fmt::Display for PublisherTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
