//! Event transport configuration.

use serde::{Deserialize, Serialize};

use crate::events::PublisherTopic;

/// Which transport carries published events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventProvider {
    /// In-process broadcast channels.
    Memory,
    /// Redis `PUBLISH`.
    Redis,
}

/// Event publishing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Transport used for outbound events.
    #[serde(default = "default_provider")]
    pub provider: EventProvider,
    /// Redis connection URL, used when `provider = "redis"`.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Capacity of each in-memory broadcast channel.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Originator name stamped on every event envelope.
    #[serde(default = "default_application_name")]
    pub application_name: String,
    /// Concrete channel names for each logical topic.
    #[serde(default)]
    pub topics: TopicNames,
}

/// Mapping from logical [`PublisherTopic`] to transport channel names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicNames {
    #[serde(default = "default_role_reporting")]
    pub application_role_reporting: String,
    #[serde(default = "default_audit_events")]
    pub audit_events_recording: String,
    #[serde(default = "default_notifications")]
    pub notification_requests: String,
}

impl TopicNames {
    /// Resolve the concrete channel name for a logical topic.
    pub fn resolve(&self, topic: PublisherTopic) -> &str {
        match topic {
            PublisherTopic::ApplicationRoleReporting => &self.application_role_reporting,
            PublisherTopic::AuditEventsRecording => &self.audit_events_recording,
            PublisherTopic::NotificationRequests => &self.notification_requests,
        }
    }
}

impl Default for TopicNames {
    fn default() -> Self {
        Self {
            application_role_reporting: default_role_reporting(),
            audit_events_recording: default_audit_events(),
            notification_requests: default_notifications(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            redis_url: default_redis_url(),
            buffer_size: default_buffer_size(),
            application_name: default_application_name(),
            topics: TopicNames::default(),
        }
    }
}

fn default_provider() -> EventProvider {
    EventProvider::Memory
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_buffer_size() -> usize {
    256
}

fn default_application_name() -> String {
    "user-management".to_string()
}

fn default_role_reporting() -> String {
    "application-role-reporting".to_string()
}

fn default_audit_events() -> String {
    "audit-events-recording".to_string()
}

fn default_notifications() -> String {
    "notification-requests".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_names_resolve() {
        let names = TopicNames::default();
        assert_eq!(
            names.resolve(PublisherTopic::AuditEventsRecording),
            "audit-events-recording"
        );
        assert_eq!(
            names.resolve(PublisherTopic::NotificationRequests),
            "notification-requests"
        );
    }

    #[test]
    fn test_provider_deserializes_lowercase() {
        let provider: EventProvider = serde_json::from_str("\"redis\"").unwrap();
        assert_eq!(provider, EventProvider::Redis);
    }
}
