//! Transport envelope wrapping every published event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata stamped on each outbound event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    /// Unique event ID.
    pub id: Uuid,
    /// Event type name, e.g. `"AuditEvent"`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Name of the application that produced the event.
    pub originator_id: String,
    /// When the event was produced.
    pub timestamp: DateTime<Utc>,
    /// Correlates the event with the request that caused it.
    pub correlation_id: Option<String>,
}

/// An event plus its metadata, ready for serialization onto a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    pub metadata: EventMetadata,
    pub event: T,
}

impl<T: Serialize> EventEnvelope<T> {
    /// Wrap an event with fresh metadata.
    pub fn new(
        event_type: impl Into<String>,
        originator_id: impl Into<String>,
        correlation_id: Option<String>,
        event: T,
    ) -> Self {
        Self {
            metadata: EventMetadata {
                id: Uuid::new_v4(),
                event_type: event_type.into(),
                originator_id: originator_id.into(),
                timestamp: Utc::now(),
                correlation_id,
            },
            event,
        }
    }

    /// Serialize the envelope to a JSON message.
    pub fn to_message(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
