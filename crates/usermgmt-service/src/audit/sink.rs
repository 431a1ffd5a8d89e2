//! Dispatch of audit events to the event transport.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use usermgmt_core::events::{AuditEvent, AuditEventBuilder, EventEnvelope, PublisherTopic};
use usermgmt_core::result::AppResult;
use usermgmt_core::traits::{EventPublisher, Service};
use usermgmt_core::types::UserId;

/// Accepts fully built audit events.
#[async_trait]
pub trait AuditEventSink: Send + Sync + std::fmt::Debug + 'static {
    /// Dispatch one event on behalf of `originator_id`.
    async fn post(&self, event: &AuditEvent, originator_id: UserId) -> AppResult<()>;
}

/// Publishes audit events to the audit recording topic.
#[derive(Debug, Clone)]
pub struct AuditEventService {
    publisher: Arc<dyn EventPublisher>,
    /// Stamped on every envelope as the originating application.
    application_name: String,
}

impl AuditEventService {
    /// Creates a new audit event service.
    pub fn new(publisher: Arc<dyn EventPublisher>, application_name: impl Into<String>) -> Self {
        Self {
            publisher,
            application_name: application_name.into(),
        }
    }
}

impl Service for AuditEventService {}

#[async_trait]
impl AuditEventSink for AuditEventService {
    async fn post(&self, event: &AuditEvent, originator_id: UserId) -> AppResult<()> {
        let envelope = EventEnvelope::new(
            AuditEvent::EVENT_TYPE,
            self.application_name.clone(),
            event.request_context.trace_id.clone(),
            event,
        );
        let message = envelope.to_message()?;
        self.publisher
            .publish(PublisherTopic::AuditEventsRecording, &message)
            .await?;

        info!(
            event_id = %envelope.metadata.id,
            originator_id = %originator_id,
            activity = %event.activity_type,
            business_object_id = %event.business_object.id,
            "Audit event dispatched"
        );
        Ok(())
    }
}

/// Build and post a one-shot event, logging and swallowing any failure.
///
/// Used for events that have no before/after comparison, such as a user
/// being added to a profile.
pub async fn record_best_effort(
    sink: &dyn AuditEventSink,
    builder: AppResult<AuditEventBuilder>,
    originator_id: UserId,
    trace_id: Option<String>,
) -> Option<AuditEvent> {
    let result = async {
        let event = builder?.trace_id(trace_id).build()?;
        sink.post(&event, originator_id).await?;
        AppResult::Ok(event)
    }
    .await;

    match result {
        Ok(event) => Some(event),
        Err(e) => {
            error!(
                originator_id = %originator_id,
                error = %e,
                "An unexpected error occurred when recording audit event"
            );
            None
        }
    }
}
