//! Sinks used by unit tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use usermgmt_core::error::AppError;
use usermgmt_core::events::AuditEvent;
use usermgmt_core::result::AppResult;
use usermgmt_core::types::UserId;

use super::sink::AuditEventSink;

/// Keeps every posted event.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub events: Mutex<Vec<AuditEvent>>,
}

impl RecordingSink {
    pub async fn recorded(&self) -> Vec<AuditEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl AuditEventSink for RecordingSink {
    async fn post(&self, event: &AuditEvent, _originator_id: UserId) -> AppResult<()> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

/// Rejects every event.
#[derive(Debug, Default)]
pub(crate) struct FailingSink;

#[async_trait]
impl AuditEventSink for FailingSink {
    async fn post(&self, _event: &AuditEvent, _originator_id: UserId) -> AppResult<()> {
        Err(AppError::external_service("audit transport unavailable"))
    }
}
