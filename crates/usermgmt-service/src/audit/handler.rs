//! Audit handler contract and the pre/post/publish typestate.

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use usermgmt_core::events::{AuditEvent, AuditEventBuilder};
use usermgmt_core::result::AppResult;
use usermgmt_core::types::UserId;

use super::sink::AuditEventSink;

/// One auditable change kind.
///
/// A handler decides which fields of a subject matter, how to compare the
/// captured states, and how to describe a change. It holds no per-mutation
/// state; that lives in [`AuditSession`].
pub trait AuditHandler: Send + Sync {
    /// The entity being mutated.
    type Subject;
    /// Fields captured before the mutation, including identifying fields.
    type PreState: Send;
    /// Fields captured after the mutation.
    type PostState: Send;

    /// Short description used in failure logs, e.g. `"employer profile data change"`.
    fn describe(&self) -> &'static str;

    /// Capture state before any mutation is applied.
    fn capture_pre(&self, subject: &Self::Subject) -> Self::PreState;

    /// Capture state after the mutation.
    fn capture_post(&self, subject: &Self::Subject) -> Self::PostState;

    /// Id of the affected subject, for logging.
    fn subject_id(&self, pre: &Self::PreState) -> Uuid;

    /// Compare the captured states and describe the change.
    ///
    /// Returns `Ok(None)` when nothing reportable changed.
    fn build_event(
        &self,
        pre: Self::PreState,
        post: Self::PostState,
        originator_id: UserId,
    ) -> AppResult<Option<AuditEventBuilder>>;
}

/// What happened when a session was published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    /// An event was built and accepted by the sink.
    Published(Box<AuditEvent>),
    /// Nothing reportable changed; the sink was not called.
    NoChange,
    /// Building or dispatching the event failed. The failure was logged.
    Failed,
}

impl AuditOutcome {
    pub fn event(&self) -> Option<&AuditEvent> {
        match self {
            Self::Published(event) => Some(event),
            _ => None,
        }
    }
}

/// A fresh audit session for one mutation.
#[derive(Debug)]
pub struct AuditSession<H: AuditHandler> {
    handler: H,
    sink: Arc<dyn AuditEventSink>,
    trace_id: Option<String>,
}

/// A session whose pre-update state has been captured.
pub struct PreUpdate<H: AuditHandler> {
    session: AuditSession<H>,
    pre: H::PreState,
}

/// A session with both states captured, ready to publish.
pub struct PostUpdate<H: AuditHandler> {
    session: AuditSession<H>,
    pre: H::PreState,
    post: H::PostState,
}

impl<H: AuditHandler> AuditSession<H> {
    pub fn new(handler: H, sink: Arc<dyn AuditEventSink>) -> Self {
        Self {
            handler,
            sink,
            trace_id: None,
        }
    }

    /// Propagate a request trace id into the published event.
    pub fn with_trace_id(mut self, trace_id: Option<String>) -> Self {
        self.trace_id = trace_id;
        self
    }

    /// Capture the subject before it is mutated.
    pub fn handle_pre_update_state(self, subject: &H::Subject) -> PreUpdate<H> {
        let pre = self.handler.capture_pre(subject);
        PreUpdate { session: self, pre }
    }
}

impl<H: AuditHandler> PreUpdate<H> {
    /// Capture the subject after the mutation has been applied.
    pub fn handle_post_update_state(self, subject: &H::Subject) -> PostUpdate<H> {
        let post = self.session.handler.capture_post(subject);
        PostUpdate {
            session: self.session,
            pre: self.pre,
            post,
        }
    }
}

impl<H: AuditHandler> PostUpdate<H> {
    /// Publish an event if a reportable change occurred.
    ///
    /// Never fails: any error while building or dispatching the event is
    /// logged with the subject id and swallowed.
    pub async fn publish_audit_event(self, originator_id: UserId) -> AuditOutcome {
        let Self { session, pre, post } = self;
        let subject_id = session.handler.subject_id(&pre);

        match Self::publish_inner(&session, pre, post, originator_id).await {
            Ok(Some(event)) => {
                info!(
                    subject_id = %subject_id,
                    activity = %event.activity_type,
                    "Audit event published"
                );
                AuditOutcome::Published(Box::new(event))
            }
            Ok(None) => {
                debug!(subject_id = %subject_id, "No auditable change");
                AuditOutcome::NoChange
            }
            Err(e) => {
                error!(
                    subject_id = %subject_id,
                    error = %e,
                    "An unexpected error occurred when recording audit event for {} of {}",
                    session.handler.describe(),
                    subject_id
                );
                AuditOutcome::Failed
            }
        }
    }

    async fn publish_inner(
        session: &AuditSession<H>,
        pre: H::PreState,
        post: H::PostState,
        originator_id: UserId,
    ) -> AppResult<Option<AuditEvent>> {
        let Some(builder) = session.handler.build_event(pre, post, originator_id)? else {
            return Ok(None);
        };
        let event = builder.trace_id(session.trace_id.clone()).build()?;
        session.sink.post(&event, originator_id).await?;
        Ok(Some(event))
    }
}
