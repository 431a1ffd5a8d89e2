//! Outbound events and their vocabulary.
//!
//! Audit events are wrapped in an [`EventEnvelope`] and published to a
//! logical [`PublisherTopic`] through an
//! [`EventPublisher`](crate::traits::EventPublisher).

pub mod audit;
pub mod envelope;
pub mod topic;

pub use audit::{
    AuditActivityType, AuditEvent, AuditEventBuilder, AuditEventBusinessObject,
    AuditRequestContext, BusinessObject,
};
pub use envelope::{EventEnvelope, EventMetadata};
pub use topic::PublisherTopic;
