//! Change-tracking audit pipeline.
//!
//! A mutation is audited in three steps: capture the subject's state
//! before the change, capture it again after, then publish. The
//! [`AuditSession`] typestate enforces that order and consumes itself on
//! publish, so a session cannot be reused for a second mutation.

pub mod action;
pub mod diff;
pub mod events;
pub mod handler;
pub mod handlers;
pub mod sink;

#[cfg(test)]
pub(crate) mod testing;

pub use diff::remove_common_items;
pub use handler::{AuditHandler, AuditOutcome, AuditSession, PostUpdate, PreUpdate};
pub use handlers::{
    EmployerDataChangedHandler, IndividualDataChangedHandler, ProfileDataChangedHandler,
    ProfileUserAccessLevelHandler,
};
pub use sink::{AuditEventService, AuditEventSink, record_best_effort};
