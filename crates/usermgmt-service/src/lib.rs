//! # usermgmt-service
//!
//! Business logic service layer for user management. Profile and profile
//! link mutations run through audit handlers that capture state before and
//! after the change and publish an audit event only when something
//! reportable changed. Link listings apply row-level filters derived from
//! the caller's identity class.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod audit;
pub mod context;
pub mod link;
pub mod profile;

pub use audit::{AuditEventService, AuditEventSink, AuditHandler, AuditOutcome, AuditSession};
pub use context::RequestContext;
pub use link::{LinkFilterBuilder, ProfileLinkFilters, ProfileLinkService};
pub use profile::{IndividualProfileFilters, ProfileService};
