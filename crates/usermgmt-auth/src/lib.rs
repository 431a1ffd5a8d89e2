//! # usermgmt-auth
//!
//! Attribute-based authorization for user management.
//!
//! ## Modules
//!
//! - `context`: caller identity lookup
//! - `access`: access profile aggregation and the principal attribute bag
//! - `policy`: policy engine abstraction, a local engine, and the
//!   authorization handler that ties attributes to decisions

pub mod access;
pub mod context;
pub mod policy;

pub use access::{AccessProfileAggregator, AttributeBag, PrincipalAttributeProvider};
pub use context::{Caller, SecurityContext};
pub use policy::{AuthorizationHandler, LocalPolicyEngine, PolicyEngine, ProfileAction, ResourceDescriptor};
