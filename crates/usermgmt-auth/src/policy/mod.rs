//! Policy decisions over principal attributes.

pub mod engine;
pub mod handler;
pub mod local;

pub use engine::{PolicyEngine, Principal, ProfileAction, ResourceDescriptor};
pub use handler::AuthorizationHandler;
pub use local::LocalPolicyEngine;
