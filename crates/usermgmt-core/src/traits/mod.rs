//! Core traits defined in `usermgmt-core` and implemented by other crates.

pub mod publisher;
pub mod service;

pub use publisher::EventPublisher;
pub use service::Service;
