//! # usermgmt-core
//!
//! Core crate for the user management service. Contains configuration
//! schemas, typed identifiers, predicate sets for row-level filtering,
//! the audit event vocabulary, the event publisher trait, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
