//! # usermgmt-entity
//!
//! Domain entity models for user management. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities additionally derive `sqlx::FromRow`.

pub mod link;
pub mod profile;
pub mod user;
