//! # usermgmt-database
//!
//! PostgreSQL connection management, the store traits the service layer
//! depends on, Postgres repositories implementing them, and in-memory
//! stores for single-node runs and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod query;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{EmployerProfileStore, IdentityLookup, IndividualProfileStore, ProfileLinkStore};
