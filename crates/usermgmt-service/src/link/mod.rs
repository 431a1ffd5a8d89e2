//! Profile links: audited mutations and filtered listings.

pub mod filters;
pub mod service;

pub use filters::{LinkFilterBuilder, ProfileLinkFilters};
pub use service::{ProfileLinkService, UpsertLinkRequest};
