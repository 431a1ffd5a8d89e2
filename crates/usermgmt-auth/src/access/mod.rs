//! Access profile aggregation and principal attributes.

pub mod aggregator;
pub mod attributes;

pub use aggregator::AccessProfileAggregator;
pub use attributes::{AttributeBag, PrincipalAttributeProvider};
