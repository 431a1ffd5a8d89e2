//! Core type definitions used across the workspace.

pub mod filter;
pub mod id;
pub mod pagination;
pub mod sorting;

pub use filter::{escape_like, FilterField, FilterOp, FilterTarget, FilterValue, Predicate, PredicateSet};
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
pub use sorting::{SortDirection, SortField};
