//! Individual and employer profiles.

pub mod filters;
pub mod service;

pub use filters::IndividualProfileFilters;
pub use service::{EmployerProfileData, IndividualProfileData, ProfileService};
