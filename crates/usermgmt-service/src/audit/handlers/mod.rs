//! One audit handler per auditable change kind.

pub mod access_level;
pub mod data_changed;

pub use access_level::{AccessLevelSnapshot, ProfileUserAccessLevelHandler};
pub use data_changed::{
    AuditedProfile, DataSnapshot, EmployerDataChangedHandler, IndividualDataChangedHandler,
    ProfileDataChangedHandler,
};
