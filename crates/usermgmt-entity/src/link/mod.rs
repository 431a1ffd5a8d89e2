//! Profile links and the access profiles derived from them.

pub mod access_profile;
pub mod model;

pub use access_profile::AccessProfile;
pub use model::{NewProfileLink, ProfileLink};
