//! Profiles and their closed vocabularies.

pub mod access_level;
pub mod address;
pub mod employer;
pub mod individual;
pub mod profile_type;

pub use access_level::ProfileAccessLevel;
pub use address::Address;
pub use employer::EmployerProfile;
pub use individual::IndividualProfile;
pub use profile_type::ProfileType;
