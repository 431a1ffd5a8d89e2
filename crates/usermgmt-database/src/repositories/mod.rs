//! PostgreSQL repository implementations of the store traits.

pub mod employer_profile;
pub mod individual_profile;
pub mod profile_link;
pub mod user;

pub use employer_profile::EmployerProfileRepository;
pub use individual_profile::IndividualProfileRepository;
pub use profile_link::ProfileLinkRepository;
pub use user::UserRepository;
