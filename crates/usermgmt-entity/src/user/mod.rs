//! Users (identities).

pub mod model;
pub mod user_type;

pub use model::UserEntity;
pub use user_type::UserType;
