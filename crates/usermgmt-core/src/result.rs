//! Convenience result type alias.

use crate::error::AppError;

/// A specialized `Result` type for user management operations.
pub type AppResult<T> = Result<T, AppError>;
