//! Convenience result type alias for CargoTrack.

use crate::error::AppError;

/// A specialized `Result` type for CargoTrack operations.
pub type AppResult<T> = Result<T, AppError>;
