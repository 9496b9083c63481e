//! Convenience result type alias for DeckShare.

use crate::error::AppError;

/// A specialized `Result` type for DeckShare operations.
pub type AppResult<T> = Result<T, AppError>;
