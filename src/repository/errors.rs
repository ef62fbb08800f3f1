use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity does not exist.
    #[error("entity not found")]
    NotFound,
    /// A pooled connection could not be acquired.
    #[error("database pool error: {0}")]
    PoolError(#[from] diesel::r2d2::PoolError),
    /// The underlying query failed.
    #[error("database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
    /// A stored value failed domain validation on the way out.
    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<TypeConstraintError> for RepositoryError {
    fn from(value: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(value.to_string())
    }
}
