//! Store errors.

use thiserror::Error;

/// Errors returned by recipient store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Query or connection failure.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Schema migration failure at startup.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No row for the given key.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("weekday out of range: {0}")]
    InvalidWeekday(u8),
}

impl DatabaseError {
    /// Whether the error is a missing row rather than a storage failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
