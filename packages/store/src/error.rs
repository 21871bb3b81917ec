//! Store error type.

use thiserror::Error;

/// Failure reported by a [`crate::MemoStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "postgres")]
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
