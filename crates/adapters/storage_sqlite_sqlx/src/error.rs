//! Storage-specific error type wrapping sqlx errors.

use wellbook_domain::error::{ConflictError, WellbookError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for WellbookError {
    fn from(err: StorageError) -> Self {
        if let StorageError::Database(sqlx::Error::Database(db)) = &err {
            if db.is_unique_violation() {
                return ConflictError::Duplicate { entity: "Record" }.into();
            }
            if db.is_foreign_key_violation() {
                return ConflictError::InUse.into();
            }
        }
        tracing::error!(error = ?err, "storage failure");
        Self::Storage(Box::new(err))
    }
}
