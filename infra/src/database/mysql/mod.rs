//! MySQL implementations of the core store traits

mod revocation_store_impl;
mod user_directory_impl;

pub use revocation_store_impl::MySqlRevocationStore;
pub use user_directory_impl::MySqlUserDirectory;

use ag_core::errors::StoreError;
use sqlx::error::ErrorKind;

/// Whether `error` is a unique-key collision
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.kind() == ErrorKind::UniqueViolation)
}

/// Classify a driver error for the core
///
/// Integrity and decode faults are constraint violations; connectivity,
/// pool and protocol failures mean the store is unavailable.
pub(crate) fn map_store_error(operation: &str, error: sqlx::Error) -> StoreError {
    let message = format!("{} failed: {}", operation, error);
    match &error {
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => StoreError::ConstraintViolation { message },
            _ => StoreError::Unavailable { message },
        },
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. } => StoreError::ConstraintViolation { message },
        _ => StoreError::Unavailable { message },
    }
}
