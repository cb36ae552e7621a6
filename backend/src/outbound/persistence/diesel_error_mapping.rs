//! Shared Diesel and pool error classification for MoodShift repositories.
//!
//! Every repository port exposes `Connection` and `Query` variants; the card
//! and settings ports add `ProfileMissing` for foreign-key violations on
//! `user_id`. Repositories classify once here and pick their own constructor.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse outcome of a failed Diesel call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped or could not be used.
    Connection(&'static str),
    /// The statement failed for any other reason.
    Query(&'static str),
    /// A row referenced a profile that does not exist.
    MissingProfile,
}

/// Flatten a pool error into the message carried by `Connection` variants.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, logging the database detail at debug level.
pub(crate) fn classify_diesel_error(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DeserializationError(_) => DieselFailure::Query("stored row is malformed"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DieselFailure::MissingProfile
        }
        _ => DieselFailure::Query("database error"),
    }
}

/// Map a Diesel error onto a port error that has no profile variant.
///
/// Foreign-key violations surface as query errors for such ports.
pub(crate) fn map_basic_diesel_error<E>(
    error: &DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => connection(message),
        DieselFailure::Query(message) => query(message),
        DieselFailure::MissingProfile => query("referenced profile does not exist"),
    }
}
