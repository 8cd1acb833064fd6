use rentline_core::AppError;
use tracing::warn;

/// Classifies a failed relational-store call.
///
/// Errors reported by the database and connectivity failures become
/// `AppError::Remote`. Only the server's message or a fixed text is kept.
/// Anything else means the adapter and schema disagree and stays internal.
pub(crate) fn store_failure(operation: &str, error: sqlx::Error) -> AppError {
    match error {
        sqlx::Error::Database(database_error) => {
            warn!(operation, error = %database_error, "database rejected statement");
            AppError::Remote(database_error.message().to_owned())
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_) => {
            warn!(operation, error = %error, "database unreachable");
            AppError::Remote("database unavailable".to_owned())
        }
        other => AppError::Internal(format!("failed to {operation}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use rentline_core::AppError;

    use super::store_failure;

    #[test]
    fn connectivity_failures_are_remote_without_detail() {
        assert!(matches!(
            store_failure("insert listing", sqlx::Error::PoolTimedOut),
            AppError::Remote(message) if message == "database unavailable"
        ));
    }

    #[test]
    fn mapping_failures_stay_internal() {
        assert!(matches!(
            store_failure("find listing", sqlx::Error::ColumnNotFound("owner_id".to_owned())),
            AppError::Internal(message) if message.starts_with("failed to find listing: ")
        ));
    }
}
