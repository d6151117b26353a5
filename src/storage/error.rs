//! Record store error types and result alias.

use thiserror::Error;

/// Result type alias for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a [`RecordStore`](crate::storage::RecordStore).
///
/// Steady-state failures are never retried by the store; the caller decides
/// whether to retry or fail the request.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or did not answer the liveness ping.
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<sqlx::Error>,
    },

    /// A single store operation failed after the connection was established.
    #[error("Store operation failed: {0}")]
    Backend(#[from] sqlx::Error),

    /// A counter key holds something other than a non-negative integer.
    #[error("Counter '{key}' does not hold a non-negative integer")]
    CorruptCounter { key: String },
}

impl StoreError {
    pub fn connection(message: impl Into<String>, source: sqlx::Error) -> Self {
        StoreError::Connection {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::Connection { .. })
    }
}
