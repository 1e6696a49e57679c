use thiserror::Error;

use crate::database::manager::DatabaseError;

/// Observer system errors
#[derive(Debug, Error, Clone)]
pub enum ObserverError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Notification error: {0}")]
    NotificationError(String),
}

impl From<DatabaseError> for ObserverError {
    fn from(error: DatabaseError) -> Self {
        ObserverError::DatabaseError(error.to_string())
    }
}
