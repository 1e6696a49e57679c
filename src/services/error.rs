use thiserror::Error;

use crate::database::manager::DatabaseError;
use crate::observer::error::ObserverError;
use crate::services::access::AccessError;
use crate::services::notifier::NotificationError;

/// Errors surfaced by the service layer. Existence failures are `NotFound`,
/// permission failures are `Unauthorized`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Observer(#[from] ObserverError),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ServiceError::Unauthorized(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }
}

impl From<AccessError> for ServiceError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::ProgenyNotFound(_) => ServiceError::NotFound(err.to_string()),
            AccessError::NoAccess(_) | AccessError::NotAdmin(_) => ServiceError::Unauthorized(err.to_string()),
            AccessError::Database(e) => ServiceError::Database(e),
        }
    }
}

impl From<NotificationError> for ServiceError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::Database(e) => ServiceError::Database(e),
            other => ServiceError::Observer(ObserverError::NotificationError(other.to_string())),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
