use thiserror::Error;

use crate::auth::AuthError;
use crate::database::StoreError;

/// Failures of a domain operation, before HTTP mapping
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or out-of-range input; nothing was written
    #[error("{message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },

    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not permitted. The message never reveals whether the
    /// target resource exists.
    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: Some(field),
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: None,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        DomainError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::Store(StoreError::NotFound(message.into()))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
