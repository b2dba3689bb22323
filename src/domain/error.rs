use thiserror::Error;

use super::pix::ValidationViolation;

/// Core domain errors
///
/// Each variant carries exactly what the HTTP error envelope needs. The
/// `Unexpected` diagnostic is for server-side logs only and is never rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Validation failed: {} violation(s)", violations.len())]
    ValidationFailed { violations: Vec<ValidationViolation> },

    #[error("Pix key manager unavailable")]
    BackendUnavailable,

    #[error("Not found: {message}")]
    BackendNotFound { message: String },

    #[error("Rejected by pix key manager: {message}")]
    BackendRejected { message: String },

    #[error("Unexpected error: {diagnostic}")]
    Unexpected { diagnostic: String },
}

impl DomainError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn validation_failed(violations: Vec<ValidationViolation>) -> Self {
        Self::ValidationFailed { violations }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::BackendNotFound {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::BackendRejected {
            message: message.into(),
        }
    }

    pub fn unexpected(diagnostic: impl Into<String>) -> Self {
        Self::Unexpected {
            diagnostic: diagnostic.into(),
        }
    }
}
