//! Uniform error envelope returned for every non-2xx response

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{DomainError, ValidationViolation};

pub const VALIDATION_FAILED_DESCRIPTION: &str =
    "Alguns campos foram preenchidos indevidamente. Por favor verifique e tente novamente.";
pub const BACKEND_REJECTED_DESCRIPTION: &str = "Erro ao comunicar o gerenciador de chave Pix";
pub const BACKEND_UNAVAILABLE_DESCRIPTION: &str = "Servidor GRPC indisponível";
pub const UNEXPECTED_DESCRIPTION: &str =
    "Ooops, erro inesperado. Por favor comunique o desenvolvedor.";

/// Wire shape of an error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
}

/// One entry of the envelope's `details` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub description: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub envelope: ErrorEnvelope,
}

/// Upper-snake form of the reason phrase, e.g. `UNPROCESSABLE_ENTITY`
fn status_name(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_uppercase()
        .replace([' ', '-'], "_")
}

impl ApiError {
    /// Create a new API error without details
    pub fn new(status: StatusCode, description: impl Into<String>) -> Self {
        Self {
            status,
            envelope: ErrorEnvelope {
                status_code: status.as_u16(),
                name: status_name(status),
                description: description.into(),
                details: Vec::new(),
            },
        }
    }

    /// Append a detail entry
    pub fn with_detail(mut self, description: impl Into<String>) -> Self {
        self.envelope.details.push(ErrorDetail {
            description: description.into(),
        });
        self
    }

    pub fn bad_request(description: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, description)
    }

    pub fn not_found(description: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, description)
    }

    pub fn internal(description: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, description)
    }

    /// 400 with one detail per violation
    pub fn validation(violations: &[ValidationViolation]) -> Self {
        violations.iter().fold(
            Self::bad_request(VALIDATION_FAILED_DESCRIPTION),
            |error, violation| {
                error.with_detail(format!("{} inválido. {}", violation.field, violation.message))
            },
        )
    }

    /// Generic 500; the cause only goes to the log
    pub fn unexpected() -> Self {
        Self::internal(UNEXPECTED_DESCRIPTION)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationFailed { violations } => Self::validation(&violations),
            DomainError::BadRequest { message } => Self::bad_request(message),
            DomainError::BackendRejected { message } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, BACKEND_REJECTED_DESCRIPTION)
                    .with_detail(message)
            }
            DomainError::BackendUnavailable => Self::internal(BACKEND_UNAVAILABLE_DESCRIPTION),
            DomainError::BackendNotFound { message } => Self::not_found(message),
            DomainError::Unexpected { diagnostic } => {
                error!(diagnostic = %diagnostic, "Unexpected error while handling request");
                Self::unexpected()
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.envelope.name, self.envelope.description)
    }
}

impl std::error::Error for ApiError {}
