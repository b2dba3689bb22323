//! Classification of failed pix key manager calls

use tonic::{Code, Status};
use tracing::warn;

use crate::domain::DomainError;

/// Used when the backend fails without a description
pub const FALLBACK_MESSAGE: &str = "Erro inesperado, contate o desenvolvedor.";

/// Map a backend status code and optional description to a domain error.
///
/// First match wins: `Unavailable`, then `NotFound`, then everything else is
/// a business-rule rejection.
pub fn classify(code: Code, description: Option<&str>) -> DomainError {
    let message = description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(FALLBACK_MESSAGE);

    match code {
        Code::Unavailable => DomainError::BackendUnavailable,
        Code::NotFound => DomainError::not_found(message),
        _ => DomainError::rejected(message),
    }
}

/// Classify a failed call, logging what the backend returned
pub fn classify_status(operation: &str, status: &Status) -> DomainError {
    let description = Some(status.message()).filter(|m| !m.is_empty());

    warn!(
        operation = operation,
        code = ?status.code(),
        description = description.unwrap_or_default(),
        "Pix key manager call failed"
    );

    classify(status.code(), description)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CODES: [Code; 17] = [
        Code::Ok,
        Code::Cancelled,
        Code::Unknown,
        Code::InvalidArgument,
        Code::DeadlineExceeded,
        Code::NotFound,
        Code::AlreadyExists,
        Code::PermissionDenied,
        Code::ResourceExhausted,
        Code::FailedPrecondition,
        Code::Aborted,
        Code::OutOfRange,
        Code::Unimplemented,
        Code::Internal,
        Code::Unavailable,
        Code::DataLoss,
        Code::Unauthenticated,
    ];

    #[test]
    fn test_unavailable_drops_description() {
        assert_eq!(
            classify(Code::Unavailable, Some("connection refused")),
            DomainError::BackendUnavailable
        );
        assert_eq!(classify(Code::Unavailable, None), DomainError::BackendUnavailable);
    }

    #[test]
    fn test_not_found_passes_description_through() {
        assert_eq!(
            classify(Code::NotFound, Some("chave pix não encontrada")),
            DomainError::not_found("chave pix não encontrada")
        );
        assert_eq!(
            classify(Code::NotFound, None),
            DomainError::not_found(FALLBACK_MESSAGE)
        );
    }

    #[test]
    fn test_other_codes_are_rejections() {
        assert_eq!(
            classify(Code::Internal, Some("Dummy Description")),
            DomainError::rejected("Dummy Description")
        );
        assert_eq!(
            classify(Code::AlreadyExists, Some("   ")),
            DomainError::rejected(FALLBACK_MESSAGE)
        );
    }

    #[test]
    fn test_classification_is_total_and_deterministic() {
        for code in ALL_CODES {
            for description in [None, Some("x")] {
                let first = classify(code, description);
                let second = classify(code, description);
                assert_eq!(first, second);

                match code {
                    Code::Unavailable => assert_eq!(first, DomainError::BackendUnavailable),
                    Code::NotFound => assert!(matches!(first, DomainError::BackendNotFound { .. })),
                    _ => assert!(matches!(first, DomainError::BackendRejected { .. })),
                }
            }
        }
    }

    #[test]
    fn test_classify_status_treats_empty_message_as_absent() {
        let error = classify_status("list", &Status::new(Code::Internal, ""));
        assert_eq!(error, DomainError::rejected(FALLBACK_MESSAGE));

        let error = classify_status("remove", &Status::not_found("chave pix não encontrada"));
        assert_eq!(error, DomainError::not_found("chave pix não encontrada"));
    }
}
