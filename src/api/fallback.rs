//! Envelope responses for requests no route handles

use axum::http::StatusCode;

use crate::api::types::ApiError;

pub const ROUTE_NOT_FOUND_DESCRIPTION: &str = "Recurso não encontrado";
pub const METHOD_NOT_ALLOWED_DESCRIPTION: &str = "Método não suportado para este recurso";

pub async fn route_not_found() -> ApiError {
    ApiError::not_found(ROUTE_NOT_FOUND_DESCRIPTION)
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_DESCRIPTION)
}
