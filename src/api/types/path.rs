//! Path extractor whose rejections render in the standard envelope

use axum::{
    extract::{rejection::PathRejection, FromRequestParts, Path as AxumPath},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::error::ApiError;

/// Wrapper around `axum::extract::Path`; undecodable segments become a 400
/// envelope instead of axum's plain-text body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumPath::<T>::from_request_parts(parts, state).await {
            Ok(AxumPath(value)) => Ok(Path(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: PathRejection) -> ApiError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            debug!(rejection = %err.body_text(), "Rejected path parameters");
            ApiError::bad_request(err.body_text())
        }
        other => {
            error!(rejection = %other.body_text(), "Path extractor used on a route without parameters");
            ApiError::unexpected()
        }
    }
}
