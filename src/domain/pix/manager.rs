//! Port to the remote pix key manager

use async_trait::async_trait;
use thiserror::Error;
use tonic::Status;

use super::outcome::classify_status;
use super::{NewPixKey, PixKeyDetails, PixKeySummary};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Failure of a single call to the pix key manager
#[derive(Debug, Error)]
pub enum PixKeyManagerError {
    /// The call itself failed with a transport status
    #[error("rpc failed: {0}")]
    Rpc(#[from] Status),

    /// The call succeeded but the payload could not be mapped
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl PixKeyManagerError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Classify this failure into a domain error, exactly once per call
    pub fn into_domain(self, operation: &str) -> DomainError {
        match self {
            Self::Rpc(status) => classify_status(operation, &status),
            Self::MalformedResponse(message) => {
                DomainError::unexpected(format!("{} returned a malformed response: {}", operation, message))
            }
        }
    }
}

/// Remote key-management service. Implementations must be shareable across
/// concurrent requests without locking.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PixKeyManager: Send + Sync {
    /// Registers a key and returns the backend-assigned pix id
    async fn register(&self, key: NewPixKey) -> Result<String, PixKeyManagerError>;

    /// Lists a client's keys in backend order
    async fn list(&self, client_id: &str) -> Result<Vec<PixKeySummary>, PixKeyManagerError>;

    /// Fetches one key owned by the client
    async fn get_details(
        &self,
        pix_id: &str,
        client_id: &str,
    ) -> Result<PixKeyDetails, PixKeyManagerError>;

    /// Removes one key owned by the client
    async fn remove(&self, pix_id: &str, client_id: &str) -> Result<(), PixKeyManagerError>;
}
