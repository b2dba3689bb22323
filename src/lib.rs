//! Pix Gateway
//!
//! HTTP front for a remote pix key manager:
//! - Register, list, fetch and remove pix keys over gRPC
//! - Request and key-format validation before any backend call
//! - One error envelope for every failure

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use api::state::AppState;
use infrastructure::grpc::GrpcPixKeyManager;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration.
/// The backend channel connects lazily, so an unreachable pix key manager
/// does not prevent startup.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let pix_manager = GrpcPixKeyManager::connect_lazy(&config.pix_manager).with_context(|| {
        format!(
            "invalid pix key manager endpoint: {}",
            config.pix_manager.endpoint
        )
    })?;

    Ok(AppState::new(Arc::new(pix_manager)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PixManagerConfig;

    #[tokio::test]
    async fn test_create_app_state_with_defaults() {
        assert!(create_app_state().await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_endpoint_fails_startup() {
        let config = AppConfig {
            pix_manager: PixManagerConfig {
                endpoint: "not a uri".to_string(),
                ..PixManagerConfig::default()
            },
            ..AppConfig::default()
        };

        let err = create_app_state_with_config(&config).await.err().unwrap();
        assert!(err.to_string().contains("invalid pix key manager endpoint"));
    }
}
