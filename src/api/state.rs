//! Application state for shared services

use std::sync::Arc;

use crate::domain::PixKeyManager;

/// Shared, read-only handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub pix_manager: Arc<dyn PixKeyManager>,
}

impl AppState {
    pub fn new(pix_manager: Arc<dyn PixKeyManager>) -> Self {
        Self { pix_manager }
    }
}
