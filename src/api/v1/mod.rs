//! Versioned public API

pub mod pix;

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::fallback;
use super::state::AppState;

/// Create v1 API router, nested under `/api/v1`
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/pix", post(pix::register_key))
        .route("/pix/{pix_id}", delete(pix::remove_key))
        .route("/clients/{client_id}/pix", get(pix::list_keys))
        .route("/clients/{client_id}/pix/{pix_id}", get(pix::get_key_details))
        .method_not_allowed_fallback(fallback::method_not_allowed)
}
