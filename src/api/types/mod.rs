//! HTTP request, response and error bodies

pub mod error;
pub mod json;
pub mod path;
pub mod pix;

pub use error::{ApiError, ErrorDetail, ErrorEnvelope};
pub use json::Json;
pub use path::Path;
pub use pix::{
    AccountDetailsResponse, NewKeyRequest, PixKeyCreatedResponse, PixKeyDetailsResponse,
    PixKeySummaryResponse, RemoveKeyRequest,
};
