//! Infrastructure layer - External service implementations

pub mod grpc;
pub mod logging;
pub mod observability;
