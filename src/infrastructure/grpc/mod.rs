//! gRPC adapter for the pix key manager

mod client;

/// Messages and client generated from `proto/pix_manager.proto`
pub mod proto {
    tonic::include_proto!("pix.manager.v1");
}

pub use client::GrpcPixKeyManager;
