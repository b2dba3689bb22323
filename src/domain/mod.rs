//! Domain layer - Pix key rules, validation and error taxonomy

pub mod error;
pub mod pix;

pub use error::DomainError;
pub use pix::{
    AccountDetails, AccountType, ClosedSet, KeyType, NewPixKey, PixKeyDetails, PixKeyManager,
    PixKeyManagerError, PixKeySummary, RequestValidator, ValidationViolation,
};
