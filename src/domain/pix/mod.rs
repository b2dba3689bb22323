//! Pix keys: types, format rules, validation and the backend port

mod account_type;
mod entity;
mod key_type;
mod manager;
pub mod outcome;
pub mod validation;

pub use account_type::AccountType;
pub use entity::{AccountDetails, NewPixKey, PixKeyDetails, PixKeySummary};
pub use key_type::{
    is_valid_cpf, ClosedSet, KeyType, CPF_KEY_MESSAGE, EMAIL_KEY_MESSAGE, PHONE_KEY_MESSAGE,
    RANDOM_KEY_MESSAGE,
};
#[cfg(test)]
pub use manager::MockPixKeyManager;
pub use manager::{PixKeyManager, PixKeyManagerError};
pub use outcome::classify;
pub use validation::{RequestValidator, ValidationViolation};
