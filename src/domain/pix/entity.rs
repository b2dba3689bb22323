//! Pix key commands and read models

use chrono::{DateTime, Utc};

use super::{AccountType, KeyType};

/// A validated request to register a new key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPixKey {
    pub client_id: String,
    pub key_type: KeyType,
    /// Empty for `RANDOM` keys, the backend generates those
    pub key: String,
    pub account_type: AccountType,
}

/// Summary projection returned when listing a client's keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixKeySummary {
    pub pix_id: String,
    pub client_id: String,
    pub key_type: KeyType,
    pub key: String,
    pub account_type: AccountType,
    pub created_at: DateTime<Utc>,
}

/// Account a key is bound to, as known by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDetails {
    pub account_type: AccountType,
    pub institution_name: String,
    pub institution_ispb: String,
    pub holder_name: String,
    pub holder_cpf: String,
    pub agency: String,
    pub number: String,
}

/// Detail projection of a single key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixKeyDetails {
    pub pix_id: String,
    pub client_id: String,
    pub key_type: KeyType,
    pub key: String,
    pub account: AccountDetails,
    pub created_at: DateTime<Utc>,
}
