//! Pix key request and response bodies

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AccountDetails, AccountType, ClosedSet, DomainError, KeyType, NewPixKey, PixKeyDetails,
    PixKeySummary, RequestValidator,
};

/// 400 raised when a field the route needs is missing from the body
pub fn missing_body_field(field: &str) -> DomainError {
    DomainError::bad_request(format!(
        "É necessário informar um {} no corpo da requisição",
        field
    ))
}

/// Body of `POST /api/v1/pix`
///
/// Every field is optional on the wire so that missing values surface as
/// validation violations instead of parse failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKeyRequest {
    pub client_id: Option<String>,
    pub key_type: Option<String>,
    pub key: Option<String>,
    pub account_type: Option<String>,
}

impl NewKeyRequest {
    /// Structural validation, then the key format rule of the key type
    pub fn validate(&self) -> Result<NewPixKey, DomainError> {
        let client_id = self.client_id.as_deref();
        let key_type = self.key_type.as_deref();
        let account_type = self.account_type.as_deref();

        RequestValidator::new()
            .required("clientId", client_id)
            .uuid("clientId", client_id)
            .required("keyType", key_type)
            .member_of::<KeyType>("keyType", key_type)
            .required("accountType", account_type)
            .member_of::<AccountType>("accountType", account_type)
            .finish()?;

        let key_type = parse_variant::<KeyType>("keyType", key_type)?;
        let account_type = parse_variant::<AccountType>("accountType", account_type)?;

        key_type.validate_key(self.key.as_deref())?;

        let key = match key_type {
            KeyType::Random => String::new(),
            _ => self.key.clone().unwrap_or_default(),
        };

        Ok(NewPixKey {
            client_id: client_id.unwrap_or_default().to_string(),
            key_type,
            key,
            account_type,
        })
    }
}

fn parse_variant<T: ClosedSet>(field: &str, value: Option<&str>) -> Result<T, DomainError> {
    value
        .and_then(T::from_name)
        .ok_or_else(|| DomainError::unexpected(format!("{} passed validation but did not parse", field)))
}

/// Body of `DELETE /api/v1/pix/{pixId}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveKeyRequest {
    pub client_id: Option<String>,
}

impl RemoveKeyRequest {
    /// Parse the raw body. An empty body or an absent `clientId` is reported
    /// as a missing body field; present-but-blank is left to validation.
    pub fn from_body(body: &[u8]) -> Result<Self, DomainError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(missing_body_field("clientId"));
        }

        let request: Self = serde_json::from_slice(body)
            .map_err(|e| DomainError::bad_request(format!("Invalid JSON data: {}", e)))?;

        if request.client_id.is_none() {
            return Err(missing_body_field("clientId"));
        }

        Ok(request)
    }
}

/// Body of a successful registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixKeyCreatedResponse {
    pub pix_id: String,
}

/// One entry of a client's key list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixKeySummaryResponse {
    pub pix_id: String,
    pub client_id: String,
    pub key_type: KeyType,
    pub key: String,
    pub account_type: AccountType,
    pub created_at: String,
}

impl From<&PixKeySummary> for PixKeySummaryResponse {
    fn from(summary: &PixKeySummary) -> Self {
        Self {
            pix_id: summary.pix_id.clone(),
            client_id: summary.client_id.clone(),
            key_type: summary.key_type,
            key: summary.key.clone(),
            account_type: summary.account_type,
            created_at: format_timestamp(&summary.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetailsResponse {
    pub account_type: AccountType,
    pub institution_name: String,
    pub institution_ispb: String,
    pub holder_name: String,
    pub holder_cpf: String,
    pub agency: String,
    pub number: String,
}

impl From<&AccountDetails> for AccountDetailsResponse {
    fn from(account: &AccountDetails) -> Self {
        Self {
            account_type: account.account_type,
            institution_name: account.institution_name.clone(),
            institution_ispb: account.institution_ispb.clone(),
            holder_name: account.holder_name.clone(),
            holder_cpf: account.holder_cpf.clone(),
            agency: account.agency.clone(),
            number: account.number.clone(),
        }
    }
}

/// Detail view of a single key
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixKeyDetailsResponse {
    pub key_type: KeyType,
    pub key: String,
    pub account: AccountDetailsResponse,
    pub created_at: String,
}

impl From<&PixKeyDetails> for PixKeyDetailsResponse {
    fn from(details: &PixKeyDetails) -> Self {
        Self {
            key_type: details.key_type,
            key: details.key.clone(),
            account: AccountDetailsResponse::from(&details.account),
            created_at: format_timestamp(&details.created_at),
        }
    }
}

/// ISO-8601 in UTC with a `Z` suffix
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
