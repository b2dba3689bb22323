//! tonic client for the remote pix key manager

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tonic::transport::{Channel, Endpoint};
use tonic::Status;
use tracing::{debug, info};

use super::proto;
use super::proto::pix_key_manager_service_client::PixKeyManagerServiceClient;
use crate::config::PixManagerConfig;
use crate::domain::{
    AccountDetails, AccountType, KeyType, NewPixKey, PixKeyDetails, PixKeyManager,
    PixKeyManagerError, PixKeySummary,
};
use crate::infrastructure::observability::record_rpc_call;

/// `PixKeyManager` over a single multiplexed gRPC channel.
///
/// Cloning shares the channel; the connection is established on first use.
#[derive(Debug, Clone)]
pub struct GrpcPixKeyManager {
    client: PixKeyManagerServiceClient<Channel>,
}

impl GrpcPixKeyManager {
    /// Build the client without connecting. Must run inside a tokio runtime.
    pub fn connect_lazy(config: &PixManagerConfig) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(config.endpoint.clone())?
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .connect_lazy();

        info!(endpoint = %config.endpoint, "Pix key manager client configured");

        Ok(Self {
            client: PixKeyManagerServiceClient::new(channel),
        })
    }
}

/// Await one unary call, recording its outcome and latency
async fn observe<T, F>(operation: &'static str, call: F) -> Result<T, Status>
where
    F: Future<Output = Result<tonic::Response<T>, Status>>,
{
    let start = Instant::now();
    let result = call.await.map(tonic::Response::into_inner);

    let outcome = match &result {
        Ok(_) => "ok".to_string(),
        Err(status) => format!("{:?}", status.code()),
    };
    let elapsed = start.elapsed();

    debug!(
        operation,
        outcome = %outcome,
        duration_ms = %elapsed.as_millis(),
        "Pix key manager call finished"
    );
    record_rpc_call(operation, &outcome, elapsed);

    result
}

#[async_trait]
impl PixKeyManager for GrpcPixKeyManager {
    async fn register(&self, key: NewPixKey) -> Result<String, PixKeyManagerError> {
        let request = proto::RegisterPixKeyRequest {
            client_id: key.client_id,
            key_type: key_type_to_proto(key.key_type) as i32,
            key: key.key,
            account_type: account_type_to_proto(key.account_type) as i32,
        };

        let mut client = self.client.clone();
        let response = observe("register", client.register(request)).await?;

        if response.pix_id.trim().is_empty() {
            return Err(PixKeyManagerError::malformed("register returned an empty pix id"));
        }

        Ok(response.pix_id)
    }

    async fn list(&self, client_id: &str) -> Result<Vec<PixKeySummary>, PixKeyManagerError> {
        let request = proto::ListPixKeysRequest {
            client_id: client_id.to_string(),
        };

        let mut client = self.client.clone();
        let response = observe("list", client.list(request)).await?;

        response.keys.into_iter().map(summary_from_proto).collect()
    }

    async fn get_details(
        &self,
        pix_id: &str,
        client_id: &str,
    ) -> Result<PixKeyDetails, PixKeyManagerError> {
        let request = proto::PixKeyDetailsRequest {
            pix_id: pix_id.to_string(),
            client_id: client_id.to_string(),
        };

        let mut client = self.client.clone();
        let response = observe("get_details", client.get_details(request)).await?;

        let pix_key = response
            .pix_key
            .ok_or_else(|| PixKeyManagerError::malformed("response carried no pix key"))?;

        details_from_proto(pix_key)
    }

    async fn remove(&self, pix_id: &str, client_id: &str) -> Result<(), PixKeyManagerError> {
        let request = proto::RemovePixKeyRequest {
            pix_id: pix_id.to_string(),
            client_id: client_id.to_string(),
        };

        let mut client = self.client.clone();
        observe("remove", client.remove(request)).await?;

        Ok(())
    }
}

fn key_type_to_proto(key_type: KeyType) -> proto::KeyType {
    match key_type {
        KeyType::Cpf => proto::KeyType::Cpf,
        KeyType::Email => proto::KeyType::Email,
        KeyType::Phone => proto::KeyType::Phone,
        KeyType::Random => proto::KeyType::Random,
    }
}

fn account_type_to_proto(account_type: AccountType) -> proto::AccountType {
    match account_type {
        AccountType::Checking => proto::AccountType::Checking,
        AccountType::Savings => proto::AccountType::Savings,
    }
}

fn key_type_from_proto(value: i32) -> Result<KeyType, PixKeyManagerError> {
    match proto::KeyType::try_from(value) {
        Ok(proto::KeyType::Cpf) => Ok(KeyType::Cpf),
        Ok(proto::KeyType::Email) => Ok(KeyType::Email),
        Ok(proto::KeyType::Phone) => Ok(KeyType::Phone),
        Ok(proto::KeyType::Random) => Ok(KeyType::Random),
        Ok(proto::KeyType::UnknownKeyType) | Err(_) => Err(PixKeyManagerError::malformed(
            format!("unsupported key type {}", value),
        )),
    }
}

fn account_type_from_proto(value: i32) -> Result<AccountType, PixKeyManagerError> {
    match proto::AccountType::try_from(value) {
        Ok(proto::AccountType::Checking) => Ok(AccountType::Checking),
        Ok(proto::AccountType::Savings) => Ok(AccountType::Savings),
        Ok(proto::AccountType::UnknownAccountType) | Err(_) => Err(
            PixKeyManagerError::malformed(format!("unsupported account type {}", value)),
        ),
    }
}

fn timestamp_from_proto(
    timestamp: Option<prost_types::Timestamp>,
) -> Result<DateTime<Utc>, PixKeyManagerError> {
    let timestamp =
        timestamp.ok_or_else(|| PixKeyManagerError::malformed("missing created_at"))?;

    u32::try_from(timestamp.nanos)
        .ok()
        .and_then(|nanos| DateTime::from_timestamp(timestamp.seconds, nanos))
        .ok_or_else(|| {
            PixKeyManagerError::malformed(format!(
                "created_at out of range: {}s {}ns",
                timestamp.seconds, timestamp.nanos
            ))
        })
}

fn summary_from_proto(key: proto::PixKeySummary) -> Result<PixKeySummary, PixKeyManagerError> {
    Ok(PixKeySummary {
        key_type: key_type_from_proto(key.key_type)?,
        account_type: account_type_from_proto(key.account_type)?,
        created_at: timestamp_from_proto(key.created_at)?,
        pix_id: key.pix_id,
        client_id: key.client_id,
        key: key.key,
    })
}

fn details_from_proto(key: proto::PixKeyDetails) -> Result<PixKeyDetails, PixKeyManagerError> {
    let account = key
        .account
        .ok_or_else(|| PixKeyManagerError::malformed("missing account"))?;

    Ok(PixKeyDetails {
        key_type: key_type_from_proto(key.key_type)?,
        created_at: timestamp_from_proto(key.created_at)?,
        account: AccountDetails {
            account_type: account_type_from_proto(account.account_type)?,
            institution_name: account.institution_name,
            institution_ispb: account.institution_ispb,
            holder_name: account.holder_name,
            holder_cpf: account.holder_cpf,
            agency: account.agency,
            number: account.number,
        },
        pix_id: key.pix_id,
        client_id: key.client_id,
        key: key.key,
    })
}
