//! Pix key endpoint handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, Json, NewKeyRequest, Path, PixKeyCreatedResponse, PixKeyDetailsResponse,
    PixKeySummaryResponse, RemoveKeyRequest,
};
use crate::domain::{DomainError, RequestValidator};

fn validate_client_id(client_id: &str) -> Result<(), DomainError> {
    RequestValidator::new()
        .required("clientId", Some(client_id))
        .uuid("clientId", Some(client_id))
        .finish()
}

fn validate_key_reference(pix_id: &str, client_id: &str) -> Result<(), DomainError> {
    RequestValidator::new()
        .required("pixId", Some(pix_id))
        .uuid("pixId", Some(pix_id))
        .required("clientId", Some(client_id))
        .uuid("clientId", Some(client_id))
        .finish()
}

/// POST /api/v1/pix
pub async fn register_key(
    State(state): State<AppState>,
    Json(request): Json<NewKeyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = request.validate()?;

    debug!(
        client_id = %command.client_id,
        key_type = %command.key_type,
        account_type = %command.account_type,
        "Registering pix key"
    );

    let pix_id = state
        .pix_manager
        .register(command)
        .await
        .map_err(|e| e.into_domain("register"))?;

    let location = HeaderValue::from_str(&format!("/api/v1/pix/{}", pix_id)).map_err(|e| {
        DomainError::unexpected(format!("pix id {:?} is not a valid header value: {}", pix_id, e))
    })?;

    info!(pix_id = %pix_id, "Pix key registered");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(PixKeyCreatedResponse { pix_id }),
    ))
}

/// GET /api/v1/clients/{client_id}/pix
pub async fn list_keys(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Json<Vec<PixKeySummaryResponse>>, ApiError> {
    validate_client_id(&client_id)?;

    debug!(client_id = %client_id, "Listing pix keys");

    let keys = state
        .pix_manager
        .list(&client_id)
        .await
        .map_err(|e| e.into_domain("list"))?;

    Ok(Json(keys.iter().map(PixKeySummaryResponse::from).collect()))
}

/// GET /api/v1/clients/{client_id}/pix/{pix_id}
pub async fn get_key_details(
    State(state): State<AppState>,
    Path((client_id, pix_id)): Path<(String, String)>,
) -> Result<Json<PixKeyDetailsResponse>, ApiError> {
    validate_key_reference(&pix_id, &client_id)?;

    debug!(client_id = %client_id, pix_id = %pix_id, "Getting pix key details");

    let details = state
        .pix_manager
        .get_details(&pix_id, &client_id)
        .await
        .map_err(|e| e.into_domain("get_details"))?;

    Ok(Json(PixKeyDetailsResponse::from(&details)))
}

/// DELETE /api/v1/pix/{pix_id}
///
/// `clientId` travels in the JSON body, unlike the details route where it is
/// part of the path.
pub async fn remove_key(
    State(state): State<AppState>,
    Path(pix_id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let request = RemoveKeyRequest::from_body(&body)?;
    let client_id = request.client_id.unwrap_or_default();

    validate_key_reference(&pix_id, &client_id)?;

    debug!(client_id = %client_id, pix_id = %pix_id, "Removing pix key");

    state
        .pix_manager
        .remove(&pix_id, &client_id)
        .await
        .map_err(|e| e.into_domain("remove"))?;

    info!(pix_id = %pix_id, "Pix key removed");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
        response::Response,
        Router,
    };
    use chrono::{TimeZone, Utc};
    use tonic::Status;
    use tower::ServiceExt;

    use crate::api::router::create_router_with_state;
    use crate::api::types::ErrorEnvelope;
    use crate::domain::pix::MockPixKeyManager;
    use crate::domain::{
        AccountDetails, AccountType, KeyType, PixKeyDetails, PixKeyManagerError, PixKeySummary,
    };

    use super::*;

    const PIX_ID: &str = "5260263c-a3c1-4727-ae32-3bdb2538841b";
    const CLIENT_ID: &str = "37e2451c-470b-4043-94f2-f46796cdbfc2";

    fn app(mock: MockPixKeyManager) -> Router {
        create_router_with_state(AppState::new(Arc::new(mock)))
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn envelope(response: Response) -> ErrorEnvelope {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn register_body(key_type: &str, key: &str) -> serde_json::Value {
        serde_json::json!({
            "clientId": "c56dfef4-7901-44fb-84e2-a2cefb157890",
            "keyType": key_type,
            "key": key,
            "accountType": "CHECKING",
        })
    }

    fn rpc_error(status: Status) -> PixKeyManagerError {
        PixKeyManagerError::Rpc(status)
    }

    fn sample_details() -> PixKeyDetails {
        PixKeyDetails {
            pix_id: PIX_ID.to_string(),
            client_id: CLIENT_ID.to_string(),
            key_type: KeyType::Email,
            key: "email@test.com".to_string(),
            account: AccountDetails {
                account_type: AccountType::Checking,
                institution_name: "FAKE".to_string(),
                institution_ispb: "123".to_string(),
                holder_name: "Dr. Mario".to_string(),
                holder_cpf: "11111111111".to_string(),
                agency: "321".to_string(),
                number: "123456".to_string(),
            },
            created_at: Utc.timestamp_opt(1_622_548_800, 13_454_564).unwrap(),
        }
    }

    // Register

    #[tokio::test]
    async fn test_register_rejects_invalid_cpf_before_backend_call() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_register().never();

        let response = app(mock)
            .oneshot(json_request(Method::POST, "/api/v1/pix", register_body("CPF", "123456789")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let envelope = envelope(response).await;
        assert_eq!(envelope.status_code, 400);
        assert_eq!(
            envelope.description,
            "key é obrigatória e formato esperado deve ser um CPF válido."
        );
        assert!(envelope.details.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_client_supplied_random_key() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_register().never();

        let response = app(mock)
            .oneshot(json_request(Method::POST, "/api/v1/pix", register_body("RANDOM", "123456789")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            envelope(response).await.description,
            "Para tipo chave RANDOMICA não deve ser informada uma chave."
        );
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email_and_phone() {
        for (key_type, expected) in [
            ("EMAIL", "key é obrigatória e formato esperado deve ser seu@email.com"),
            ("PHONE", "chave é obrigatória e formato esperado deve ser +5585988714077"),
        ] {
            let mut mock = MockPixKeyManager::new();
            mock.expect_register().never();

            let response = app(mock)
                .oneshot(json_request(Method::POST, "/api/v1/pix", register_body(key_type, "123456789")))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(envelope(response).await.description, expected);
        }
    }

    #[tokio::test]
    async fn test_register_reports_structural_violations() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_register().never();

        let body = serde_json::json!({
            "clientId": "123",
            "keyType": "INVALIDO",
            "key": "armando@teste.com",
        });

        let response = app(mock)
            .oneshot(json_request(Method::POST, "/api/v1/pix", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let envelope = envelope(response).await;
        assert_eq!(
            envelope.description,
            "Alguns campos foram preenchidos indevidamente. Por favor verifique e tente novamente."
        );
        let details: Vec<&str> = envelope.details.iter().map(|d| d.description.as_str()).collect();
        assert_eq!(
            details,
            vec![
                "clientId inválido. não é um formato válido de UUID",
                "keyType inválido. Valores válidos: [CPF, EMAIL, PHONE, RANDOM]",
                "accountType inválido. não deve estar em branco",
            ]
        );
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_json() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_register().never();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/pix")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"clientId\":"))
            .unwrap();

        let response = app(mock).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(envelope(response).await.name, "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_register_backend_rejection() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_register()
            .times(1)
            .returning(|_| Err(rpc_error(Status::internal("Dummy Description"))));

        let response = app(mock)
            .oneshot(json_request(Method::POST, "/api/v1/pix", register_body("EMAIL", "armando@teste.com")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let envelope = envelope(response).await;
        assert_eq!(envelope.description, "Erro ao comunicar o gerenciador de chave Pix");
        assert_eq!(envelope.details[0].description, "Dummy Description");
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_register()
            .withf(|key| {
                key.key_type == KeyType::Email
                    && key.key == "armando@teste.com"
                    && key.account_type == AccountType::Checking
            })
            .times(1)
            .returning(|_| Ok(PIX_ID.to_string()));

        let response = app(mock)
            .oneshot(json_request(Method::POST, "/api/v1/pix", register_body("EMAIL", "armando@teste.com")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        assert!(location.contains(PIX_ID));
        assert_eq!(location, format!("/api/v1/pix/{}", PIX_ID));

        let body = json_body(response).await;
        assert_eq!(body["pixId"], PIX_ID);
    }

    // List

    #[tokio::test]
    async fn test_list_rejects_invalid_client_id() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_list().never();

        let response = app(mock).oneshot(get("/api/v1/clients/123/pix")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let envelope = envelope(response).await;
        assert_eq!(envelope.details.len(), 1);
        assert!(envelope.details[0].description.contains("clientId inválido"));
    }

    #[tokio::test]
    async fn test_list_backend_unavailable() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_list()
            .times(1)
            .returning(|_| Err(rpc_error(Status::unavailable("tcp connect error"))));

        let uri = format!("/api/v1/clients/{}/pix", CLIENT_ID);
        let response = app(mock).oneshot(get(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = envelope(response).await;
        assert_eq!(envelope.description, "Servidor GRPC indisponível");
        assert!(envelope.details.is_empty());
    }

    #[tokio::test]
    async fn test_list_keeps_backend_order() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_list()
            .withf(|client_id| client_id == CLIENT_ID)
            .times(1)
            .returning(|client_id| {
                let created_at = Utc.timestamp_opt(1_622_548_800, 0).unwrap();
                Ok(["b@email.com", "a@email.com"]
                    .iter()
                    .enumerate()
                    .map(|(i, key)| PixKeySummary {
                        pix_id: format!("pix-{}", i),
                        client_id: client_id.to_string(),
                        key_type: KeyType::Email,
                        key: key.to_string(),
                        account_type: AccountType::Savings,
                        created_at,
                    })
                    .collect())
            });

        let uri = format!("/api/v1/clients/{}/pix", CLIENT_ID);
        let response = app(mock).oneshot(get(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body[0]["key"], "b@email.com");
        assert_eq!(body[1]["key"], "a@email.com");
        assert_eq!(body[0]["keyType"], "EMAIL");
        assert_eq!(body[0]["accountType"], "SAVINGS");
        assert_eq!(body[0]["createdAt"], "2021-06-01T12:00:00Z");
    }

    #[tokio::test]
    async fn test_list_empty() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_list().times(1).returning(|_| Ok(vec![]));

        let uri = format!("/api/v1/clients/{}/pix", CLIENT_ID);
        let response = app(mock).oneshot(get(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    // GetDetails

    #[tokio::test]
    async fn test_details_rejects_invalid_identifiers() {
        let cases = [
            (
                format!("/api/v1/clients/{}/pix/123", CLIENT_ID),
                "pixId inválido. não é um formato válido de UUID",
            ),
            (
                format!("/api/v1/clients/b2538841b/pix/{}", PIX_ID),
                "clientId inválido. não é um formato válido de UUID",
            ),
        ];

        for (uri, expected) in cases {
            let mut mock = MockPixKeyManager::new();
            mock.expect_get_details().never();

            let response = app(mock).oneshot(get(&uri)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(envelope(response).await.details[0].description, expected);
        }
    }

    #[tokio::test]
    async fn test_details_not_found() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_get_details()
            .times(1)
            .returning(|_, _| Err(rpc_error(Status::not_found("chave pix não encontrada"))));

        let uri = format!("/api/v1/clients/{}/pix/{}", CLIENT_ID, PIX_ID);
        let response = app(mock).oneshot(get(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let envelope = envelope(response).await;
        assert_eq!(envelope.description, "chave pix não encontrada");
        assert_eq!(envelope.name, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_details_malformed_backend_response_is_unexpected() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_get_details().times(1).returning(|_, _| {
            Err(PixKeyManagerError::malformed("response carried no pix key"))
        });

        let uri = format!("/api/v1/clients/{}/pix/{}", CLIENT_ID, PIX_ID);
        let response = app(mock).oneshot(get(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = envelope(response).await;
        assert_eq!(
            envelope.description,
            "Ooops, erro inesperado. Por favor comunique o desenvolvedor."
        );
        assert!(!serde_json::to_string(&envelope).unwrap().contains("no pix key"));
    }

    #[tokio::test]
    async fn test_details_success() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_get_details()
            .withf(|pix_id, client_id| pix_id == PIX_ID && client_id == CLIENT_ID)
            .times(1)
            .returning(|_, _| Ok(sample_details()));

        let uri = format!("/api/v1/clients/{}/pix/{}", CLIENT_ID, PIX_ID);
        let response = app(mock).oneshot(get(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["keyType"], "EMAIL");
        assert_eq!(body["key"], "email@test.com");
        assert_eq!(body["account"]["accountType"], "CHECKING");
        assert_eq!(body["account"]["institutionName"], "FAKE");
        assert_eq!(body["account"]["holderCpf"], "11111111111");
        assert_eq!(body["createdAt"], "2021-06-01T12:00:00.013454564Z");
        assert!(body.get("pixId").is_none());
        assert!(body.get("clientId").is_none());
    }

    // Remove

    fn remove_request(pix_id: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/v1/pix/{}", pix_id));

        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_remove_requires_client_id_in_body() {
        for body in [None, Some(serde_json::json!({}))] {
            let mut mock = MockPixKeyManager::new();
            mock.expect_remove().never();

            let response = app(mock).oneshot(remove_request(PIX_ID, body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let envelope = envelope(response).await;
            assert_eq!(
                envelope.description,
                "É necessário informar um clientId no corpo da requisição"
            );
            assert!(envelope.details.is_empty());
        }
    }

    #[tokio::test]
    async fn test_remove_rejects_invalid_identifiers() {
        let cases = [
            ("123", CLIENT_ID, "pixId inválido. não é um formato válido de UUID"),
            (PIX_ID, "b2538841b", "clientId inválido. não é um formato válido de UUID"),
        ];

        for (pix_id, client_id, expected) in cases {
            let mut mock = MockPixKeyManager::new();
            mock.expect_remove().never();

            let body = serde_json::json!({ "clientId": client_id });
            let response = app(mock)
                .oneshot(remove_request(pix_id, Some(body)))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(envelope(response).await.details[0].description, expected);
        }
    }

    #[tokio::test]
    async fn test_remove_backend_rejection() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_remove()
            .times(1)
            .returning(|_, _| Err(rpc_error(Status::internal("Dummy Description"))));

        let body = serde_json::json!({ "clientId": CLIENT_ID });
        let response = app(mock)
            .oneshot(remove_request(PIX_ID, Some(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let envelope = envelope(response).await;
        assert_eq!(envelope.description, "Erro ao comunicar o gerenciador de chave Pix");
        assert_eq!(envelope.details[0].description, "Dummy Description");
    }

    #[tokio::test]
    async fn test_remove_backend_unavailable_and_not_found() {
        let cases = [
            (Status::unavailable(""), StatusCode::INTERNAL_SERVER_ERROR, "Servidor GRPC indisponível"),
            (
                Status::not_found("chave pix não encontrada"),
                StatusCode::NOT_FOUND,
                "chave pix não encontrada",
            ),
        ];

        for (status, expected_status, expected_description) in cases {
            let mut mock = MockPixKeyManager::new();
            mock.expect_remove()
                .times(1)
                .return_once(move |_, _| Err(rpc_error(status)));

            let body = serde_json::json!({ "clientId": CLIENT_ID });
            let response = app(mock)
                .oneshot(remove_request(PIX_ID, Some(body)))
                .await
                .unwrap();

            assert_eq!(response.status(), expected_status);
            assert_eq!(envelope(response).await.description, expected_description);
        }
    }

    #[tokio::test]
    async fn test_remove_success() {
        let mut mock = MockPixKeyManager::new();
        mock.expect_remove()
            .withf(|pix_id, client_id| pix_id == PIX_ID && client_id == CLIENT_ID)
            .times(1)
            .returning(|_, _| Ok(()));

        let body = serde_json::json!({ "clientId": CLIENT_ID });
        let response = app(mock)
            .oneshot(remove_request(PIX_ID, Some(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }
}
