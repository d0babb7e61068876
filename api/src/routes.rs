use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::client::SubscanClient;
use crate::error::ProxyError;
use crate::subscan::{SearchRequest, PROXY_ROUTE};

#[derive(Clone)]
pub struct ProxyState {
    client: Arc<SubscanClient>,
}

impl ProxyState {
    pub fn new(client: SubscanClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

/// Router serving `POST /api/subscan/search`
pub fn router(state: ProxyState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route(PROXY_ROUTE, post(search))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn search(State(state): State<ProxyState>, body: Bytes) -> Result<Json<Value>, ProxyError> {
    // Malformed JSON is reported like a missing field
    let request: SearchRequest = serde_json::from_slice(&body).unwrap_or_default();
    let (network, address) = request.validated()?;

    match state.client.search(network, address).await {
        Ok(value) => {
            info!("Search on {} succeeded", network);
            Ok(Json(value))
        }
        Err(error) => {
            warn!("Search on {} failed: {}", network, error);
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use crate::error::ErrorBody;
    use axum::{
        body::Body,
        extract::Path,
        http::{HeaderMap, Request, StatusCode},
        response::{IntoResponse, Response},
    };
    use serde_json::json;
    use tower::ServiceExt;

    /// Upstream stand-in: the search key picks the scripted answer
    async fn mock_subscan(
        Path(network): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Response {
        let key = body["key"].as_str().unwrap_or_default().to_string();
        let api_key = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match key.as_str() {
            "missing" => Json(json!({"code": 10004, "message": "Record Not Found", "generated_at": 0}))
                .into_response(),
            "bad" => Json(json!({"code": 10001, "message": "bad", "generated_at": 0})).into_response(),
            "badly" => Json(json!({"code": 10002, "message": "", "generated_at": 0})).into_response(),
            "limit" => Json(json!({"code": 10003, "message": "slow down", "generated_at": 0}))
                .into_response(),
            "weird" => Json(json!({"code": 12345, "message": "weird", "generated_at": 0}))
                .into_response(),
            "down" => (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response(),
            "garbage" => (StatusCode::OK, "not json").into_response(),
            _ => Json(json!({
                "code": 0,
                "message": "Success",
                "generated_at": 1700000000,
                "data": {
                    "network": network,
                    "api_key": api_key,
                    "account": { "address": key, "balance": "12.5" }
                }
            }))
            .into_response(),
        }
    }

    async fn spawn_upstream() -> String {
        let app = Router::new().route("/:network/api/v2/scan/search", post(mock_subscan));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/{{network}}", addr)
    }

    async fn proxy(api_key: Option<&str>) -> Router {
        let config = ProxyConfig {
            base_url_template: spawn_upstream().await,
            api_key: api_key.map(str::to_string),
            ..ProxyConfig::default()
        };
        router(ProxyState::new(SubscanClient::new(&config).unwrap()))
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(PROXY_ROUTE)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected_with_400() {
        let app = proxy(None).await;

        for body in [
            r#"{}"#,
            r#"{"network":"polkadot"}"#,
            r#"{"address":"ABC"}"#,
            r#"{"network":"","address":"ABC"}"#,
            r#"not json"#,
        ] {
            let (status, value) = post_json(app.clone(), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
            assert!(value["error"].is_string(), "body {}", body);
        }
    }

    #[tokio::test]
    async fn test_network_outside_subscan_is_rejected() {
        let app = proxy(Some("secret")).await;

        for network in ["evil.example/#", "evil.example:80", "../polkadot"] {
            let body = json!({"network": network, "address": "ABC"}).to_string();
            let (status, value) = post_json(app.clone(), &body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "network {}", network);
            assert!(value["error"].as_str().unwrap().contains("Invalid network"));
            assert!(value.get("data").is_none());
        }
    }

    #[tokio::test]
    async fn test_application_codes_map_to_statuses() {
        let app = proxy(None).await;

        let cases = [
            ("missing", StatusCode::NOT_FOUND),
            ("bad", StatusCode::BAD_REQUEST),
            ("badly", StatusCode::BAD_REQUEST),
            ("limit", StatusCode::TOO_MANY_REQUESTS),
            ("weird", StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (key, expected) in cases {
            let body = json!({"network": "polkadot", "address": key}).to_string();
            let (status, value) = post_json(app.clone(), &body).await;
            assert_eq!(status, expected, "key {}", key);
            assert!(value["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_upstream_message_becomes_error_body() {
        let app = proxy(None).await;
        let (status, value) =
            post_json(app, r#"{"network":"polkadot","address":"bad"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: ErrorBody = serde_json::from_value(value).unwrap();
        assert_eq!(body.error, "bad");
    }

    #[tokio::test]
    async fn test_success_is_passed_through_verbatim() {
        let app = proxy(Some("secret")).await;
        let (status, value) =
            post_json(app, r#"{"network":"kusama","address":"HNZata7iMYWmk5RvZRTiAsSDhV8366zq2YGb3tLH5Upf74F"}"#)
                .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["code"], 0);
        assert_eq!(value["generated_at"], 1700000000);
        assert_eq!(value["data"]["network"], "kusama");
        assert_eq!(value["data"]["api_key"], "secret");
        assert_eq!(value["data"]["account"]["balance"], "12.5");
    }

    #[tokio::test]
    async fn test_api_key_header_is_omitted_when_unset() {
        let app = proxy(None).await;
        let (status, value) = post_json(app, r#"{"network":"polkadot","address":"ABC"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert!(value["data"]["api_key"].is_null());
    }

    #[tokio::test]
    async fn test_upstream_http_failure_is_reported_with_its_status() {
        let app = proxy(None).await;
        let (status, value) = post_json(app, r#"{"network":"polkadot","address":"down"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = value["error"].as_str().unwrap();
        assert!(message.contains("503"));
        assert!(message.contains("maintenance"));
    }

    #[tokio::test]
    async fn test_unparsable_upstream_body_is_internal_error() {
        let app = proxy(None).await;
        let (status, value) =
            post_json(app, r#"{"network":"polkadot","address":"garbage"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(value["error"].is_string());
    }
}
