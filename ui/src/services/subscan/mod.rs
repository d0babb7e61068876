//! Browser-side client for the Subscan proxy route

use api::{ErrorBody, SearchData, SearchRequest, SubscanEnvelope, PROXY_ROUTE};
use reqwest::{Client, StatusCode};
use tracing::instrument;

use crate::services::errors::{MigrationError, MigrationResult};

#[derive(Clone)]
pub struct SubscanProxyClient {
    http_client: Client,
    base_url: String,
}

impl SubscanProxyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn route_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), PROXY_ROUTE)
    }

    /// Looks up `address` on `network`. Addresses Subscan has never seen
    /// (404) come back as empty search data.
    #[instrument(skip(self), err)]
    pub async fn search(&self, network: &str, address: &str) -> MigrationResult<SearchData> {
        let response = self
            .http_client
            .post(self.route_url())
            .json(&SearchRequest::new(network, address))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        interpret_response(status, &text)
    }
}

fn interpret_response(status: StatusCode, text: &str) -> MigrationResult<SearchData> {
    if status == StatusCode::NOT_FOUND {
        return Ok(SearchData::default());
    }

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(text)
            .map(|body| body.error)
            .unwrap_or_else(|_| text.to_string());
        return Err(MigrationError::Subscan {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: SubscanEnvelope = serde_json::from_str(text)?;
    match envelope.data {
        Some(data) => Ok(serde_json::from_value(data)?),
        None => Ok(SearchData::default()),
    }
}
