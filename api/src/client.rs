use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::subscan::{is_network_label, search_url, SubscanEnvelope, UpstreamSearchBody, API_KEY_HEADER};

/// Client for the upstream Subscan search API
#[derive(Clone)]
pub struct SubscanClient {
    http_client: Client,
    base_url_template: String,
    api_key: Option<String>,
}

impl SubscanClient {
    pub fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ProxyError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            base_url_template: config.base_url_template.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Searches `address` on `network`; `Ok` only for application code 0,
    /// carrying the upstream body untouched
    #[instrument(skip(self), err)]
    pub async fn search(&self, network: &str, address: &str) -> Result<Value, ProxyError> {
        // The API key must never travel to a host outside the template
        if !is_network_label(network) {
            return Err(ProxyError::InvalidNetwork {
                network: network.to_string(),
            });
        }

        let url = search_url(&self.base_url_template, network);
        debug!("Forwarding search to {}", url);

        let mut request = self
            .http_client
            .post(&url)
            .json(&UpstreamSearchBody { key: address });

        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = request.send().await.map_err(|e| ProxyError::Transport {
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Subscan answered HTTP {} for {}", status.as_u16(), network);
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await.map_err(|e| ProxyError::Decode {
            message: e.to_string(),
        })?;

        let envelope: SubscanEnvelope =
            serde_json::from_value(body.clone()).map_err(|e| ProxyError::Decode {
                message: e.to_string(),
            })?;

        if envelope.code != 0 {
            return Err(ProxyError::application(envelope.code, &envelope.message));
        }

        Ok(body)
    }
}
