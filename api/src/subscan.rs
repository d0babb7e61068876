//! Subscan search wire types

use serde::{Deserialize, Serialize};

use crate::error::ProxyError;

/// Route the proxy serves and the browser calls
pub const PROXY_ROUTE: &str = "/api/subscan/search";

/// Upstream search endpoint, appended to the network base URL
pub const SEARCH_PATH: &str = "/api/v2/scan/search";

/// Upstream base URL; `{network}` is replaced with the request's network
pub const DEFAULT_BASE_URL_TEMPLATE: &str = "https://{network}.api.subscan.io";

/// Header carrying the optional Subscan API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Body accepted by the proxy route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl SearchRequest {
    pub fn new(network: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            network: Some(network.into()),
            address: Some(address.into()),
        }
    }

    /// Returns `(network, address)` when both are present and non-blank and
    /// the network is a single DNS label
    pub fn validated(&self) -> Result<(&str, &str), ProxyError> {
        let network = self.network.as_deref().map(str::trim).unwrap_or_default();
        let address = self.address.as_deref().map(str::trim).unwrap_or_default();

        if network.is_empty() || address.is_empty() {
            return Err(ProxyError::MissingField);
        }
        if !is_network_label(network) {
            return Err(ProxyError::InvalidNetwork {
                network: network.to_string(),
            });
        }

        Ok((network, address))
    }
}

/// Body sent upstream
#[derive(Debug, Serialize)]
pub struct UpstreamSearchBody<'a> {
    pub key: &'a str,
}

/// Envelope shared by every Subscan response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscanEnvelope {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub generated_at: Option<i64>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Typed view of the `data` member of a successful search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub account: Option<AccountSummary>,
}

/// Account fields the assistant reads; amounts are decimal token strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub address: String,
    #[serde(default)]
    pub balance: String,
    #[serde(default)]
    pub balance_lock: String,
    #[serde(default)]
    pub reserved: String,
    #[serde(default)]
    pub nonce: u64,
}

/// Subscan application codes the proxy distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscanCode {
    Success,
    InvalidParams(i64),
    RateLimited,
    NotFound,
    Other(i64),
}

impl SubscanCode {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => SubscanCode::Success,
            10001 | 10002 => SubscanCode::InvalidParams(code),
            10003 => SubscanCode::RateLimited,
            10004 => SubscanCode::NotFound,
            other => SubscanCode::Other(other),
        }
    }

    /// HTTP status the proxy answers with for this code
    pub fn http_status(&self) -> u16 {
        match self {
            SubscanCode::Success => 200,
            SubscanCode::InvalidParams(_) => 400,
            SubscanCode::RateLimited => 429,
            SubscanCode::NotFound => 404,
            SubscanCode::Other(_) => 500,
        }
    }

    /// Message used when upstream sends an empty one
    pub fn default_message(&self) -> &'static str {
        match self {
            SubscanCode::Success => "Success",
            SubscanCode::InvalidParams(_) => "Invalid request parameters",
            SubscanCode::RateLimited => "Rate limit exceeded",
            SubscanCode::NotFound => "Record not found",
            SubscanCode::Other(_) => "Subscan API error",
        }
    }
}

/// Networks become a host label upstream: `[a-z0-9-]+`, no leading or
/// trailing hyphen, at most 63 characters
pub fn is_network_label(network: &str) -> bool {
    !network.is_empty()
        && network.len() <= 63
        && !network.starts_with('-')
        && !network.ends_with('-')
        && network
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Full upstream URL for a network
pub fn search_url(base_url_template: &str, network: &str) -> String {
    format!(
        "{}{}",
        base_url_template.replace("{network}", network),
        SEARCH_PATH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_table() {
        assert_eq!(SubscanCode::from_code(0).http_status(), 200);
        assert_eq!(SubscanCode::from_code(10004).http_status(), 404);
        assert_eq!(SubscanCode::from_code(10001).http_status(), 400);
        assert_eq!(SubscanCode::from_code(10002).http_status(), 400);
        assert_eq!(SubscanCode::from_code(10003).http_status(), 429);

        for code in [1, -1, 10000, 10005, 20001] {
            assert_eq!(SubscanCode::from_code(code).http_status(), 500, "code {}", code);
        }
    }

    #[test]
    fn test_validation_rejects_missing_and_blank_fields() {
        let cases = [
            SearchRequest::default(),
            SearchRequest {
                network: Some("polkadot".to_string()),
                address: None,
            },
            SearchRequest {
                network: None,
                address: Some("ABC".to_string()),
            },
            SearchRequest::new("  ", "ABC"),
            SearchRequest::new("polkadot", ""),
        ];

        for request in cases {
            assert!(
                matches!(request.validated(), Err(ProxyError::MissingField)),
                "{:?}",
                request
            );
        }

        let request = SearchRequest::new("polkadot", " ABC ");
        assert_eq!(request.validated().unwrap(), ("polkadot", "ABC"));
    }

    #[test]
    fn test_network_must_be_a_host_label() {
        for network in ["polkadot", "asset-hub-polkadot", "acala2"] {
            assert!(is_network_label(network), "{}", network);
        }
        for network in ["evil.example/#", "evil.example", "a/b", "Polkadot", "-x", "x-", "a b", "x@y"] {
            let request = SearchRequest::new(network, "ABC");
            assert!(
                matches!(request.validated(), Err(ProxyError::InvalidNetwork { .. })),
                "{}",
                network
            );
        }
    }

    #[test]
    fn test_search_url() {
        assert_eq!(
            search_url(DEFAULT_BASE_URL_TEMPLATE, "kusama"),
            "https://kusama.api.subscan.io/api/v2/scan/search"
        );
        assert_eq!(
            search_url("http://127.0.0.1:9000/{network}", "polkadot"),
            "http://127.0.0.1:9000/polkadot/api/v2/scan/search"
        );
    }

    #[test]
    fn test_search_data_tolerates_sparse_account() {
        let data: SearchData = serde_json::from_value(serde_json::json!({
            "account": { "address": "15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5", "balance": "1.5" }
        }))
        .unwrap();

        let account = data.account.unwrap();
        assert_eq!(account.balance, "1.5");
        assert_eq!(account.reserved, "");
        assert_eq!(account.nonce, 0);
    }
}
