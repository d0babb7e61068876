//! Proxy configuration loaded from the environment

use std::net::SocketAddr;

use crate::subscan::DEFAULT_BASE_URL_TEMPLATE;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub bind_addr: SocketAddr,
    /// Forwarded upstream as `X-API-Key` when set
    pub api_key: Option<String>,
    /// Upstream base URL with a `{network}` placeholder
    pub base_url_template: String,
    pub user_agent: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8787))),
            api_key: None,
            base_url_template: DEFAULT_BASE_URL_TEMPLATE.to_string(),
            user_agent: "ledger-migration-assistant-proxy/0.1".to_string(),
        }
    }
}

impl ProxyConfig {
    /// Reads `SUBSCAN_PROXY_ADDR`, `SUBSCAN_API_KEY` and `SUBSCAN_BASE_URL_TEMPLATE`
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("SUBSCAN_PROXY_ADDR") {
            config.bind_addr = addr
                .parse()
                .map_err(|e| format!("SUBSCAN_PROXY_ADDR = {}: {}", addr, e))?;
        }

        // An empty key is treated as unset
        config.api_key = lookup("SUBSCAN_API_KEY").filter(|key| !key.trim().is_empty());

        if let Some(template) = lookup("SUBSCAN_BASE_URL_TEMPLATE") {
            config.base_url_template = template.trim_end_matches('/').to_string();
        }

        Ok(config)
    }
}
