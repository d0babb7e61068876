use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::instrument;

use super::extrinsic::Hash;
use super::scale::{from_hex, to_hex};
use crate::services::errors::{MigrationError, MigrationResult};

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersion {
    pub spec_version: u32,
    pub transaction_version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub parent_hash: String,
    /// Hex-encoded block number
    pub number: String,
}

impl Header {
    pub fn block_number(&self) -> MigrationResult<u64> {
        let digits = self.number.strip_prefix("0x").unwrap_or(&self.number);
        u64::from_str_radix(digits, 16).map_err(|e| MigrationError::Encoding {
            message: format!("block number '{}': {}", self.number, e),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Block {
    pub header: Header,
    /// Hex-encoded extrinsics
    pub extrinsics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignedBlock {
    pub block: Block,
}

/// JSON-RPC over HTTP against one node
#[derive(Clone)]
pub struct RpcClient {
    http_client: Client,
    url: String,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> MigrationResult<T> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self
            .http_client
            .post(&self.url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MigrationError::Rpc {
                method: method.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let text = response.text().await?;
        decode_response(method, &text)
    }

    #[instrument(skip(self), err)]
    pub async fn account_next_index(&self, address: &str) -> MigrationResult<u64> {
        self.call("system_accountNextIndex", json!([address])).await
    }

    #[instrument(skip(self), err)]
    pub async fn runtime_version(&self) -> MigrationResult<RuntimeVersion> {
        self.call("state_getRuntimeVersion", json!([])).await
    }

    pub async fn block_hash(&self, number: u64) -> MigrationResult<Option<Hash>> {
        let hash: Option<String> = self.call("chain_getBlockHash", json!([number])).await?;
        hash.map(|h| parse_hash(&h)).transpose()
    }

    #[instrument(skip(self), err)]
    pub async fn genesis_hash(&self) -> MigrationResult<Hash> {
        self.block_hash(0).await?.ok_or_else(|| MigrationError::Rpc {
            method: "chain_getBlockHash".to_string(),
            message: "node returned no genesis hash".to_string(),
        })
    }

    #[instrument(skip(self, extrinsic), fields(len = extrinsic.len()), err)]
    pub async fn submit_extrinsic(&self, extrinsic: &[u8]) -> MigrationResult<Hash> {
        let hash: String = self
            .call("author_submitExtrinsic", json!([to_hex(extrinsic)]))
            .await?;
        parse_hash(&hash)
    }

    pub async fn latest_header(&self) -> MigrationResult<Header> {
        self.call("chain_getHeader", json!([])).await
    }

    pub async fn header_at(&self, hash: &Hash) -> MigrationResult<Option<Header>> {
        self.call("chain_getHeader", json!([to_hex(hash)])).await
    }

    /// Raw storage value under `key` as of block `at`
    pub async fn storage(&self, key: &[u8], at: &Hash) -> MigrationResult<Option<Vec<u8>>> {
        let value: Option<String> = self
            .call("state_getStorage", json!([to_hex(key), to_hex(at)]))
            .await?;
        value.map(|v| from_hex(&v)).transpose()
    }

    pub async fn block(&self, hash: &Hash) -> MigrationResult<Option<SignedBlock>> {
        self.call("chain_getBlock", json!([to_hex(hash)])).await
    }
}

fn decode_response<T: DeserializeOwned>(method: &str, text: &str) -> MigrationResult<T> {
    let response: RpcResponse<T> = serde_json::from_str(text).map_err(|e| MigrationError::Rpc {
        method: method.to_string(),
        message: format!("invalid response: {}", e),
    })?;

    if let Some(error) = response.error {
        return Err(MigrationError::Rpc {
            method: method.to_string(),
            message: format!("{} (code {})", error.message, error.code),
        });
    }

    // `Option<T>` results legitimately come back as null
    match response.result {
        Some(result) => Ok(result),
        None => serde_json::from_value(Value::Null).map_err(|_| MigrationError::Rpc {
            method: method.to_string(),
            message: "missing result".to_string(),
        }),
    }
}

pub fn parse_hash(value: &str) -> MigrationResult<Hash> {
    let bytes = from_hex(value)?;
    bytes.try_into().map_err(|bytes: Vec<u8>| MigrationError::Encoding {
        message: format!("expected 32-byte hash, got {} bytes", bytes.len()),
    })
}
