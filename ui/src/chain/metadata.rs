//! Metadata proofs for the generic Polkadot app. The device needs the
//! parts of the runtime metadata a transaction touches to decode it.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use super::scale::{from_hex, to_hex};
use crate::services::errors::{MigrationError, MigrationResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProofRequest {
    chain: serde_json::Value,
    tx_blob: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProofResponse {
    tx_metadata: String,
}

#[derive(Clone)]
pub struct MetadataProofClient {
    http_client: Client,
    url: String,
}

impl MetadataProofClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            url: url.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.url.is_empty()
    }

    /// Proof for `payload` on the chain `chain_id`
    #[instrument(skip(self, payload), fields(len = payload.len()), err)]
    pub async fn fetch(&self, chain_id: &str, payload: &[u8]) -> MigrationResult<Vec<u8>> {
        let request = ProofRequest {
            chain: json!({ "id": chain_id }),
            tx_blob: to_hex(payload),
        };
        let response = self.http_client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(MigrationError::MigrationStep {
                step: "metadata".to_string(),
                reason: format!("proof service answered {}: {}", status.as_u16(), text),
            });
        }
        parse_proof(&text)
    }
}

fn parse_proof(text: &str) -> MigrationResult<Vec<u8>> {
    let body: ProofResponse = serde_json::from_str(text)?;
    from_hex(&body.tx_metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_proof() {
        assert_eq!(parse_proof(r#"{"txMetadata":"0x0a0b0c"}"#).unwrap(), vec![0x0a, 0x0b, 0x0c]);
        assert!(parse_proof(r#"{"error":"unknown chain"}"#).is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let request = ProofRequest {
            chain: json!({ "id": "kusama" }),
            tx_blob: to_hex(&[1, 2]),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["chain"]["id"], "kusama");
        assert_eq!(body["txBlob"], "0x0102");
    }
}
