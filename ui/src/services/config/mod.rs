use serde::{Deserialize, Serialize};

use crate::console_warn;

/// Coin type of the universal Polkadot app; migrated funds land on this path
pub const UNIVERSAL_SLIP44: u32 = 354;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub chains: Vec<ChainConfig>,
    pub derivation: DerivationConfig,
    pub migration: MigrationRunConfig,
    pub endpoints: EndpointConfig,
}

/// One legacy Ledger app and the chain it signs for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub id: String,
    pub name: String,
    pub ticker: String,
    pub decimals: u8,
    /// BIP44 coin type used by the legacy app
    pub slip44: u32,
    pub ss58_prefix: u16,
    pub subscan_network: String,
    /// HTTP JSON-RPC endpoint
    pub rpc_url: String,
    pub balances_pallet_index: u8,
    pub transfer_all_call_index: u8,
    /// Runtime carries the `CheckMetadataHash` signed extension
    pub metadata_hash_extension: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationConfig {
    /// Account indices scanned per app
    pub accounts_per_app: u32,
    /// Keep accounts without balance in the synchronized list
    pub keep_empty_accounts: bool,
    pub universal_slip44: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRunConfig {
    /// Blocks to wait for inclusion before reporting a warning
    pub inclusion_timeout_blocks: u32,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the Subscan proxy; empty means the page origin
    pub proxy_base_url: String,
    /// Path under which `{app_id}.svg` icons are served
    pub icon_base_path: String,
    /// Service that returns the metadata proof the device parses the
    /// transaction with; empty disables it
    #[serde(default)]
    pub metadata_proof_url: String,
}

impl ChainConfig {
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: &str,
        name: &str,
        ticker: &str,
        decimals: u8,
        slip44: u32,
        ss58_prefix: u16,
        rpc_url: &str,
        balances_pallet_index: u8,
        metadata_hash_extension: bool,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ticker: ticker.to_string(),
            decimals,
            slip44,
            ss58_prefix,
            subscan_network: id.to_string(),
            rpc_url: rpc_url.to_string(),
            balances_pallet_index,
            transfer_all_call_index: 4,
            metadata_hash_extension,
        }
    }
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            accounts_per_app: 5,
            keep_empty_accounts: false,
            universal_slip44: UNIVERSAL_SLIP44,
        }
    }
}

impl Default for MigrationRunConfig {
    fn default() -> Self {
        Self {
            inclusion_timeout_blocks: 10,
            poll_interval_ms: 3000, // roughly half a block
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            proxy_base_url: String::new(),
            icon_base_path: "/assets/icons".to_string(),
            metadata_proof_url: "https://api.zondax.ch/polkadot/transaction/metadata".to_string(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AssistantConfig {
    pub fn new() -> Self {
        Self {
            chains: vec![
                ChainConfig::new(
                    "kusama",
                    "Kusama",
                    "KSM",
                    12,
                    434,
                    2,
                    "https://kusama-rpc.polkadot.io",
                    4,
                    true,
                ),
                ChainConfig::new(
                    "acala",
                    "Acala",
                    "ACA",
                    12,
                    787,
                    10,
                    "https://acala-rpc-0.aca-api.network",
                    10,
                    false,
                ),
                ChainConfig::new(
                    "karura",
                    "Karura",
                    "KAR",
                    12,
                    686,
                    8,
                    "https://karura-rpc-0.aca-api.network",
                    10,
                    false,
                ),
                ChainConfig::new(
                    "astar",
                    "Astar",
                    "ASTR",
                    18,
                    810,
                    5,
                    "https://rpc.astar.network",
                    31,
                    false,
                ),
            ],
            derivation: DerivationConfig::default(),
            migration: MigrationRunConfig::default(),
            endpoints: EndpointConfig::default(),
        }
    }

    pub fn chain(&self, id: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|chain| chain.id == id)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.chains.is_empty() {
            return Err("at least one chain must be configured".to_string());
        }

        for (index, chain) in self.chains.iter().enumerate() {
            if self.chains[..index].iter().any(|other| other.id == chain.id) {
                return Err(format!("duplicate chain id {}", chain.id));
            }
            if chain.decimals > 38 {
                return Err(format!("{} decimals must be at most 38", chain.id));
            }
            if chain.slip44 == self.derivation.universal_slip44 {
                return Err(format!(
                    "{} already uses the universal coin type {}",
                    chain.id, chain.slip44
                ));
            }
        }

        if self.derivation.accounts_per_app == 0 {
            return Err("accounts_per_app must be greater than 0".to_string());
        }

        if self.migration.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Proxy base URL, falling back to the page origin
    pub fn proxy_base_url(&self) -> String {
        if !self.endpoints.proxy_base_url.is_empty() {
            return self.endpoints.proxy_base_url.trim_end_matches('/').to_string();
        }
        crate::utils::page_origin().unwrap_or_else(|| "http://127.0.0.1:8787".to_string())
    }
}

use std::sync::OnceLock;

static GLOBAL_CONFIG: OnceLock<AssistantConfig> = OnceLock::new();

/// Get the global configuration, initialized with defaults
pub fn get_global_config() -> AssistantConfig {
    GLOBAL_CONFIG
        .get_or_init(|| {
            let config = AssistantConfig::new();
            if let Err(e) = config.validate() {
                console_warn!("Invalid configuration: {}", e);
            }
            config
        })
        .clone()
}
