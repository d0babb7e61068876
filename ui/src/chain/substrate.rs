use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use api::AccountSummary;
use async_trait::async_trait;

use super::account::{system_account_key, transfer_all_dispatched, AccountInfo};
use super::extrinsic::{extrinsic_hash, AccountId, Hash, SigningContext, TransferAllCall, UnsignedExtrinsic};
use super::metadata::MetadataProofClient;
use super::rpc::{parse_hash, RpcClient};
use super::scale::to_hex;
use super::ss58;
use super::watcher::{watch_inclusion, Inclusion, WatchOptions};
use crate::migration::types::AccountBalance;
use crate::services::config::{AssistantConfig, ChainConfig};
use crate::services::errors::{MigrationError, MigrationResult};
use crate::services::subscan::SubscanProxyClient;
use crate::{console_debug, console_info};

/// A transfer-all built and waiting for the device signature
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMigration {
    pub chain_id: String,
    pub signer: AccountId,
    pub unsigned: UnsignedExtrinsic,
    /// Metadata proof streamed to the device after the payload; empty
    /// when no proof service is configured
    pub metadata_proof: Vec<u8>,
}

impl PreparedMigration {
    pub fn signing_payload(&self) -> Vec<u8> {
        self.unsigned.signing_payload()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedMigration {
    pub tx_hash: Hash,
    /// Chain head when the extrinsic went out
    pub submitted_at: u64,
}

impl SubmittedMigration {
    pub fn tx_hash_hex(&self) -> String {
        to_hex(&self.tx_hash)
    }
}

/// Chain access the store relies on
#[async_trait(?Send)]
pub trait ChainApi {
    async fn fetch_balance(&self, chain: &ChainConfig, address: &str) -> MigrationResult<AccountBalance>;

    async fn prepare_migration(
        &self,
        chain: &ChainConfig,
        from: &str,
        to: &str,
    ) -> MigrationResult<PreparedMigration>;

    async fn submit_migration(
        &self,
        chain: &ChainConfig,
        prepared: PreparedMigration,
        signature: &[u8],
    ) -> MigrationResult<SubmittedMigration>;

    async fn wait_for_inclusion(
        &self,
        chain: &ChainConfig,
        submitted: &SubmittedMigration,
    ) -> MigrationResult<Inclusion>;

    /// Whether the included transfer-all actually moved the funds of
    /// `signer`; inclusion alone says nothing about the dispatch result.
    async fn confirm_dispatch(
        &self,
        chain: &ChainConfig,
        signer: &AccountId,
        block_hash: &Hash,
    ) -> MigrationResult<bool>;
}

/// Balances from the Subscan proxy, everything else from the node RPC
pub struct SubstrateChainApi {
    subscan: SubscanProxyClient,
    metadata: MetadataProofClient,
    watch: WatchOptions,
    rpc_clients: RefCell<HashMap<String, RpcClient>>,
}

impl SubstrateChainApi {
    pub fn new(subscan: SubscanProxyClient, metadata: MetadataProofClient, watch: WatchOptions) -> Self {
        Self {
            subscan,
            metadata,
            watch,
            rpc_clients: RefCell::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(
            SubscanProxyClient::new(config.proxy_base_url()),
            MetadataProofClient::new(config.endpoints.metadata_proof_url.clone()),
            WatchOptions {
                timeout_blocks: config.migration.inclusion_timeout_blocks,
                poll_interval: Duration::from_millis(config.migration.poll_interval_ms),
            },
        )
    }

    fn rpc(&self, chain: &ChainConfig) -> RpcClient {
        self.rpc_clients
            .borrow_mut()
            .entry(chain.id.clone())
            .or_insert_with(|| RpcClient::new(&chain.rpc_url))
            .clone()
    }
}

pub fn balance_from_summary(summary: Option<&AccountSummary>, decimals: u8) -> AccountBalance {
    match summary {
        Some(account) => AccountBalance {
            free: account.balance.clone(),
            reserved: account.reserved.clone(),
            locked: account.balance_lock.clone(),
            decimals,
        },
        None => AccountBalance::zero(decimals),
    }
}

pub fn transfer_all_call(chain: &ChainConfig, dest: AccountId) -> TransferAllCall {
    TransferAllCall {
        pallet_index: chain.balances_pallet_index,
        call_index: chain.transfer_all_call_index,
        dest,
        keep_alive: false,
    }
}

#[async_trait(?Send)]
impl ChainApi for SubstrateChainApi {
    async fn fetch_balance(&self, chain: &ChainConfig, address: &str) -> MigrationResult<AccountBalance> {
        let data = self.subscan.search(&chain.subscan_network, address).await?;
        Ok(balance_from_summary(data.account.as_ref(), chain.decimals))
    }

    async fn prepare_migration(
        &self,
        chain: &ChainConfig,
        from: &str,
        to: &str,
    ) -> MigrationResult<PreparedMigration> {
        let (_, signer) = ss58::decode(from)?;
        let (_, dest) = ss58::decode(to)?;
        let rpc = self.rpc(chain);

        let nonce = rpc.account_next_index(from).await?;
        let version = rpc.runtime_version().await?;
        let genesis_hash = rpc.genesis_hash().await?;

        console_debug!(
            "[Chain] {} nonce={} spec={} tx={}",
            chain.id,
            nonce,
            version.spec_version,
            version.transaction_version
        );

        let context = SigningContext {
            nonce,
            tip: 0,
            spec_version: version.spec_version,
            transaction_version: version.transaction_version,
            genesis_hash,
            metadata_hash_extension: chain.metadata_hash_extension,
        };

        let unsigned = UnsignedExtrinsic::new(transfer_all_call(chain, dest).encode(), context);
        let metadata_proof = if self.metadata.is_enabled() {
            self.metadata.fetch(&chain.id, &unsigned.signing_payload()).await?
        } else {
            Vec::new()
        };

        Ok(PreparedMigration {
            chain_id: chain.id.clone(),
            signer,
            unsigned,
            metadata_proof,
        })
    }

    async fn submit_migration(
        &self,
        chain: &ChainConfig,
        prepared: PreparedMigration,
        signature: &[u8],
    ) -> MigrationResult<SubmittedMigration> {
        if prepared.chain_id != chain.id {
            return Err(MigrationError::MigrationStep {
                step: "submit".to_string(),
                reason: format!("prepared for {} but submitted to {}", prepared.chain_id, chain.id),
            });
        }

        let signer = prepared.signer;
        let extrinsic = prepared.unsigned.into_signed(&signer, signature)?;
        let rpc = self.rpc(chain);

        let submitted_at = rpc.latest_header().await?.block_number()?;
        let tx_hash = rpc.submit_extrinsic(&extrinsic).await?;

        if tx_hash != extrinsic_hash(&extrinsic) {
            console_debug!("[Chain] Node returned a different extrinsic hash than computed locally");
        }
        console_info!("[Chain] Submitted {} on {} at #{}", to_hex(&tx_hash), chain.id, submitted_at);

        Ok(SubmittedMigration { tx_hash, submitted_at })
    }

    async fn wait_for_inclusion(
        &self,
        chain: &ChainConfig,
        submitted: &SubmittedMigration,
    ) -> MigrationResult<Inclusion> {
        let rpc = self.rpc(chain);
        watch_inclusion(&rpc, &submitted.tx_hash, submitted.submitted_at, self.watch).await
    }

    async fn confirm_dispatch(
        &self,
        chain: &ChainConfig,
        signer: &AccountId,
        block_hash: &Hash,
    ) -> MigrationResult<bool> {
        let rpc = self.rpc(chain);
        let header = rpc.header_at(block_hash).await?.ok_or_else(|| MigrationError::Rpc {
            method: "chain_getHeader".to_string(),
            message: format!("unknown block {}", to_hex(block_hash)),
        })?;
        let parent_hash = parse_hash(&header.parent_hash)?;

        let key = system_account_key(signer);
        let before = rpc.storage(&key, &parent_hash).await?;
        let after = rpc.storage(&key, block_hash).await?;
        let before = before.as_deref().map(AccountInfo::decode).transpose()?;
        let after = after.as_deref().map(AccountInfo::decode).transpose()?;

        let dispatched = transfer_all_dispatched(before.as_ref(), after.as_ref());
        console_debug!(
            "[Chain] {} dispatch in {}: {} (transferable {:?} -> {:?})",
            chain.id,
            to_hex(block_hash),
            dispatched,
            before.map(|info| info.transferable()),
            after.map(|info| info.transferable())
        );
        Ok(dispatched)
    }
}
