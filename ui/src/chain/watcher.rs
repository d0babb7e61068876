//! Follows new blocks until a submitted extrinsic shows up

use std::time::Duration;

use async_trait::async_trait;

use super::extrinsic::{extrinsic_hash, Hash};
use super::rpc::{Header, RpcClient, SignedBlock};
use super::scale::from_hex;
use crate::console_debug;
use crate::services::errors::MigrationResult;
use crate::utils::platform::sleep;

#[async_trait(?Send)]
pub trait BlockSource {
    async fn latest_header(&self) -> MigrationResult<Header>;
    async fn block_hash(&self, number: u64) -> MigrationResult<Option<Hash>>;
    async fn block(&self, hash: &Hash) -> MigrationResult<Option<SignedBlock>>;
}

#[async_trait(?Send)]
impl BlockSource for RpcClient {
    async fn latest_header(&self) -> MigrationResult<Header> {
        RpcClient::latest_header(self).await
    }

    async fn block_hash(&self, number: u64) -> MigrationResult<Option<Hash>> {
        RpcClient::block_hash(self, number).await
    }

    async fn block(&self, hash: &Hash) -> MigrationResult<Option<SignedBlock>> {
        RpcClient::block(self, hash).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inclusion {
    InBlock { block_hash: Hash, block_number: u64 },
    /// Not seen within the block budget; it may still land later
    NotSeen { last_checked: u64 },
}

#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub timeout_blocks: u32,
    pub poll_interval: Duration,
}

/// Scans blocks after `submitted_at` for `tx_hash`, up to
/// `timeout_blocks` of them.
pub async fn watch_inclusion<S: BlockSource + ?Sized>(
    source: &S,
    tx_hash: &Hash,
    submitted_at: u64,
    options: WatchOptions,
) -> MigrationResult<Inclusion> {
    let last = submitted_at + options.timeout_blocks as u64;
    let mut next = submitted_at + 1;

    while next <= last {
        let head = source.latest_header().await?.block_number()?;

        while next <= head.min(last) {
            if let Some(found) = scan_block(source, tx_hash, next).await? {
                return Ok(found);
            }
            next += 1;
        }

        if next <= last {
            sleep(options.poll_interval).await;
        }
    }

    console_debug!("[Watcher] Gave up after block {}", last);
    Ok(Inclusion::NotSeen { last_checked: last })
}

async fn scan_block<S: BlockSource + ?Sized>(
    source: &S,
    tx_hash: &Hash,
    number: u64,
) -> MigrationResult<Option<Inclusion>> {
    let Some(block_hash) = source.block_hash(number).await? else {
        return Ok(None);
    };
    let Some(signed) = source.block(&block_hash).await? else {
        return Ok(None);
    };

    for encoded in &signed.block.extrinsics {
        if extrinsic_hash(&from_hex(encoded)?) == *tx_hash {
            return Ok(Some(Inclusion::InBlock {
                block_hash,
                block_number: number,
            }));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::rpc::Block;
    use crate::chain::scale::to_hex;
    use std::cell::Cell;

    /// Chain whose head advances by one on every header query
    struct FakeChain {
        head: Cell<u64>,
        target: Vec<u8>,
        included_at: Option<u64>,
    }

    fn hash_of(number: u64) -> Hash {
        let mut hash = [0u8; 32];
        hash[..8].copy_from_slice(&number.to_le_bytes());
        hash
    }

    #[async_trait(?Send)]
    impl BlockSource for FakeChain {
        async fn latest_header(&self) -> MigrationResult<Header> {
            let head = self.head.get() + 1;
            self.head.set(head);
            Ok(Header {
                parent_hash: to_hex(&hash_of(head - 1)),
                number: format!("0x{:x}", head),
            })
        }

        async fn block_hash(&self, number: u64) -> MigrationResult<Option<Hash>> {
            Ok((number <= self.head.get()).then(|| hash_of(number)))
        }

        async fn block(&self, hash: &Hash) -> MigrationResult<Option<SignedBlock>> {
            let number = u64::from_le_bytes(hash[..8].try_into().unwrap());
            let mut extrinsics = vec![to_hex(&[0xde, 0xad])];
            if self.included_at == Some(number) {
                extrinsics.push(to_hex(&self.target));
            }
            Ok(Some(SignedBlock {
                block: Block {
                    header: Header {
                        parent_hash: to_hex(&hash_of(number - 1)),
                        number: format!("0x{:x}", number),
                    },
                    extrinsics,
                },
            }))
        }
    }

    fn options(timeout_blocks: u32) -> WatchOptions {
        WatchOptions {
            timeout_blocks,
            poll_interval: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_finds_extrinsic_in_later_block() {
        let target = vec![1, 2, 3, 4];
        let chain = FakeChain {
            head: Cell::new(100),
            target: target.clone(),
            included_at: Some(103),
        };

        let outcome = watch_inclusion(&chain, &extrinsic_hash(&target), 100, options(10))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Inclusion::InBlock {
                block_hash: hash_of(103),
                block_number: 103
            }
        );
    }

    #[tokio::test]
    async fn test_gives_up_after_block_budget() {
        let target = vec![9, 9];
        let chain = FakeChain {
            head: Cell::new(50),
            target: target.clone(),
            included_at: Some(60),
        };

        let outcome = watch_inclusion(&chain, &extrinsic_hash(&target), 50, options(3))
            .await
            .unwrap();
        assert_eq!(outcome, Inclusion::NotSeen { last_checked: 53 });
    }
}
