//! `System.Account` storage: key derivation and the balance fields the
//! dispatch check reads

use blake2::digest::consts::U16;
use blake2::{Blake2b, Digest};

use super::extrinsic::AccountId;
use crate::services::errors::{MigrationError, MigrationResult};

type Blake2b128 = Blake2b<U16>;

/// twox128("System") ++ twox128("Account")
const SYSTEM_ACCOUNT_PREFIX: [u8; 32] = [
    0x26, 0xaa, 0x39, 0x4e, 0xea, 0x56, 0x30, 0xe0, 0x7c, 0x48, 0xae, 0x0c, 0x95, 0x58, 0xce, 0xf7,
    0xb9, 0x9d, 0x88, 0x0e, 0xc6, 0x81, 0x79, 0x9c, 0x0c, 0xf3, 0x0e, 0x88, 0x86, 0x37, 0x1d, 0xa9,
];

/// nonce, consumers, providers, sufficients, then four u128 balance fields
const ACCOUNT_INFO_LEN: usize = 16 + 4 * 16;

/// Storage key of `System.Account(account)` (blake2_128_concat hasher)
pub fn system_account_key(account: &AccountId) -> Vec<u8> {
    let mut hasher = Blake2b128::new();
    hasher.update(account);

    let mut key = Vec::with_capacity(SYSTEM_ACCOUNT_PREFIX.len() + 16 + account.len());
    key.extend_from_slice(&SYSTEM_ACCOUNT_PREFIX);
    key.extend_from_slice(&hasher.finalize());
    key.extend_from_slice(account);
    key
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    pub nonce: u32,
    pub free: u128,
    pub reserved: u128,
    /// `frozen` on current runtimes, `misc_frozen` on older ones
    pub frozen: u128,
}

impl AccountInfo {
    pub fn decode(data: &[u8]) -> MigrationResult<Self> {
        if data.len() < ACCOUNT_INFO_LEN {
            return Err(MigrationError::Encoding {
                message: format!("account info is {} bytes, expected {}", data.len(), ACCOUNT_INFO_LEN),
            });
        }
        let u128_at = |offset: usize| {
            let mut bytes = [0u8; 16];
            bytes.copy_from_slice(&data[offset..offset + 16]);
            u128::from_le_bytes(bytes)
        };
        let mut nonce = [0u8; 4];
        nonce.copy_from_slice(&data[..4]);

        Ok(Self {
            nonce: u32::from_le_bytes(nonce),
            free: u128_at(16),
            reserved: u128_at(32),
            frozen: u128_at(48),
        })
    }

    pub fn transferable(&self) -> u128 {
        self.free.saturating_sub(self.frozen)
    }
}

/// Whether a transfer-all went through, judged from the signer's account
/// in the parent block and in the inclusion block. A failed dispatch
/// still pays the fee, so only a drop of at least half the transferable
/// balance, or a reaped account, counts as moved.
pub fn transfer_all_dispatched(before: Option<&AccountInfo>, after: Option<&AccountInfo>) -> bool {
    let Some(before) = before else {
        return false;
    };
    match after {
        None => true,
        Some(after) => {
            let was = before.transferable();
            was > 0 && after.transferable() <= was / 2
        }
    }
}
