//! `Balances.transfer_all` extrinsics: call data, the payload the device
//! signs, and the signed v4 envelope.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

use super::scale::{encode_compact, encode_vec};
use super::ss58::ACCOUNT_ID_LEN;
use crate::services::errors::{MigrationError, MigrationResult};

type Blake2b256 = Blake2b<U32>;

pub type AccountId = [u8; ACCOUNT_ID_LEN];
pub type Hash = [u8; 32];

const EXTRINSIC_VERSION_SIGNED: u8 = 0x84;
const MULTI_ADDRESS_ID: u8 = 0x00;
const MULTI_SIGNATURE_ED25519: u8 = 0x00;
const IMMORTAL_ERA: u8 = 0x00;
const METADATA_HASH_DISABLED: u8 = 0x00;
const NONE: u8 = 0x00;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferAllCall {
    pub pallet_index: u8,
    pub call_index: u8,
    pub dest: AccountId,
    pub keep_alive: bool,
}

impl TransferAllCall {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + 1 + ACCOUNT_ID_LEN + 1);
        out.push(self.pallet_index);
        out.push(self.call_index);
        out.push(MULTI_ADDRESS_ID);
        out.extend_from_slice(&self.dest);
        out.push(self.keep_alive as u8);
        out
    }
}

/// Chain state a signature commits to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    pub nonce: u64,
    pub tip: u128,
    pub spec_version: u32,
    pub transaction_version: u32,
    pub genesis_hash: Hash,
    pub metadata_hash_extension: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedExtrinsic {
    pub call: Vec<u8>,
    pub context: SigningContext,
}

impl UnsignedExtrinsic {
    pub fn new(call: Vec<u8>, context: SigningContext) -> Self {
        Self { call, context }
    }

    // era, nonce, tip and the metadata hash mode, in extension order
    fn extra(&self) -> Vec<u8> {
        let mut out = vec![IMMORTAL_ERA];
        encode_compact(self.context.nonce as u128, &mut out);
        encode_compact(self.context.tip, &mut out);
        if self.context.metadata_hash_extension {
            out.push(METADATA_HASH_DISABLED);
        }
        out
    }

    /// Bytes handed to the device for signing
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut out = self.call.clone();
        out.extend(self.extra());
        out.extend_from_slice(&self.context.spec_version.to_le_bytes());
        out.extend_from_slice(&self.context.transaction_version.to_le_bytes());
        out.extend_from_slice(&self.context.genesis_hash);
        // immortal: the checkpoint block is genesis
        out.extend_from_slice(&self.context.genesis_hash);
        if self.context.metadata_hash_extension {
            out.push(NONE);
        }
        out
    }

    /// Assembles the length-prefixed signed extrinsic
    pub fn into_signed(self, signer: &AccountId, signature: &[u8]) -> MigrationResult<Vec<u8>> {
        let signature = normalize_signature(signature)?;

        let mut body = vec![EXTRINSIC_VERSION_SIGNED, MULTI_ADDRESS_ID];
        body.extend_from_slice(signer);
        body.extend_from_slice(&signature);
        body.extend(self.extra());
        body.extend_from_slice(&self.call);

        let mut out = Vec::with_capacity(body.len() + 4);
        encode_vec(&body, &mut out);
        Ok(out)
    }
}

/// Turns a device signature into a `MultiSignature`. Bare 64-byte
/// signatures are ed25519.
pub fn normalize_signature(signature: &[u8]) -> MigrationResult<Vec<u8>> {
    match signature.len() {
        64 => {
            let mut out = Vec::with_capacity(65);
            out.push(MULTI_SIGNATURE_ED25519);
            out.extend_from_slice(signature);
            Ok(out)
        }
        65 => Ok(signature.to_vec()),
        n => Err(MigrationError::Encoding {
            message: format!("unexpected signature length {}", n),
        }),
    }
}

/// Blake2b-256 over the encoded extrinsic, as block explorers show it
pub fn extrinsic_hash(extrinsic: &[u8]) -> Hash {
    let mut hasher = Blake2b256::new();
    hasher.update(extrinsic);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}
