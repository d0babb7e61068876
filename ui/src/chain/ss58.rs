//! SS58 account addresses

use blake2::{Blake2b512, Digest};

use crate::services::errors::{MigrationError, MigrationResult};

const PREFIX: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;
pub const ACCOUNT_ID_LEN: usize = 32;

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Blake2b512::new();
    hasher.update(PREFIX);
    hasher.update(payload);
    let digest = hasher.finalize();
    [digest[0], digest[1]]
}

fn encode_prefix(prefix: u16) -> Vec<u8> {
    if prefix < 64 {
        vec![prefix as u8]
    } else {
        let first = ((prefix & 0b0000_0000_1111_1100) >> 2) as u8 | 0b0100_0000;
        let second = ((prefix >> 8) as u8) | (((prefix & 0b11) as u8) << 6);
        vec![first, second]
    }
}

/// Renders a 32-byte account id under `prefix`
pub fn encode(account_id: &[u8; ACCOUNT_ID_LEN], prefix: u16) -> String {
    let mut payload = encode_prefix(prefix);
    payload.extend_from_slice(account_id);
    let sum = checksum(&payload);
    payload.extend_from_slice(&sum);
    bs58::encode(payload).into_string()
}

/// Parses an address into its network prefix and account id
pub fn decode(address: &str) -> MigrationResult<(u16, [u8; ACCOUNT_ID_LEN])> {
    let invalid = || MigrationError::InvalidAddress {
        address: address.to_string(),
    };

    let data = bs58::decode(address).into_vec().map_err(|_| invalid())?;
    let (prefix, prefix_len) = match data.first() {
        Some(&b) if b < 64 => (b as u16, 1),
        Some(&b) if b < 128 => {
            let second = *data.get(1).ok_or_else(invalid)?;
            let lower = ((b & 0b0011_1111) << 2) | (second >> 6);
            let upper = second & 0b0011_1111;
            (lower as u16 | ((upper as u16) << 8), 2)
        }
        _ => return Err(invalid()),
    };

    if data.len() != prefix_len + ACCOUNT_ID_LEN + CHECKSUM_LEN {
        return Err(invalid());
    }

    let body_end = prefix_len + ACCOUNT_ID_LEN;
    if checksum(&data[..body_end]) != data[body_end..] {
        return Err(invalid());
    }

    let mut account_id = [0u8; ACCOUNT_ID_LEN];
    account_id.copy_from_slice(&data[prefix_len..body_end]);
    Ok((prefix, account_id))
}

/// Decodes and re-encodes under another network prefix
pub fn reencode(address: &str, prefix: u16) -> MigrationResult<String> {
    let (_, account_id) = decode(address)?;
    Ok(encode(&account_id, prefix))
}
