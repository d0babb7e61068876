//! The handful of SCALE encodings an extrinsic needs

use crate::services::errors::{MigrationError, MigrationResult};

/// Appends `value` in SCALE compact form
pub fn encode_compact(value: u128, out: &mut Vec<u8>) {
    match value {
        0..=0x3f => out.push((value as u8) << 2),
        0x40..=0x3fff => out.extend_from_slice(&(((value as u16) << 2) | 0b01).to_le_bytes()),
        0x4000..=0x3fff_ffff => {
            out.extend_from_slice(&(((value as u32) << 2) | 0b10).to_le_bytes())
        }
        _ => {
            let bytes = value.to_le_bytes();
            let len = 16 - (value.leading_zeros() / 8) as usize;
            out.push((((len - 4) as u8) << 2) | 0b11);
            out.extend_from_slice(&bytes[..len]);
        }
    }
}

pub fn compact(value: u128) -> Vec<u8> {
    let mut out = Vec::new();
    encode_compact(value, &mut out);
    out
}

/// Reads a compact integer, returning it and the number of bytes consumed
pub fn decode_compact(input: &[u8]) -> MigrationResult<(u128, usize)> {
    let first = *input.first().ok_or_else(|| truncated("compact"))?;
    match first & 0b11 {
        0b00 => Ok(((first >> 2) as u128, 1)),
        0b01 => {
            let raw = take::<2>(input)?;
            Ok(((u16::from_le_bytes(raw) >> 2) as u128, 2))
        }
        0b10 => {
            let raw = take::<4>(input)?;
            Ok(((u32::from_le_bytes(raw) >> 2) as u128, 4))
        }
        _ => {
            let len = ((first >> 2) + 4) as usize;
            if len > 16 {
                return Err(MigrationError::Encoding {
                    message: format!("compact integer of {} bytes", len),
                });
            }
            let body = input.get(1..1 + len).ok_or_else(|| truncated("compact"))?;
            let mut bytes = [0u8; 16];
            bytes[..len].copy_from_slice(body);
            Ok((u128::from_le_bytes(bytes), 1 + len))
        }
    }
}

/// Prefixes `bytes` with their compact length
pub fn encode_vec(bytes: &[u8], out: &mut Vec<u8>) {
    encode_compact(bytes.len() as u128, out);
    out.extend_from_slice(bytes);
}

fn take<const N: usize>(input: &[u8]) -> MigrationResult<[u8; N]> {
    input
        .get(..N)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| truncated("compact"))
}

fn truncated(what: &str) -> MigrationError {
    MigrationError::Encoding {
        message: format!("truncated {}", what),
    }
}

/// Parses `0x`-prefixed (or bare) hex
pub fn from_hex(value: &str) -> MigrationResult<Vec<u8>> {
    let trimmed = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(trimmed).map_err(|e| MigrationError::Encoding {
        message: format!("invalid hex '{}': {}", value, e),
    })
}

pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
