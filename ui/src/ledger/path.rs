use serde::{Deserialize, Serialize};

use crate::services::errors::LedgerErrorKind;

pub const HARDENED: u32 = 0x8000_0000;
const PURPOSE: u32 = 44;

/// Fully hardened Substrate path `m/44'/coin'/account'/change'/index'`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bip44Path {
    pub coin_type: u32,
    pub account: u32,
    pub change: u32,
    pub address_index: u32,
}

impl Bip44Path {
    pub fn new(coin_type: u32, account: u32) -> Self {
        Self {
            coin_type,
            account,
            change: 0,
            address_index: 0,
        }
    }

    /// Same account on another coin type
    pub fn with_coin_type(&self, coin_type: u32) -> Self {
        Self { coin_type, ..*self }
    }

    pub fn components(&self) -> [u32; 5] {
        [
            PURPOSE | HARDENED,
            self.coin_type | HARDENED,
            self.account | HARDENED,
            self.change | HARDENED,
            self.address_index | HARDENED,
        ]
    }

    /// Wire form used by the Polkadot apps: five little-endian u32
    pub fn to_bytes(&self) -> Vec<u8> {
        self.components()
            .iter()
            .flat_map(|component| component.to_le_bytes())
            .collect()
    }

    pub fn parse(value: &str) -> Result<Self, LedgerErrorKind> {
        let invalid = || LedgerErrorKind::InvalidData;

        let mut parts = value.trim().split('/');
        if parts.next() != Some("m") {
            return Err(invalid());
        }

        let mut numbers = Vec::with_capacity(5);
        for part in parts {
            let digits = part.trim_end_matches(|c: char| c == '\'' || c == 'h');
            numbers.push(digits.parse::<u32>().map_err(|_| invalid())?);
        }

        match numbers.as_slice() {
            [purpose, coin_type, account, change, address_index] if *purpose == PURPOSE => {
                Ok(Self {
                    coin_type: *coin_type,
                    account: *account,
                    change: *change,
                    address_index: *address_index,
                })
            }
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for Bip44Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "m/44'/{}'/{}'/{}'/{}'",
            self.coin_type, self.account, self.change, self.address_index
        )
    }
}
