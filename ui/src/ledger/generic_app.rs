use tracing::instrument;

use super::apdu::{ApduCommand, ApduResponse};
use super::path::Bip44Path;
use super::transport::LedgerTransport;
use crate::services::errors::LedgerErrorKind;

pub const CLA_GENERIC: u8 = 0xF9;
pub const CLA_DASHBOARD: u8 = 0xB0;

pub const INS_GET_VERSION: u8 = 0x00;
pub const INS_GET_ADDRESS: u8 = 0x01;
pub const INS_SIGN: u8 = 0x02;
pub const INS_APP_INFO: u8 = 0x01;

pub const P1_INIT: u8 = 0x00;
pub const P1_ADD: u8 = 0x01;
pub const P1_LAST: u8 = 0x02;

pub const P1_NO_CONFIRM: u8 = 0x00;
pub const P1_CONFIRM: u8 = 0x01;

pub const P2_ED25519: u8 = 0x00;

pub const CHUNK_SIZE: usize = 250;
const PUBKEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppVersion {
    pub test_mode: bool,
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub device_locked: bool,
}

impl std::fmt::Display for AppVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// What the dashboard reports as the running app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAddress {
    pub pub_key: [u8; PUBKEY_LEN],
    pub address: String,
}

impl DerivedAddress {
    pub fn pub_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.pub_key))
    }
}

/// Client for the generic Polkadot app on top of any transport
pub struct GenericApp<T: LedgerTransport> {
    transport: T,
}

impl<T: LedgerTransport> GenericApp<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    async fn send(&self, command: ApduCommand) -> Result<Vec<u8>, LedgerErrorKind> {
        let raw = self.transport.exchange(&command.encode()?).await?;
        ApduResponse::from_bytes(&raw)?.into_result()
    }

    pub async fn get_version(&self) -> Result<AppVersion, LedgerErrorKind> {
        let data = self
            .send(ApduCommand::new(CLA_GENERIC, INS_GET_VERSION, 0, 0, Vec::new()))
            .await?;

        if data.len() < 4 {
            return Err(LedgerErrorKind::InvalidData);
        }

        Ok(AppVersion {
            test_mode: data[0] != 0,
            major: data[1],
            minor: data[2],
            patch: data[3],
            device_locked: data.get(4).copied() == Some(1),
        })
    }

    /// Asks the dashboard which app is running; works with any app open
    pub async fn app_info(&self) -> Result<AppInfo, LedgerErrorKind> {
        let data = self
            .send(ApduCommand::new(CLA_DASHBOARD, INS_APP_INFO, 0, 0, Vec::new()))
            .await?;
        parse_app_info(&data)
    }

    #[instrument(skip(self), fields(path = %path), err(Debug))]
    pub async fn get_address(
        &self,
        path: &Bip44Path,
        ss58_prefix: u16,
        show: bool,
    ) -> Result<DerivedAddress, LedgerErrorKind> {
        let mut data = path.to_bytes();
        data.extend_from_slice(&ss58_prefix.to_le_bytes());

        let p1 = if show { P1_CONFIRM } else { P1_NO_CONFIRM };
        let response = self
            .send(ApduCommand::new(CLA_GENERIC, INS_GET_ADDRESS, p1, P2_ED25519, data))
            .await?;
        parse_address(&response)
    }

    /// Signs `payload`. The first chunk carries the path and the payload
    /// length (u16 LE); `payload ‖ metadata_proof` follows in chunks of at
    /// most `CHUNK_SIZE` bytes.
    #[instrument(
        skip(self, payload, metadata_proof),
        fields(path = %path, len = payload.len(), proof = metadata_proof.len()),
        err(Debug)
    )]
    pub async fn sign(
        &self,
        path: &Bip44Path,
        payload: &[u8],
        metadata_proof: &[u8],
    ) -> Result<Vec<u8>, LedgerErrorKind> {
        let payload_len = u16::try_from(payload.len()).map_err(|_| LedgerErrorKind::InvalidData)?;
        if payload.is_empty() {
            return Err(LedgerErrorKind::InvalidData);
        }

        let mut init = path.to_bytes();
        init.extend_from_slice(&payload_len.to_le_bytes());
        self.send(ApduCommand::new(CLA_GENERIC, INS_SIGN, P1_INIT, P2_ED25519, init))
            .await?;

        let mut blob = Vec::with_capacity(payload.len() + metadata_proof.len());
        blob.extend_from_slice(payload);
        blob.extend_from_slice(metadata_proof);

        let chunks: Vec<&[u8]> = blob.chunks(CHUNK_SIZE).collect();
        let last = chunks.len() - 1;
        let mut signature = Vec::new();

        for (i, chunk) in chunks.into_iter().enumerate() {
            let p1 = if i == last { P1_LAST } else { P1_ADD };
            signature = self
                .send(ApduCommand::new(CLA_GENERIC, INS_SIGN, p1, P2_ED25519, chunk.to_vec()))
                .await?;
        }

        if signature.len() != 64 && signature.len() != 65 {
            return Err(LedgerErrorKind::InvalidData);
        }
        Ok(signature)
    }

    pub async fn close(&self) {
        self.transport.close().await;
    }
}

fn parse_app_info(data: &[u8]) -> Result<AppInfo, LedgerErrorKind> {
    // format byte, then length-prefixed name and version
    let mut cursor = data.get(1..).ok_or(LedgerErrorKind::InvalidData)?;
    let name = read_lv(&mut cursor)?;
    let version = read_lv(&mut cursor)?;
    Ok(AppInfo { name, version })
}

fn read_lv(cursor: &mut &[u8]) -> Result<String, LedgerErrorKind> {
    let (&len, rest) = cursor.split_first().ok_or(LedgerErrorKind::InvalidData)?;
    let len = len as usize;
    if rest.len() < len {
        return Err(LedgerErrorKind::InvalidData);
    }
    let value = String::from_utf8_lossy(&rest[..len]).into_owned();
    *cursor = &rest[len..];
    Ok(value)
}

fn parse_address(data: &[u8]) -> Result<DerivedAddress, LedgerErrorKind> {
    if data.len() <= PUBKEY_LEN {
        return Err(LedgerErrorKind::InvalidData);
    }

    let mut pub_key = [0u8; PUBKEY_LEN];
    pub_key.copy_from_slice(&data[..PUBKEY_LEN]);
    let address = std::str::from_utf8(&data[PUBKEY_LEN..])
        .map_err(|_| LedgerErrorKind::InvalidData)?
        .trim_end_matches('\0')
        .to_string();

    Ok(DerivedAddress { pub_key, address })
}
