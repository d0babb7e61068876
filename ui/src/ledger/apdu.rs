//! APDU command encoding and response parsing

use crate::services::errors::LedgerErrorKind;

pub const SW_OK: u16 = 0x9000;
pub const MAX_DATA_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApduCommand {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: Vec<u8>,
}

impl ApduCommand {
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8, data: Vec<u8>) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, LedgerErrorKind> {
        if self.data.len() > MAX_DATA_LEN {
            return Err(LedgerErrorKind::InvalidData);
        }

        let mut bytes = Vec::with_capacity(5 + self.data.len());
        bytes.extend_from_slice(&[self.cla, self.ins, self.p1, self.p2, self.data.len() as u8]);
        bytes.extend_from_slice(&self.data);
        Ok(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApduResponse {
    pub data: Vec<u8>,
    pub status_word: u16,
}

impl ApduResponse {
    /// Splits the trailing two-byte status word off a raw answer
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerErrorKind> {
        if bytes.len() < 2 {
            return Err(LedgerErrorKind::Transport {
                message: format!("response too short ({} bytes)", bytes.len()),
            });
        }

        let (data, sw) = bytes.split_at(bytes.len() - 2);
        Ok(Self {
            data: data.to_vec(),
            status_word: u16::from_be_bytes([sw[0], sw[1]]),
        })
    }

    pub fn is_success(&self) -> bool {
        self.status_word == SW_OK
    }

    pub fn into_result(self) -> Result<Vec<u8>, LedgerErrorKind> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(LedgerErrorKind::from_status_word(self.status_word))
        }
    }
}
