//! Ledger HID framing: APDUs split into fixed-size reports
//!
//! Each report: channel (u16 BE), tag, sequence index (u16 BE). The first
//! report of a message also carries the total length (u16 BE). Reports are
//! zero padded.

use crate::services::errors::LedgerErrorKind;

pub const PACKET_SIZE: usize = 64;
pub const CHANNEL: u16 = 0x0101;
pub const TAG_APDU: u8 = 0x05;

const HEADER_LEN: usize = 5;

/// Splits `apdu` into padded HID reports
pub fn wrap_apdu(apdu: &[u8], packet_size: usize) -> Vec<Vec<u8>> {
    let mut payload = Vec::with_capacity(apdu.len() + 2);
    payload.extend_from_slice(&(apdu.len() as u16).to_be_bytes());
    payload.extend_from_slice(apdu);

    let chunk_size = packet_size - HEADER_LEN;
    payload
        .chunks(chunk_size)
        .enumerate()
        .map(|(sequence, chunk)| {
            let mut packet = Vec::with_capacity(packet_size);
            packet.extend_from_slice(&CHANNEL.to_be_bytes());
            packet.push(TAG_APDU);
            packet.extend_from_slice(&(sequence as u16).to_be_bytes());
            packet.extend_from_slice(chunk);
            packet.resize(packet_size, 0);
            packet
        })
        .collect()
}

/// Reassembles reports into one response
#[derive(Debug, Default)]
pub struct FrameAssembler {
    expected_len: Option<usize>,
    next_sequence: u16,
    buffer: Vec<u8>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one report; returns the message once complete
    pub fn push(&mut self, packet: &[u8]) -> Result<Option<Vec<u8>>, LedgerErrorKind> {
        if packet.len() < HEADER_LEN {
            return Err(framing_error("report shorter than header"));
        }

        let channel = u16::from_be_bytes([packet[0], packet[1]]);
        if channel != CHANNEL {
            return Err(framing_error(&format!("unexpected channel 0x{:04x}", channel)));
        }
        if packet[2] != TAG_APDU {
            return Err(framing_error(&format!("unexpected tag 0x{:02x}", packet[2])));
        }

        let sequence = u16::from_be_bytes([packet[3], packet[4]]);
        if sequence != self.next_sequence {
            return Err(framing_error(&format!(
                "sequence {} out of order, expected {}",
                sequence, self.next_sequence
            )));
        }
        self.next_sequence += 1;

        let mut body = &packet[HEADER_LEN..];
        if self.expected_len.is_none() {
            if body.len() < 2 {
                return Err(framing_error("first report misses length"));
            }
            self.expected_len = Some(u16::from_be_bytes([body[0], body[1]]) as usize);
            body = &body[2..];
        }

        self.buffer.extend_from_slice(body);

        match self.expected_len {
            Some(len) if self.buffer.len() >= len => {
                let mut message = std::mem::take(&mut self.buffer);
                message.truncate(len);
                self.expected_len = None;
                self.next_sequence = 0;
                Ok(Some(message))
            }
            _ => Ok(None),
        }
    }
}

fn framing_error(message: &str) -> LedgerErrorKind {
    LedgerErrorKind::Transport {
        message: format!("HID framing: {}", message),
    }
}
