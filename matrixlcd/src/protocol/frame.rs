//! Command frame encoder.
//!
//! ## Frame Format
//!
//! ```text
//! +--------+---------+------------------------------+
//! | Escape | Command |           Payload            |
//! +--------+---------+------------------------------+
//! | 1 byte | 1 byte  | payload_len(command) bytes   |
//! +--------+---------+------------------------------+
//! |  0xFE  |  code   | truncated / zero-filled args |
//! +--------+---------+------------------------------+
//! ```
//!
//! The payload length comes from the command table. Extra caller bytes are
//! dropped and missing ones are sent as zero.

use crate::error::Result;
use crate::protocol::command::CommandCode;

/// Lead byte that marks the start of a command on the wire.
pub const ESCAPE: u8 = 0xFE;

/// Escape byte plus command byte.
pub const HEADER_LEN: usize = 2;

/// An encoded command, ready to be written to the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    command: CommandCode,
    bytes: Vec<u8>,
}

impl CommandFrame {
    /// Encode `command` with its arguments taken from `payload`.
    pub fn encode(command: CommandCode, payload: &[u8]) -> Self {
        let len = command.payload_len();
        let mut bytes = Vec::with_capacity(HEADER_LEN + len);
        bytes.push(ESCAPE);
        bytes.push(command.code());

        let used = payload.len().min(len);
        bytes.extend_from_slice(&payload[..used]);
        bytes.resize(HEADER_LEN + len, 0);

        Self { command, bytes }
    }

    /// Encode a raw command byte, rejecting codes outside the command table.
    pub fn encode_raw(code: u8, payload: &[u8]) -> Result<Self> {
        let command = CommandCode::try_from(code)?;
        Ok(Self::encode(command, payload))
    }

    /// Command carried by this frame.
    pub fn command(&self) -> CommandCode {
        self.command
    }

    /// Argument bytes (after the header).
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    /// Complete frame as sent on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total frame length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Frames always carry at least the header, so this is never true.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the frame, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for CommandFrame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
