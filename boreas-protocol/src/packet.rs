//! Command packet encoding and decoding
//!
//! Packet format:
//! - COMMAND (1 byte): command identifier
//! - ARG_LENGTH (1 byte): number of argument bytes (0-98)
//! - ARGS (0-98 bytes): command-specific arguments
//!
//! The 98-byte argument ceiling keeps a whole packet within the 100
//! byte slave receive buffer.

use heapless::Vec;

/// Bytes before the arguments: COMMAND + ARG_LENGTH
pub const HEADER_SIZE: usize = 2;

/// Maximum argument size in bytes
pub const MAX_ARG_LEN: usize = 98;

/// Errors that can occur during packet parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Not enough bytes for the header or the declared arguments
    Truncated,
    /// Declared argument length exceeds the maximum
    ArgsTooLong,
    /// Command id outside the known range; carries the offending id
    UnknownCommand(u8),
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Commands a peer may send us
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommandId {
    /// Request a status report
    Report = 0x00,
    /// Liveness probe; the receiver queues a greeting in reply
    Hello = 0x01,
}

impl CommandId {
    /// Get the id as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create an id from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(CommandId::Report),
            0x01 => Some(CommandId::Hello),
            _ => None,
        }
    }
}

/// A parsed or constructed command packet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandPacket {
    /// Command identifier
    pub command: CommandId,
    /// Argument bytes
    pub args: Vec<u8, MAX_ARG_LEN>,
}

impl CommandPacket {
    /// Create a new packet with the given command and arguments
    pub fn new(command: CommandId, args: &[u8]) -> Result<Self, PacketError> {
        let mut args_vec = Vec::new();
        args_vec
            .extend_from_slice(args)
            .map_err(|_| PacketError::ArgsTooLong)?;

        Ok(Self {
            command,
            args: args_vec,
        })
    }

    /// Create a packet with no arguments
    pub fn empty(command: CommandId) -> Self {
        Self {
            command,
            args: Vec::new(),
        }
    }

    /// Parse a packet from the front of `bytes`
    ///
    /// Trailing bytes beyond the declared argument length are ignored;
    /// the slave buffer may hold more than one drain's worth of data.
    pub fn parse(bytes: &[u8]) -> Result<Self, PacketError> {
        if bytes.len() < HEADER_SIZE {
            return Err(PacketError::Truncated);
        }

        let id = bytes[0];
        let command = CommandId::from_u8(id).ok_or(PacketError::UnknownCommand(id))?;

        let arg_len = bytes[1] as usize;
        if arg_len > MAX_ARG_LEN {
            return Err(PacketError::ArgsTooLong);
        }

        let rest = &bytes[HEADER_SIZE..];
        if rest.len() < arg_len {
            return Err(PacketError::Truncated);
        }

        let mut args = Vec::new();
        // Cannot fail: arg_len was checked against MAX_ARG_LEN
        let _ = args.extend_from_slice(&rest[..arg_len]);

        Ok(Self { command, args })
    }

    /// Encode this packet into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, PacketError> {
        let total = HEADER_SIZE + self.args.len();
        if buffer.len() < total {
            return Err(PacketError::BufferTooSmall);
        }

        buffer[0] = self.command.as_u8();
        buffer[1] = self.args.len() as u8;
        buffer[HEADER_SIZE..total].copy_from_slice(&self.args);

        Ok(total)
    }

    /// Encode this packet into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, { HEADER_SIZE + MAX_ARG_LEN }>, PacketError> {
        let mut buffer = [0u8; HEADER_SIZE + MAX_ARG_LEN];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| PacketError::BufferTooSmall)?;
        Ok(vec)
    }
}
