//! Error types for dy50-core

/// Result type alias for core protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame is too short to hold even an empty packet
    #[error("Frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        expected: u16,
        received: u16,
    },

    /// Frame does not begin with the protocol sentinel
    #[error("Start code mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    StartCodeMismatch {
        expected: u16,
        received: u16,
    },

    /// Packet type byte is not one of the protocol's four markers
    #[error("Invalid packet type: 0x{0:02X}")]
    InvalidPacketType(u8),

    /// Length field below the two checksum bytes it must cover
    #[error("Length field out of range: {declared} (minimum {min})")]
    InvalidPayloadLength {
        declared: u16,
        min: u16,
    },

    /// Length field inconsistent with the frame being decoded
    #[error("Length field {declared} does not match {available} remaining frame bytes")]
    LengthMismatch {
        declared: u16,
        available: usize,
    },

    /// Declared frame cannot fit the receive buffer
    #[error("Declared frame of {declared} bytes exceeds receive capacity of {capacity} bytes")]
    FrameTooLarge {
        declared: usize,
        capacity: usize,
    },

    /// Payload too large to send
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
}

impl Error {
    /// Check if the error is a framing failure on the receive path.
    ///
    /// Framing failures are recovered locally by resetting the reassembler;
    /// the link stays usable for the next command.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            Self::ChecksumMismatch { .. }
                | Self::StartCodeMismatch { .. }
                | Self::InvalidPacketType(_)
                | Self::InvalidPayloadLength { .. }
                | Self::LengthMismatch { .. }
                | Self::FrameTooLarge { .. }
        )
    }
}
