//! DY50 protocol packet structure and encoding/decoding

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    constants::{BROADCAST_ADDRESS, CHECKSUM_SIZE, FRAME_OVERHEAD, MAX_PAYLOAD_SIZE, START_CODE},
    error::{Error, Result},
};

/// Packet type marker, byte 6 of every frame
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    /// Host-issued instruction
    Command = 0x01,

    /// Chunk of a bulk data transfer; follows a Command or Acknowledge
    Data = 0x02,

    /// Module response to a command
    Ack = 0x07,

    /// Final chunk of a bulk data transfer
    EndOfData = 0x08,
}

impl PacketType {
    /// Get packet type name
    pub fn name(self) -> &'static str {
        match self {
            Self::Command => "COMMAND",
            Self::Data => "DATA",
            Self::Ack => "ACK",
            Self::EndOfData => "END_OF_DATA",
        }
    }
}

impl From<PacketType> for u8 {
    fn from(packet_type: PacketType) -> u8 {
        packet_type as u8
    }
}

impl TryFrom<u8> for PacketType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Command),
            0x02 => Ok(Self::Data),
            0x07 => Ok(Self::Ack),
            0x08 => Ok(Self::EndOfData),
            other => Err(Error::InvalidPacketType(other)),
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

/// DY50 protocol packet
///
/// # Packet Structure
///
/// ```text
/// ┌────────────┬───────────┬──────────┬──────────┬───────────┬────────────┐
/// │ Start code │  Address  │   Type   │  Length  │  Payload  │  Checksum  │
/// │  2 bytes   │  4 bytes  │  1 byte  │ 2 bytes  │  N bytes  │  2 bytes   │
/// │  (0xEF01)  │  (BE u32) │          │ (BE u16) │  (bytes)  │  (BE u16)  │
/// └────────────┴───────────┴──────────┴──────────┴───────────┴────────────┘
/// ```
///
/// All multi-byte fields are big-endian. The length field counts the payload
/// plus the two trailing checksum bytes, so it is always `N + 2`.
///
/// # Examples
///
/// ```
/// use dy50_core::{Packet, PacketType};
/// use dy50_core::constants::BROADCAST_ADDRESS;
///
/// let packet = Packet::command(BROADCAST_ADDRESS, vec![0x1D]).unwrap();
/// let encoded = packet.encode();
///
/// let decoded = Packet::decode(encoded).unwrap();
/// assert_eq!(decoded.packet_type, PacketType::Command);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    /// Target module address (broadcast matches any device)
    pub address: u32,

    /// Packet type marker
    pub packet_type: PacketType,

    /// Packet payload (0 to 254 bytes)
    pub payload: Bytes,
}

impl Packet {
    /// Create a new packet
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload exceeds the maximum
    /// frame payload; oversized payloads are rejected here and never reach
    /// the wire.
    pub fn new(address: u32, packet_type: PacketType, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        Ok(Self {
            address,
            packet_type,
            payload,
        })
    }

    /// Create a command packet
    pub fn command(address: u32, payload: impl Into<Bytes>) -> Result<Self> {
        Self::new(address, PacketType::Command, payload)
    }

    /// Value of the wire length field: payload plus checksum bytes
    pub fn length_field(&self) -> u16 {
        (self.payload.len() + CHECKSUM_SIZE) as u16
    }

    /// Calculate the checksum for this packet
    pub fn checksum(&self) -> u16 {
        checksum::calculate(self.packet_type as u8, self.length_field(), &self.payload)
    }

    /// Check if this is a module acknowledge packet
    pub fn is_ack(&self) -> bool {
        self.packet_type == PacketType::Ack
    }

    /// Check if this packet is addressed to any device
    pub fn is_broadcast(&self) -> bool {
        self.address == BROADCAST_ADDRESS
    }

    /// Encode packet to a complete frame
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(FRAME_OVERHEAD + self.payload.len());

        buf.put_u16(START_CODE);
        buf.put_u32(self.address);
        buf.put_u8(self.packet_type as u8);
        buf.put_u16(self.length_field());
        buf.put_slice(&self.payload);
        buf.put_u16(self.checksum());

        buf
    }

    /// Decode a complete frame
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the frame is shorter than the fixed overhead
    /// - the start code or packet type is not the protocol's
    /// - the length field is inconsistent with the frame
    /// - the recomputed checksum differs from the received one
    ///
    /// The stored checksum is never trusted; it is always recomputed over
    /// the declared length field and payload and compared.
    pub fn decode(mut buf: BytesMut) -> Result<Self> {
        if buf.len() < FRAME_OVERHEAD {
            return Err(Error::FrameTooShort {
                expected: FRAME_OVERHEAD,
                actual: buf.len(),
            });
        }

        let start = buf.get_u16();
        if start != START_CODE {
            return Err(Error::StartCodeMismatch {
                expected: START_CODE,
                received: start,
            });
        }

        let address = buf.get_u32();
        let packet_type = PacketType::try_from(buf.get_u8())?;
        let length = buf.get_u16();

        if (length as usize) < CHECKSUM_SIZE {
            return Err(Error::InvalidPayloadLength {
                declared: length,
                min: CHECKSUM_SIZE as u16,
            });
        }
        if buf.len() != length as usize {
            return Err(Error::LengthMismatch {
                declared: length,
                available: buf.len(),
            });
        }

        let payload = buf.split_to(length as usize - CHECKSUM_SIZE).freeze();
        let received = buf.get_u16();

        let calculated = checksum::calculate(packet_type as u8, length, &payload);
        if calculated != received {
            return Err(Error::ChecksumMismatch {
                expected: calculated,
                received,
            });
        }

        Ok(Self {
            address,
            packet_type,
            payload,
        })
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("address", &format!("0x{:08X}", self.address))
            .field("packet_type", &self.packet_type)
            .field("checksum", &format!("0x{:04X}", self.checksum()))
            .field("payload", &hex::encode(&self.payload))
            .finish()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Packet[{}](addr=0x{:08X}, len={})",
            self.packet_type.name(),
            self.address,
            self.payload.len()
        )
    }
}
