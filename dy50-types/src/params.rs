//! Decoded system parameter block

use bitflags::bitflags;
use byteorder::{BigEndian, ByteOrder};
use std::fmt;

use crate::error::{Error, Result};

/// Base unit of the negotiated baud-rate multiplier
pub const BAUD_BASE: u32 = 9_600;

bitflags! {
    /// System status register bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusRegister: u16 {
        /// Module is busy executing a command
        const BUSY = 1 << 0;
        /// Last match attempt found a matching finger
        const MATCH_FOUND = 1 << 1;
        /// Handshake password has been verified
        const PASSWORD_VERIFIED = 1 << 2;
        /// Image buffer holds a valid image
        const IMAGE_VALID = 1 << 3;
    }
}

/// Negotiated data-packet size, carried as a 2-bit code on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketSize {
    Bytes32 = 0,
    Bytes64 = 1,
    Bytes128 = 2,
    Bytes256 = 3,
}

impl PacketSize {
    /// Packet size in bytes
    pub fn in_bytes(self) -> usize {
        match self {
            Self::Bytes32 => 32,
            Self::Bytes64 => 64,
            Self::Bytes128 => 128,
            Self::Bytes256 => 256,
        }
    }
}

impl TryFrom<u16> for PacketSize {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(Self::Bytes32),
            1 => Ok(Self::Bytes64),
            2 => Ok(Self::Bytes128),
            3 => Ok(Self::Bytes256),
            other => Err(Error::Parse(format!("invalid packet size code: {other}"))),
        }
    }
}

impl fmt::Display for PacketSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.in_bytes())
    }
}

/// Snapshot of the module's system parameter block
///
/// Decoded from a read-parameters response. Immutable once constructed; it
/// describes the module at the moment of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorParameters {
    /// Status register
    pub status: StatusRegister,

    /// System identifier
    pub system_id: u16,

    /// Template library capacity (number of pages)
    pub capacity: u16,

    /// Matching security level
    pub security_level: u16,

    /// Configured module address
    pub device_address: u32,

    /// Negotiated data-packet size
    pub packet_size: PacketSize,

    /// Serial baud rate (multiplier resolved against the 9600 base)
    pub baud_rate: u32,
}

impl SensorParameters {
    /// Size of the parameter block on the wire, after the status byte
    pub const WIRE_SIZE: usize = 16;

    /// Decode the parameter block that follows the status byte of a
    /// read-parameters response
    ///
    /// Field layout, all big-endian:
    ///
    /// ```text
    /// offset  size  field
    /// 0       2     status register
    /// 2       2     system identifier
    /// 4       2     library capacity
    /// 6       2     security level
    /// 8       4     device address
    /// 12      2     packet size code {0,1,2,3} -> {32,64,128,256}
    /// 14      2     baud rate multiplier (x 9600)
    /// ```
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.len() != Self::WIRE_SIZE {
            return Err(Error::UnexpectedLength {
                expected: Self::WIRE_SIZE,
                actual: raw.len(),
            });
        }

        Ok(Self {
            status: StatusRegister::from_bits_retain(BigEndian::read_u16(&raw[0..2])),
            system_id: BigEndian::read_u16(&raw[2..4]),
            capacity: BigEndian::read_u16(&raw[4..6]),
            security_level: BigEndian::read_u16(&raw[6..8]),
            device_address: BigEndian::read_u32(&raw[8..12]),
            packet_size: PacketSize::try_from(BigEndian::read_u16(&raw[12..14]))?,
            baud_rate: BigEndian::read_u16(&raw[14..16]) as u32 * BAUD_BASE,
        })
    }
}

impl fmt::Display for SensorParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sensor[addr: 0x{:08X}, capacity: {}, security: {}, packet: {}, baud: {}]",
            self.device_address, self.capacity, self.security_level, self.packet_size, self.baud_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RAW: [u8; 16] = [
        0x00, 0x02, // status: MATCH_FOUND
        0x00, 0x09, // system id
        0x00, 0xC8, // capacity: 200
        0x00, 0x03, // security level
        0xFF, 0xFF, 0xFF, 0xFF, // device address
        0x00, 0x02, // packet size code 2 -> 128 bytes
        0x00, 0x06, // baud multiplier 6 -> 57600
    ];

    #[test]
    fn test_parse_parameter_block() {
        let params = SensorParameters::parse(&RAW).unwrap();

        assert_eq!(params.status, StatusRegister::MATCH_FOUND);
        assert_eq!(params.system_id, 9);
        assert_eq!(params.capacity, 200);
        assert_eq!(params.security_level, 3);
        assert_eq!(params.device_address, 0xFFFF_FFFF);
        assert_eq!(params.packet_size, PacketSize::Bytes128);
        assert_eq!(params.baud_rate, 57_600);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let result = SensorParameters::parse(&RAW[..15]);

        assert!(matches!(
            result,
            Err(Error::UnexpectedLength { expected: 16, actual: 15 })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_packet_size_code() {
        let mut raw = RAW;
        raw[13] = 0x04;

        assert!(matches!(SensorParameters::parse(&raw), Err(Error::Parse(_))));
    }

    #[test]
    fn test_packet_size_codes() {
        assert_eq!(PacketSize::try_from(0).unwrap().in_bytes(), 32);
        assert_eq!(PacketSize::try_from(1).unwrap().in_bytes(), 64);
        assert_eq!(PacketSize::try_from(2).unwrap().in_bytes(), 128);
        assert_eq!(PacketSize::try_from(3).unwrap().in_bytes(), 256);
    }

    #[test]
    fn test_status_register_keeps_reserved_bits() {
        let raw = StatusRegister::from_bits_retain(0x8001);

        assert!(raw.contains(StatusRegister::BUSY));
        assert_eq!(raw.bits(), 0x8001);
    }
}
