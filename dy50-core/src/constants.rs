//! Wire protocol constants

/// Start-of-frame sentinel, high byte transmitted first.
///
/// Every packet in both directions begins with this value. It is checked as
/// a consistency guard when a complete frame is decoded, but it is never
/// used to hunt for frame boundaries; completion is byte-count driven.
pub const START_CODE: u16 = 0xEF01;

/// Module address that matches any attached device.
pub const BROADCAST_ADDRESS: u32 = 0xFFFF_FFFF;

/// Fixed bytes before the payload: start code (2) + address (4) + type (1)
/// + length field (2).
pub const HEADER_SIZE: usize = 9;

/// Trailing checksum size. The wire length field counts these two bytes as
/// part of the payload, so it is always `payload length + 2`.
pub const CHECKSUM_SIZE: usize = 2;

/// Frame bytes that are not payload.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Largest payload a single frame may carry.
pub const MAX_PAYLOAD_SIZE: usize = 254;

/// Largest complete frame: header plus the maximum length-field value.
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE + CHECKSUM_SIZE;
