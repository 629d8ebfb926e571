//! Feature slots

use crate::error::{Error, Result};

/// On-module scratch slot holding one extracted feature set
///
/// The module has two. Enrollment extracts a capture into each and merges
/// them into a storable template; search probes one of them against the
/// library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CharBuffer {
    One = 0x01,
    Two = 0x02,
}

impl CharBuffer {
    /// Wire identifier of the slot
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CharBuffer {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::One),
            0x02 => Ok(Self::Two),
            other => Err(Error::Validation(format!("invalid feature slot: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_ids() {
        assert_eq!(CharBuffer::One.id(), 0x01);
        assert_eq!(CharBuffer::Two.id(), 0x02);
    }

    #[test]
    fn test_try_from() {
        assert_eq!(CharBuffer::try_from(1).unwrap(), CharBuffer::One);
        assert_eq!(CharBuffer::try_from(2).unwrap(), CharBuffer::Two);
        assert!(CharBuffer::try_from(3).is_err());
    }
}
