//! Sensor command catalog
//!
//! One variant per sensor operation. The variant data is the request
//! argument layout, and [`Command::encode_payload`] renders the opcode byte
//! followed by the big-endian arguments exactly as the module expects them.
//! Adding an operation means adding a variant here; the framing and
//! reassembly layers are not involved.

use bytes::{BufMut, BytesMut};
use std::fmt;

/// Host-to-module instruction with its wire arguments
///
/// # Examples
///
/// ```
/// use dy50_core::Command;
///
/// let payload = Command::TemplateCount.encode_payload();
/// assert_eq!(payload.as_ref(), &[0x1D]);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Capture a finger image into the module's image buffer
    GetImage,

    /// Distill the image buffer into the given feature slot
    ExtractFeatures { slot: u8 },

    /// Match a feature slot against `count` library pages starting at `start`
    Search { slot: u8, start: u16, count: u16 },

    /// Merge both feature slots into a single template
    MergeTemplate,

    /// Write the template in a feature slot to a library page
    StoreTemplate { slot: u8, page: u16 },

    /// Read a library page back into a feature slot
    LoadTemplate { slot: u8, page: u16 },

    /// Ask the module to stream a feature slot back to the host
    UploadTemplate { slot: u8 },

    /// Delete `count` templates starting at `page`
    DeleteTemplates { page: u16, count: u16 },

    /// Clear the whole template library
    EmptyLibrary,

    /// Read the system parameter block
    ReadParameters,

    /// Set the 4-byte handshake password
    SetPassword { password: u32 },

    /// Verify the 4-byte handshake password
    VerifyPassword { password: u32 },

    /// Count the templates stored in the library
    TemplateCount,

    /// Turn the onboard LED on
    LedOn,

    /// Turn the onboard LED off
    LedOff,
}

impl Command {
    /// Operation code, the first payload byte of every command packet
    pub fn opcode(self) -> u8 {
        match self {
            Self::GetImage => 0x01,
            Self::ExtractFeatures { .. } => 0x02,
            Self::Search { .. } => 0x04,
            Self::MergeTemplate => 0x05,
            Self::StoreTemplate { .. } => 0x06,
            Self::LoadTemplate { .. } => 0x07,
            Self::UploadTemplate { .. } => 0x08,
            Self::DeleteTemplates { .. } => 0x0C,
            Self::EmptyLibrary => 0x0D,
            Self::ReadParameters => 0x0F,
            Self::SetPassword { .. } => 0x12,
            Self::VerifyPassword { .. } => 0x13,
            Self::TemplateCount => 0x1D,
            Self::LedOn => 0x50,
            Self::LedOff => 0x51,
        }
    }

    /// Render the command packet payload: opcode, then the operation's
    /// fixed-format big-endian arguments
    pub fn encode_payload(self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(8);
        buf.put_u8(self.opcode());

        match self {
            Self::ExtractFeatures { slot } | Self::UploadTemplate { slot } => {
                buf.put_u8(slot);
            }
            Self::Search { slot, start, count } => {
                buf.put_u8(slot);
                buf.put_u16(start);
                buf.put_u16(count);
            }
            Self::StoreTemplate { slot, page } | Self::LoadTemplate { slot, page } => {
                buf.put_u8(slot);
                buf.put_u16(page);
            }
            Self::DeleteTemplates { page, count } => {
                buf.put_u16(page);
                buf.put_u16(count);
            }
            Self::SetPassword { password } | Self::VerifyPassword { password } => {
                buf.put_u32(password);
            }
            Self::GetImage
            | Self::MergeTemplate
            | Self::EmptyLibrary
            | Self::ReadParameters
            | Self::TemplateCount
            | Self::LedOn
            | Self::LedOff => {}
        }

        buf
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::GetImage => "GET_IMAGE",
            Self::ExtractFeatures { .. } => "EXTRACT_FEATURES",
            Self::Search { .. } => "SEARCH",
            Self::MergeTemplate => "MERGE_TEMPLATE",
            Self::StoreTemplate { .. } => "STORE_TEMPLATE",
            Self::LoadTemplate { .. } => "LOAD_TEMPLATE",
            Self::UploadTemplate { .. } => "UPLOAD_TEMPLATE",
            Self::DeleteTemplates { .. } => "DELETE_TEMPLATES",
            Self::EmptyLibrary => "EMPTY_LIBRARY",
            Self::ReadParameters => "READ_PARAMETERS",
            Self::SetPassword { .. } => "SET_PASSWORD",
            Self::VerifyPassword { .. } => "VERIFY_PASSWORD",
            Self::TemplateCount => "TEMPLATE_COUNT",
            Self::LedOn => "LED_ON",
            Self::LedOff => "LED_OFF",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), self.opcode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_opcodes_match_the_module_manual() {
        assert_eq!(Command::GetImage.opcode(), 0x01);
        assert_eq!(Command::ExtractFeatures { slot: 1 }.opcode(), 0x02);
        assert_eq!(Command::Search { slot: 1, start: 0, count: 0 }.opcode(), 0x04);
        assert_eq!(Command::MergeTemplate.opcode(), 0x05);
        assert_eq!(Command::StoreTemplate { slot: 1, page: 0 }.opcode(), 0x06);
        assert_eq!(Command::LoadTemplate { slot: 1, page: 0 }.opcode(), 0x07);
        assert_eq!(Command::UploadTemplate { slot: 1 }.opcode(), 0x08);
        assert_eq!(Command::DeleteTemplates { page: 0, count: 1 }.opcode(), 0x0C);
        assert_eq!(Command::EmptyLibrary.opcode(), 0x0D);
        assert_eq!(Command::ReadParameters.opcode(), 0x0F);
        assert_eq!(Command::SetPassword { password: 0 }.opcode(), 0x12);
        assert_eq!(Command::VerifyPassword { password: 0 }.opcode(), 0x13);
        assert_eq!(Command::TemplateCount.opcode(), 0x1D);
        assert_eq!(Command::LedOn.opcode(), 0x50);
        assert_eq!(Command::LedOff.opcode(), 0x51);
    }

    #[test]
    fn test_search_payload_layout() {
        let payload = Command::Search { slot: 0x01, start: 0x0000, count: 0x00C8 }
            .encode_payload();

        assert_eq!(payload.as_ref(), &[0x04, 0x01, 0x00, 0x00, 0x00, 0xC8]);
    }

    #[test]
    fn test_store_and_load_payload_layout() {
        let store = Command::StoreTemplate { slot: 0x01, page: 0x0102 }.encode_payload();
        let load = Command::LoadTemplate { slot: 0x02, page: 0x0003 }.encode_payload();

        assert_eq!(store.as_ref(), &[0x06, 0x01, 0x01, 0x02]);
        assert_eq!(load.as_ref(), &[0x07, 0x02, 0x00, 0x03]);
    }

    #[test]
    fn test_delete_honors_the_count_argument() {
        let payload = Command::DeleteTemplates { page: 0x0005, count: 0x0003 }.encode_payload();

        assert_eq!(payload.as_ref(), &[0x0C, 0x00, 0x05, 0x00, 0x03]);
    }

    #[test]
    fn test_password_payload_is_big_endian() {
        let payload = Command::VerifyPassword { password: 0x0A0B_0C0D }.encode_payload();

        assert_eq!(payload.as_ref(), &[0x13, 0x0A, 0x0B, 0x0C, 0x0D]);
    }

    #[test]
    fn test_bare_commands_are_one_opcode_byte() {
        for command in [
            Command::GetImage,
            Command::MergeTemplate,
            Command::EmptyLibrary,
            Command::ReadParameters,
            Command::TemplateCount,
            Command::LedOn,
            Command::LedOff,
        ] {
            assert_eq!(command.encode_payload().as_ref(), &[command.opcode()]);
        }
    }
}
