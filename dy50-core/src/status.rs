//! Device confirmation codes
//!
//! The first payload byte of every acknowledge packet. The numeric values
//! are a hardware compatibility contract and must not change. A
//! device-reported code is an expected outcome, not a fault: "no finger on
//! the sensor" is an answer the capture loop polls for, and it must stay
//! distinguishable from a broken link.

use std::fmt;

/// Status byte of an acknowledge packet
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConfirmationCode {
    /// Command executed successfully
    Ok,
    /// Error receiving the command packet
    PacketReceiveError,
    /// No finger on the sensor
    NoFinger,
    /// Failed to capture the finger image
    ImageCaptureFailed,
    /// Image too disorderly to extract features
    ImageTooMessy,
    /// Image normal but too few feature points
    TooFewFeatures,
    /// Probed finger does not match
    NoMatch,
    /// No matching finger in the searched pages
    NotFound,
    /// The two feature slots do not belong to the same finger
    EnrollMismatch,
    /// Addressed page is beyond the template library
    BadLocation,
    /// Error reading a template from the library, or invalid template
    TemplateReadError,
    /// Error uploading a template
    TemplateUploadError,
    /// Module cannot accept the following data packets
    PacketResponseFailed,
    /// Error uploading an image
    ImageUploadError,
    /// Failed to delete the template
    DeleteFailed,
    /// Failed to clear the template library
    DbClearFailed,
    /// Handshake password is incorrect
    WrongPassword,
    /// No valid primary image in the image buffer
    InvalidImage,
    /// Error writing flash
    FlashError,
    /// Invalid register number
    InvalidRegister,
    /// Incorrect address code
    WrongAddressCode,
    /// Handshake password must be verified first
    PasswordNotVerified,
    /// Code this driver does not know; newer firmware adds codes
    Other(u8),
}

impl ConfirmationCode {
    /// Check if the code reports success
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    /// Get the wire value of the code
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Ok => 0x00,
            Self::PacketReceiveError => 0x01,
            Self::NoFinger => 0x02,
            Self::ImageCaptureFailed => 0x03,
            Self::ImageTooMessy => 0x06,
            Self::TooFewFeatures => 0x07,
            Self::NoMatch => 0x08,
            Self::NotFound => 0x09,
            Self::EnrollMismatch => 0x0A,
            Self::BadLocation => 0x0B,
            Self::TemplateReadError => 0x0C,
            Self::TemplateUploadError => 0x0D,
            Self::PacketResponseFailed => 0x0E,
            Self::ImageUploadError => 0x0F,
            Self::DeleteFailed => 0x10,
            Self::DbClearFailed => 0x11,
            Self::WrongPassword => 0x13,
            Self::InvalidImage => 0x15,
            Self::FlashError => 0x18,
            Self::InvalidRegister => 0x1A,
            Self::WrongAddressCode => 0x20,
            Self::PasswordNotVerified => 0x21,
            Self::Other(raw) => raw,
        }
    }

    /// Get code name
    pub fn name(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::PacketReceiveError => "PACKET_RECEIVE_ERROR",
            Self::NoFinger => "NO_FINGER",
            Self::ImageCaptureFailed => "IMAGE_CAPTURE_FAILED",
            Self::ImageTooMessy => "IMAGE_TOO_MESSY",
            Self::TooFewFeatures => "TOO_FEW_FEATURES",
            Self::NoMatch => "NO_MATCH",
            Self::NotFound => "NOT_FOUND",
            Self::EnrollMismatch => "ENROLL_MISMATCH",
            Self::BadLocation => "BAD_LOCATION",
            Self::TemplateReadError => "TEMPLATE_READ_ERROR",
            Self::TemplateUploadError => "TEMPLATE_UPLOAD_ERROR",
            Self::PacketResponseFailed => "PACKET_RESPONSE_FAILED",
            Self::ImageUploadError => "IMAGE_UPLOAD_ERROR",
            Self::DeleteFailed => "DELETE_FAILED",
            Self::DbClearFailed => "DB_CLEAR_FAILED",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::InvalidImage => "INVALID_IMAGE",
            Self::FlashError => "FLASH_ERROR",
            Self::InvalidRegister => "INVALID_REGISTER",
            Self::WrongAddressCode => "WRONG_ADDRESS_CODE",
            Self::PasswordNotVerified => "PASSWORD_NOT_VERIFIED",
            Self::Other(_) => "UNKNOWN",
        }
    }
}

impl From<u8> for ConfirmationCode {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Ok,
            0x01 => Self::PacketReceiveError,
            0x02 => Self::NoFinger,
            0x03 => Self::ImageCaptureFailed,
            0x06 => Self::ImageTooMessy,
            0x07 => Self::TooFewFeatures,
            0x08 => Self::NoMatch,
            0x09 => Self::NotFound,
            0x0A => Self::EnrollMismatch,
            0x0B => Self::BadLocation,
            0x0C => Self::TemplateReadError,
            0x0D => Self::TemplateUploadError,
            0x0E => Self::PacketResponseFailed,
            0x0F => Self::ImageUploadError,
            0x10 => Self::DeleteFailed,
            0x11 => Self::DbClearFailed,
            0x13 => Self::WrongPassword,
            0x15 => Self::InvalidImage,
            0x18 => Self::FlashError,
            0x1A => Self::InvalidRegister,
            0x20 => Self::WrongAddressCode,
            0x21 => Self::PasswordNotVerified,
            other => Self::Other(other),
        }
    }
}

impl From<ConfirmationCode> for u8 {
    fn from(code: ConfirmationCode) -> u8 {
        code.as_u8()
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), self.as_u8())
    }
}
