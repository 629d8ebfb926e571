//! High-level error types

use std::time::Duration;

use dy50_core::ConfirmationCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] dy50_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] dy50_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] dy50_types::Error),

    #[error("Device not connected")]
    NotConnected,

    #[error("Timed out after {after:?} waiting for a response")]
    Timeout { after: Duration },

    #[error("Handshake rejected: {0}")]
    Handshake(ConfirmationCode),

    /// The module answered, but refused a request whose result the caller
    /// needs decoded. The code distinguishes "device says no" from a broken
    /// link.
    #[error("Device refused the request: {0}")]
    Device(ConfirmationCode),

    #[error("Invalid response from device: {0}")]
    InvalidResponse(String),
}
