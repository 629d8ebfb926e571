//! Transport layer for the DY50 serial link
//!
//! The protocol engine only needs a byte sink and a byte source; this crate
//! defines that boundary and provides the serial-port implementation.

pub mod error;
pub mod serial;

pub use error::{Error, Result};
pub use serial::SerialTransport;

use async_trait::async_trait;
use bytes::BytesMut;
use std::time::Duration;

/// Byte-sink / byte-source boundary between the protocol engine and the
/// physical link
///
/// `receive` makes no chunking promises: one call may yield a single byte or
/// several frames' worth, and the reassembly layer must cope either way.
#[async_trait]
pub trait Transport: Send {
    /// Open the link
    async fn connect(&mut self) -> Result<()>;

    /// Close the link
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if the link is open
    fn is_connected(&self) -> bool;

    /// Send raw bytes, best effort; no delivery acknowledgment at this layer
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Wait up to `timeout` for the next chunk of received bytes
    async fn receive(&mut self, timeout: Duration) -> Result<BytesMut>;

    /// Human-readable link identifier for diagnostics
    fn endpoint(&self) -> String;
}
