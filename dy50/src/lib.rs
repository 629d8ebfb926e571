//! # dy50
//!
//! Driver for DY50 optical fingerprint sensor modules over a serial link.
//!
//! ## Features
//!
//! - Type-safe command layer over the module's packet protocol
//! - Async/await API using Tokio
//! - Byte-at-a-time frame reassembly, tolerant of partial delivery
//! - Watchdog timeout on every command; the link stays clean after failures
//!
//! ## Quick Start
//!
//! ```no_run
//! use dy50::Device;
//!
//! #[tokio::main]
//! async fn main() -> dy50::Result<()> {
//!     // Open the sensor at the factory baud rate
//!     let mut sensor = Device::open("/dev/ttyUSB0");
//!     sensor.connect().await?;
//!
//!     let count = sensor.template_count().await?;
//!     println!("{count} templates stored");
//!
//!     sensor.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;

// Re-exports
pub use device::{DEFAULT_BAUD, DEFAULT_TIMEOUT, Device, SearchOutcome};
pub use error::{Error, Result};

// Re-export protocol types
pub use dy50_core::{Command, ConfirmationCode, Packet, PacketType, Reassembler};
pub use dy50_transport::{SerialTransport, Transport};
pub use dy50_types::{CharBuffer, PacketSize, SensorParameters, StatusRegister};
