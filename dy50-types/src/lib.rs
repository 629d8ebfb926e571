//! Type definitions for dy50

pub mod error;
pub mod params;
pub mod slot;

pub use error::{Error, Result};
pub use params::{PacketSize, SensorParameters, StatusRegister};
pub use slot::CharBuffer;
