//! # dy50-core
//!
//! Core protocol implementation for DY50 fingerprint sensor modules.
//!
//! This crate provides the low-level protocol primitives:
//! - Packet structure and encoding/decoding
//! - Checksum calculation
//! - Incremental frame reassembly
//! - Command catalog and confirmation codes

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod packet;
pub mod reassembler;
pub mod status;

pub use command::Command;
pub use error::{Error, Result};
pub use packet::{Packet, PacketType};
pub use reassembler::Reassembler;
pub use status::ConfirmationCode;
