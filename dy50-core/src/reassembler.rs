//! Incremental frame reassembly
//!
//! Serial drivers hand bytes over in arbitrary chunks, down to one byte at a
//! time. [`Reassembler`] accumulates them and yields a checksum-verified
//! [`Packet`] the moment a complete frame has been buffered. Completion is
//! byte-count driven: once the nine header bytes are in, the length field
//! fixes the total frame size, and the frame closes exactly when that many
//! bytes have arrived. The start code is checked only when the finished
//! frame is decoded; it is never used to hunt for frame boundaries.
//!
//! The length field travels on the wire, so a single bit error can declare a
//! frame that will never complete. The buffer is therefore bounded: a
//! declared frame that cannot fit is rejected, the partial frame is
//! discarded, and the state machine returns to idle, ready for the next
//! well-formed frame. The elapsed-time half of that watchdog belongs to the
//! command layer, which resets the buffer when its response deadline
//! expires.

use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::constants::{CHECKSUM_SIZE, HEADER_SIZE, MAX_FRAME_SIZE};
use crate::error::{Error, Result};
use crate::packet::Packet;

/// Reassembly progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No bytes buffered
    Idle,

    /// Buffering the fixed header; total frame size still unknown
    AccumulatingHeader,

    /// Header complete; waiting for the declared remainder of the frame
    AccumulatingPayload { total: usize },
}

/// Byte-at-a-time frame reassembler
///
/// One instance exists per link. It is reset at the start of every
/// request/response cycle and after every framing failure, so a completed
/// packet can only ever belong to the request currently in flight.
///
/// # Examples
///
/// ```
/// use dy50_core::{Packet, Reassembler};
/// use dy50_core::constants::BROADCAST_ADDRESS;
///
/// let frame = Packet::command(BROADCAST_ADDRESS, vec![0x1D]).unwrap().encode();
///
/// let mut reassembler = Reassembler::new();
/// let mut completed = None;
/// for &byte in frame.iter() {
///     completed = reassembler.push(byte).unwrap();
/// }
/// assert!(completed.is_some());
/// ```
#[derive(Debug)]
pub struct Reassembler {
    state: State,
    buf: BytesMut,
    capacity: usize,
}

impl Reassembler {
    /// Reassembler sized for the largest frame the protocol allows
    pub fn new() -> Self {
        Self::with_capacity(MAX_FRAME_SIZE)
    }

    /// Reassembler that rejects frames larger than `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: State::Idle,
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Feed one received byte
    ///
    /// Returns `Ok(Some(packet))` when this byte completes a valid frame and
    /// `Ok(None)` while more bytes are needed. Delivering a frame byte by
    /// byte or all at once is equivalent.
    ///
    /// # Errors
    ///
    /// Any framing failure (length field below its minimum, declared frame
    /// exceeding capacity, checksum or start-code mismatch on the finished
    /// frame) discards the buffer and returns the machine to idle; the next
    /// byte starts a fresh frame.
    pub fn push(&mut self, byte: u8) -> Result<Option<Packet>> {
        self.buf.put_u8(byte);

        match self.state {
            State::Idle => {
                self.state = State::AccumulatingHeader;
                Ok(None)
            }
            State::AccumulatingHeader => {
                if self.buf.len() < HEADER_SIZE {
                    return Ok(None);
                }

                let declared = u16::from_be_bytes([self.buf[7], self.buf[8]]);
                if (declared as usize) < CHECKSUM_SIZE {
                    self.reset();
                    return Err(Error::InvalidPayloadLength {
                        declared,
                        min: CHECKSUM_SIZE as u16,
                    });
                }

                let total = HEADER_SIZE + declared as usize;
                if total > self.capacity {
                    self.reset();
                    return Err(Error::FrameTooLarge {
                        declared: total,
                        capacity: self.capacity,
                    });
                }

                trace!(total, "Length field received");
                self.state = State::AccumulatingPayload { total };
                Ok(None)
            }
            State::AccumulatingPayload { total } => {
                if self.buf.len() < total {
                    return Ok(None);
                }

                let frame = self.buf.split();
                self.state = State::Idle;
                trace!(frame = hex::encode(&frame), "Frame complete");

                Packet::decode(frame).map(Some)
            }
        }
    }

    /// Discard any partial frame and return to idle
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = State::Idle;
    }

    /// Check if no partial frame is buffered
    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new()
    }
}
