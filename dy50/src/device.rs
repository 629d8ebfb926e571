//! High-level device interface

use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, info, trace, warn};

use dy50_core::constants::BROADCAST_ADDRESS;
use dy50_core::{Command, ConfirmationCode, Packet, Reassembler};
use dy50_transport::{SerialTransport, Transport};
use dy50_types::{CharBuffer, SensorParameters};

use crate::error::{Error, Result};

/// Factory baud rate of DY50 modules
pub const DEFAULT_BAUD: u32 = 57_600;

/// Default ceiling on the wait for a response
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1_000);

/// Search verdict
///
/// Only a match carries a library page and confidence score; any other
/// confirmation travels without them, so a failed search can never be
/// mistaken for a hit on some page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The probed feature slot matched a stored template
    Match {
        /// Library page of the matching template
        page: u16,
        /// Match confidence; higher is more confident
        confidence: u16,
    },

    /// No match; the code says why (`NotFound` in the ordinary case)
    Miss(ConfirmationCode),
}

/// DY50 fingerprint sensor
///
/// One command is outstanding at a time: each method sends a single command
/// packet and suspends until the module's acknowledge arrives or the
/// watchdog deadline passes. The protocol is half-duplex by construction,
/// so there is no pipelining to manage.
///
/// # Examples
///
/// ```no_run
/// use dy50::{CharBuffer, Device};
///
/// #[tokio::main]
/// async fn main() -> dy50::Result<()> {
///     let mut sensor = Device::open("/dev/ttyUSB0");
///     sensor.connect().await?;
///
///     let code = sensor.get_image().await?;
///     println!("capture: {code}");
///
///     sensor.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Device {
    transport: Box<dyn Transport>,
    reassembler: Reassembler,
    address: u32,
    password: u32,
    timeout: Duration,
}

impl Device {
    /// Device on a serial port at the factory baud rate
    pub fn open(port: impl Into<String>) -> Self {
        Self::with_transport(Box::new(SerialTransport::new(port, DEFAULT_BAUD)))
    }

    /// Device on a serial port at a specific baud rate
    pub fn open_at(port: impl Into<String>, baud: u32) -> Self {
        Self::with_transport(Box::new(SerialTransport::new(port, baud)))
    }

    /// Device over any transport
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            reassembler: Reassembler::new(),
            address: BROADCAST_ADDRESS,
            password: 0,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the response timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the handshake password (default: 0)
    pub fn with_password(mut self, password: u32) -> Self {
        self.password = password;
        self
    }

    /// Address a specific module instead of broadcasting
    pub fn with_address(mut self, address: u32) -> Self {
        self.address = address;
        self
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Open the link and verify the handshake password
    ///
    /// # Errors
    ///
    /// Returns [`Error::Handshake`] when the module rejects the password.
    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to {}...", self.transport.endpoint());

        self.transport.connect().await?;

        let code = self.verify_password(self.password).await?;
        if !code.is_ok() {
            return Err(Error::Handshake(code));
        }

        info!("Connected to {}", self.transport.endpoint());
        Ok(())
    }

    /// Close the link
    pub async fn disconnect(&mut self) -> Result<()> {
        self.reassembler.reset();
        self.transport.disconnect().await?;

        info!("Disconnected");
        Ok(())
    }

    /// Capture a finger image into the module's image buffer
    ///
    /// `NoFinger` is the ordinary idle answer; capture loops poll until the
    /// code is `Ok`.
    pub async fn get_image(&mut self) -> Result<ConfirmationCode> {
        self.confirm(Command::GetImage).await
    }

    /// Distill the captured image into a feature slot
    pub async fn extract_features(&mut self, slot: CharBuffer) -> Result<ConfirmationCode> {
        self.confirm(Command::ExtractFeatures { slot: slot.id() }).await
    }

    /// Merge both feature slots into a single template
    ///
    /// `EnrollMismatch` reports that the two captures are not the same
    /// finger.
    pub async fn merge_template(&mut self) -> Result<ConfirmationCode> {
        self.confirm(Command::MergeTemplate).await
    }

    /// Store the merged template at a library page
    pub async fn store_template(&mut self, slot: CharBuffer, page: u16) -> Result<ConfirmationCode> {
        self.confirm(Command::StoreTemplate { slot: slot.id(), page }).await
    }

    /// Load a stored template back into a feature slot
    pub async fn load_template(&mut self, slot: CharBuffer, page: u16) -> Result<ConfirmationCode> {
        self.confirm(Command::LoadTemplate { slot: slot.id(), page }).await
    }

    /// Ask the module to stream a feature slot back to the host
    pub async fn upload_template(&mut self, slot: CharBuffer) -> Result<ConfirmationCode> {
        self.confirm(Command::UploadTemplate { slot: slot.id() }).await
    }

    /// Delete `count` templates starting at `page`
    pub async fn delete_templates(&mut self, page: u16, count: u16) -> Result<ConfirmationCode> {
        self.confirm(Command::DeleteTemplates { page, count }).await
    }

    /// Clear the whole template library
    pub async fn empty_library(&mut self) -> Result<ConfirmationCode> {
        self.confirm(Command::EmptyLibrary).await
    }

    /// Switch the onboard LED
    pub async fn led(&mut self, on: bool) -> Result<ConfirmationCode> {
        self.confirm(if on { Command::LedOn } else { Command::LedOff }).await
    }

    /// Set the 4-byte handshake password
    pub async fn set_password(&mut self, password: u32) -> Result<ConfirmationCode> {
        self.confirm(Command::SetPassword { password }).await
    }

    /// Verify the 4-byte handshake password
    pub async fn verify_password(&mut self, password: u32) -> Result<ConfirmationCode> {
        self.confirm(Command::VerifyPassword { password }).await
    }

    /// Number of templates stored in the library
    pub async fn template_count(&mut self) -> Result<u16> {
        let payload = self.execute(Command::TemplateCount).await?;
        let (code, rest) = split_status(&payload)?;

        if !code.is_ok() {
            return Err(Error::Device(code));
        }
        if rest.len() < 2 {
            return Err(Error::InvalidResponse(format!(
                "template count payload of {} bytes",
                payload.len()
            )));
        }

        Ok(u16::from_be_bytes([rest[0], rest[1]]))
    }

    /// Read the module's system parameter block
    pub async fn read_parameters(&mut self) -> Result<SensorParameters> {
        let payload = self.execute(Command::ReadParameters).await?;
        let (code, rest) = split_status(&payload)?;

        if !code.is_ok() {
            return Err(Error::Device(code));
        }

        let params = SensorParameters::parse(rest)?;
        debug!("Parameters: {params}");

        Ok(params)
    }

    /// Match a feature slot against the whole library
    pub async fn search(&mut self, slot: CharBuffer) -> Result<SearchOutcome> {
        let capacity = self.read_parameters().await?.capacity;
        self.search_range(slot, 0, capacity).await
    }

    /// Match a feature slot against `count` library pages starting at `start`
    pub async fn search_range(
        &mut self,
        slot: CharBuffer,
        start: u16,
        count: u16,
    ) -> Result<SearchOutcome> {
        let payload = self.execute(Command::Search { slot: slot.id(), start, count }).await?;
        let (code, rest) = split_status(&payload)?;

        if !code.is_ok() {
            // Bytes past the status byte carry nothing on a miss
            return Ok(SearchOutcome::Miss(code));
        }
        if rest.len() < 4 {
            return Err(Error::InvalidResponse(format!(
                "search response payload of {} bytes",
                payload.len()
            )));
        }

        Ok(SearchOutcome::Match {
            page: u16::from_be_bytes([rest[0], rest[1]]),
            confidence: u16::from_be_bytes([rest[2], rest[3]]),
        })
    }

    /// Run a command whose response is a bare confirmation
    async fn confirm(&mut self, command: Command) -> Result<ConfirmationCode> {
        let payload = self.execute(command).await?;
        let (code, _) = split_status(&payload)?;

        Ok(code)
    }

    /// Send one command packet and wait for its acknowledge payload
    ///
    /// The reassembler is reset before every send, so a completed packet can
    /// only belong to this request. Completed packets that are not
    /// acknowledges are discarded and the wait continues. On deadline expiry
    /// the partial frame is discarded as well; the link is clean for the
    /// next command.
    async fn execute(&mut self, command: Command) -> Result<Bytes> {
        self.ensure_connected()?;
        self.reassembler.reset();

        let packet = Packet::command(self.address, command.encode_payload().freeze())?;
        debug!("Executing {command}");
        self.transport.send(&packet.encode()).await?;

        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                self.reassembler.reset();
                return Err(Error::Timeout { after: self.timeout });
            }

            let chunk = match self.transport.receive(remaining).await {
                Ok(chunk) => chunk,
                Err(dy50_transport::Error::ReadTimeout) => {
                    self.reassembler.reset();
                    return Err(Error::Timeout { after: self.timeout });
                }
                Err(err) => return Err(err.into()),
            };

            for &byte in chunk.iter() {
                match self.reassembler.push(byte)? {
                    Some(reply) if reply.is_ack() => {
                        trace!("Received: {reply:?}");
                        return Ok(reply.payload);
                    }
                    Some(reply) => {
                        warn!(
                            "Discarding unexpected {} packet while awaiting acknowledge",
                            reply.packet_type
                        );
                    }
                    None => {}
                }
            }
        }
    }

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }
}

fn split_status(payload: &[u8]) -> Result<(ConfirmationCode, &[u8])> {
    match payload.split_first() {
        Some((&code, rest)) => Ok((ConfirmationCode::from(code), rest)),
        None => Err(Error::InvalidResponse("empty acknowledge payload".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::BytesMut;
    use dy50_core::PacketType;
    use dy50_transport as transport;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    type SendLog = Arc<Mutex<Vec<Vec<u8>>>>;

    /// Transport that replays scripted receive results and records sends
    struct ScriptedTransport {
        connected: bool,
        sent: SendLog,
        chunks: VecDeque<transport::Result<Vec<u8>>>,
    }

    impl ScriptedTransport {
        fn new() -> (Self, SendLog) {
            let log = SendLog::default();
            let scripted = Self {
                connected: true,
                sent: log.clone(),
                chunks: VecDeque::new(),
            };
            (scripted, log)
        }

        /// Queue an acknowledge frame carrying `payload`, as one chunk
        fn ack(&mut self, payload: &[u8]) {
            let frame = Packet::new(BROADCAST_ADDRESS, PacketType::Ack, payload.to_vec())
                .unwrap()
                .encode();
            self.chunks.push_back(Ok(frame.to_vec()));
        }

        /// Queue an acknowledge frame delivered one byte per receive call
        fn ack_byte_by_byte(&mut self, payload: &[u8]) {
            let frame = Packet::new(BROADCAST_ADDRESS, PacketType::Ack, payload.to_vec())
                .unwrap()
                .encode();
            for &byte in frame.iter() {
                self.chunks.push_back(Ok(vec![byte]));
            }
        }

        /// Queue a non-acknowledge frame
        fn data(&mut self, payload: &[u8]) {
            let frame = Packet::new(BROADCAST_ADDRESS, PacketType::Data, payload.to_vec())
                .unwrap()
                .encode();
            self.chunks.push_back(Ok(frame.to_vec()));
        }

        fn read_timeout(&mut self) {
            self.chunks.push_back(Err(transport::Error::ReadTimeout));
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn connect(&mut self) -> transport::Result<()> {
            self.connected = true;
            Ok(())
        }

        async fn disconnect(&mut self) -> transport::Result<()> {
            self.connected = false;
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn send(&mut self, data: &[u8]) -> transport::Result<()> {
            self.sent.lock().unwrap().push(data.to_vec());
            Ok(())
        }

        async fn receive(&mut self, _timeout: Duration) -> transport::Result<BytesMut> {
            match self.chunks.pop_front() {
                Some(Ok(bytes)) => Ok(BytesMut::from(&bytes[..])),
                Some(Err(err)) => Err(err),
                None => Err(transport::Error::ReadTimeout),
            }
        }

        fn endpoint(&self) -> String {
            "scripted".into()
        }
    }

    fn device_with(scripted: ScriptedTransport) -> Device {
        Device::with_transport(Box::new(scripted))
    }

    #[tokio::test]
    async fn test_template_count_request_and_decode() {
        let (mut scripted, sent) = ScriptedTransport::new();
        scripted.ack(&[0x00, 0x00, 0x05]);

        let mut device = device_with(scripted);
        let count = device.template_count().await.unwrap();

        assert_eq!(count, 5);
        assert_eq!(
            sent.lock().unwrap()[0],
            vec![0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x03, 0x1D, 0x00, 0x21]
        );
    }

    #[tokio::test]
    async fn test_template_count_refusal_carries_the_code() {
        let (mut scripted, _sent) = ScriptedTransport::new();
        scripted.ack(&[0x01]);

        let mut device = device_with(scripted);

        assert!(matches!(
            device.template_count().await,
            Err(Error::Device(ConfirmationCode::PacketReceiveError))
        ));
    }

    #[tokio::test]
    async fn test_response_delivered_one_byte_at_a_time() {
        let (mut scripted, _sent) = ScriptedTransport::new();
        scripted.ack_byte_by_byte(&[0x00, 0x00, 0x07]);

        let mut device = device_with(scripted);

        assert_eq!(device.template_count().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_search_miss_exposes_only_the_code() {
        let (mut scripted, _sent) = ScriptedTransport::new();
        scripted.ack(&[0x09]);

        let mut device = device_with(scripted);
        let outcome = device.search_range(CharBuffer::One, 0, 200).await.unwrap();

        assert_eq!(outcome, SearchOutcome::Miss(ConfirmationCode::NotFound));
    }

    #[tokio::test]
    async fn test_search_match_decodes_page_and_confidence() {
        let (mut scripted, _sent) = ScriptedTransport::new();
        scripted.ack(&[0x00, 0x00, 0x02, 0x00, 0x63]);

        let mut device = device_with(scripted);
        let outcome = device.search_range(CharBuffer::One, 0, 200).await.unwrap();

        assert_eq!(outcome, SearchOutcome::Match { page: 2, confidence: 99 });
    }

    #[tokio::test]
    async fn test_read_parameters() {
        let (mut scripted, _sent) = ScriptedTransport::new();
        scripted.ack(&[
            0x00, // status: ok
            0x00, 0x00, 0x00, 0x09, 0x00, 0xC8, 0x00, 0x03, // reg, id, capacity, security
            0xFF, 0xFF, 0xFF, 0xFF, // address
            0x00, 0x01, // packet size code 1 -> 64
            0x00, 0x06, // baud multiplier -> 57600
        ]);

        let mut device = device_with(scripted);
        let params = device.read_parameters().await.unwrap();

        assert_eq!(params.capacity, 200);
        assert_eq!(params.packet_size.in_bytes(), 64);
        assert_eq!(params.baud_rate, 57_600);
    }

    #[tokio::test]
    async fn test_timeout_leaves_the_link_usable() {
        let (mut scripted, _sent) = ScriptedTransport::new();
        scripted.read_timeout();
        scripted.ack(&[0x00]);

        let mut device = device_with(scripted);

        assert!(matches!(
            device.get_image().await,
            Err(Error::Timeout { .. })
        ));

        // The next command on the same transport succeeds normally
        assert_eq!(device.get_image().await.unwrap(), ConfirmationCode::Ok);
    }

    #[tokio::test]
    async fn test_non_ack_packets_are_discarded() {
        let (mut scripted, _sent) = ScriptedTransport::new();
        scripted.data(&[0xAA, 0xBB]);
        scripted.ack(&[0x00]);

        let mut device = device_with(scripted);

        assert_eq!(device.get_image().await.unwrap(), ConfirmationCode::Ok);
    }

    #[tokio::test]
    async fn test_connect_verifies_the_password() {
        let (mut scripted, sent) = ScriptedTransport::new();
        scripted.ack(&[0x00]);

        let mut device = device_with(scripted);
        device.connect().await.unwrap();

        // Verify-password command for the default password 0
        assert_eq!(
            sent.lock().unwrap()[0],
            vec![
                0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x07, 0x13, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x1B
            ]
        );
    }

    #[tokio::test]
    async fn test_connect_rejects_a_wrong_password() {
        let (mut scripted, _sent) = ScriptedTransport::new();
        scripted.ack(&[0x13]);

        let mut device = device_with(scripted);

        assert!(matches!(
            device.connect().await,
            Err(Error::Handshake(ConfirmationCode::WrongPassword))
        ));
    }

    #[tokio::test]
    async fn test_commands_require_a_connection() {
        let (mut scripted, _sent) = ScriptedTransport::new();
        scripted.connected = false;

        let mut device = device_with(scripted);

        assert!(matches!(
            device.get_image().await,
            Err(Error::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_led_control_opcodes() {
        let (mut scripted, sent) = ScriptedTransport::new();
        scripted.ack(&[0x00]);
        scripted.ack(&[0x00]);

        let mut device = device_with(scripted);
        device.led(true).await.unwrap();
        device.led(false).await.unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0][9], 0x50);
        assert_eq!(sent[1][9], 0x51);
    }
}
