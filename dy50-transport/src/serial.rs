//! Serial port transport

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::{debug, trace, warn};

use dy50_core::constants::MAX_FRAME_SIZE;

use crate::{Transport, error::*};

/// Serial transport for DY50 modules
///
/// The module talks 8 data bits, no parity, one stop bit, no flow control.
pub struct SerialTransport {
    port: String,
    baud: u32,
    stream: Option<SerialStream>,
}

impl SerialTransport {
    /// Create a transport for the given port path and baud rate
    pub fn new(port: impl Into<String>, baud: u32) -> Self {
        Self {
            port: port.into(),
            baud,
            stream: None,
        }
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        debug!("Opening {} at {} baud...", self.port, self.baud);

        let stream = tokio_serial::new(&self.port, self.baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open_native_async()
            .map_err(|source| Error::Open {
                port: self.port.clone(),
                source,
            })?;

        debug!("Opened {}", self.port);

        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.stream.take().is_some() {
            debug!("Closed {}", self.port);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes: {:02X?}", data.len(), data);

        stream.write_all(data).await?;
        stream.flush().await?;

        Ok(())
    }

    async fn receive(&mut self, window: Duration) -> Result<BytesMut> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let mut buf = BytesMut::with_capacity(MAX_FRAME_SIZE);

        let n = timeout(window, stream.read_buf(&mut buf))
            .await
            .map_err(|_| Error::ReadTimeout)??;

        if n == 0 {
            return Err(Error::PortClosed);
        }

        trace!("Received {} bytes: {:02X?}", n, &buf[..n]);

        Ok(buf)
    }

    fn endpoint(&self) -> String {
        format!("{}@{}", self.port, self.baud)
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!("Serial transport dropped while still open");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_transport_create() {
        let transport = SerialTransport::new("/dev/ttyUSB0", 57_600);

        assert!(!transport.is_connected());
        assert_eq!(transport.endpoint(), "/dev/ttyUSB0@57600");
    }

    #[tokio::test]
    async fn test_send_requires_open_port() {
        let mut transport = SerialTransport::new("/dev/ttyUSB0", 57_600);

        assert!(matches!(
            transport.send(&[0x01]).await,
            Err(Error::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_receive_requires_open_port() {
        let mut transport = SerialTransport::new("/dev/ttyUSB0", 57_600);

        assert!(matches!(
            transport.receive(Duration::from_millis(10)).await,
            Err(Error::NotConnected)
        ));
    }

    // Note: open/close tests require a real serial port
    // #[tokio::test]
    // async fn test_serial_transport_connect() {
    //     let mut transport = SerialTransport::new("/dev/ttyUSB0", 57_600);
    //     transport.connect().await.unwrap();
    //     assert!(transport.is_connected());
    //     transport.disconnect().await.unwrap();
    //     assert!(!transport.is_connected());
    // }
}
