//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Link not open")]
    NotConnected,

    #[error("Link already open")]
    AlreadyConnected,

    #[error("Read timeout")]
    ReadTimeout,

    #[error("Serial port closed")]
    PortClosed,

    #[error("Failed to open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: tokio_serial::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
