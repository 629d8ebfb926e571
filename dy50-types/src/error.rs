//! Error types for dy50-types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Response payload does not have the documented fixed size
    #[error("Unexpected payload length: expected {expected} bytes, got {actual}")]
    UnexpectedLength {
        expected: usize,
        actual: usize,
    },

    /// Field value outside its documented range
    #[error("Parse error: {0}")]
    Parse(String),

    /// Argument outside its documented range
    #[error("Validation error: {0}")]
    Validation(String),
}
