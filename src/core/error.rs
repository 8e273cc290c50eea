use std::io;
use thiserror::Error;

/// Custom error types for the telemetry encoder
#[derive(Error, Debug)]
pub enum Error {
    /// Datagram sink or socket failure
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Data type with no entry in the data-type-version table
    #[error("Configuration error: unsupported data type {0}")]
    UnsupportedDataType(u8),

    /// A field value that does not fit its wire width
    #[error("Range error: {field} value {value} does not fit in {bits} bits")]
    Range {
        field: &'static str,
        value: i128,
        bits: u32,
    },

    #[error("Timing error: {0}")]
    Timing(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Creates a new range error
    pub fn range(field: &'static str, value: impl Into<i128>, bits: u32) -> Self {
        Error::Range {
            field,
            value: value.into(),
            bits,
        }
    }

    /// Creates a new timing error
    pub fn timing(msg: impl Into<String>) -> Self {
        Error::Timing(msg.into())
    }

    /// Creates a new invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Error::InvalidState(msg.into())
    }

    /// Returns true for errors raised by the datagram sink
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("bad port");
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: bad port");
    }

    #[test]
    fn test_range_error_message() {
        let err = Error::range("relative_time_counter", 1u64 << 48, 48);
        assert_eq!(
            err.to_string(),
            "Range error: relative_time_counter value 281474976710656 does not fit in 48 bits"
        );
    }

    #[test]
    fn test_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::Other, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_transport());
        assert!(!Error::UnsupportedDataType(7).is_transport());
    }
}
