//! Error types for matrixlcd.

use std::io;
use thiserror::Error;

/// Result type for matrixlcd operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for matrixlcd operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Command byte is not part of the supported command table.
    #[error("Invalid command code: {0} ({0:#04x})")]
    InvalidCommand(u8),

    /// Serial transport failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Operation attempted before `start` or after `close`.
    #[error("Display is not connected")]
    NotConnected,
}

/// Failures raised by the serial transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The port could not be opened or its line settings could not be applied.
    #[error("Failed to open serial port {port}: {source}")]
    OpenFailed {
        /// Port name/path that was requested.
        port: String,
        /// Underlying platform error.
        #[source]
        source: io::Error,
    },

    /// Hard read or write failure (device unplugged, handle invalidated).
    #[error("Serial I/O failure: {0}")]
    IoFailure(#[from] io::Error),
}

impl TransportError {
    /// Build an `OpenFailed` error for `port`.
    pub fn open_failed(port: impl Into<String>, source: impl Into<io::Error>) -> Self {
        Self::OpenFailed {
            port: port.into(),
            source: source.into(),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Transport(TransportError::IoFailure(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_command_message() {
        let err = Error::InvalidCommand(0x10);
        assert_eq!(err.to_string(), "Invalid command code: 16 (0x10)");
    }

    #[test]
    fn test_io_error_maps_to_io_failure() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "unplugged").into();
        assert!(matches!(
            err,
            Error::Transport(TransportError::IoFailure(_))
        ));
    }

    #[test]
    fn test_open_failed_names_port() {
        let err = TransportError::open_failed(
            "/dev/ttyACM0",
            io::Error::new(io::ErrorKind::NotFound, "no such device"),
        );
        assert!(err.to_string().contains("/dev/ttyACM0"));
    }
}
