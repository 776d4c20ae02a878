//! Serial transport abstraction.
//!
//! The transport owns the physical connection and knows nothing about the
//! command protocol. It provides:
//!
//! - blocking writes that report how many bytes actually went out
//! - reads bounded by a read-interval timeout, where a timeout is `Ok(0)`
//! - an idempotent `close`
//! - `try_clone`, used to hand an independent reader handle to the
//!   keypad thread so reads never wait on writes
//!
//! ```text
//! +------------------+
//! |  DeviceSession   |
//! +--------+---------+
//!          |
//!          v
//! +--------+---------+     +------------------+
//! | Transport trait  | <-- |  port::mock      |
//! +--------+---------+     |  (tests only)    |
//!          |               +------------------+
//!          v
//! +--------+---------+
//! |    NativePort    |
//! |   (serialport)   |
//! +------------------+
//! ```

#[cfg(feature = "native")]
pub mod native;

#[cfg(test)]
pub(crate) mod mock;

use std::time::Duration;

use crate::error::TransportError;

/// Result type for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Factory that opens a transport for a configuration.
pub type Opener = Box<dyn Fn(&TransportConfig) -> TransportResult<Box<dyn Transport>> + Send>;

/// Device default baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 19200;

/// Default read-interval timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Serial line configuration, fixed for the life of a connection.
///
/// The line itself is always 8 data bits, no parity, 1 stop bit and no flow
/// control; only the port, speed and read timeout vary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Port name/path (e.g., "/dev/ttyUSB0", "COM3").
    pub port_name: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Idle time after which a read returns with no data.
    pub read_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Create a new configuration with port name and baud rate.
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            ..Default::default()
        }
    }

    /// Set the read-interval timeout.
    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

/// An open serial connection.
///
/// Implementations never retry internally; every failure is returned to the
/// caller once.
pub trait Transport: Send {
    /// Port name/path.
    fn name(&self) -> &str;

    /// Write `bytes`, returning how many were actually transmitted.
    ///
    /// The count may be less than `bytes.len()`.
    fn write(&mut self, bytes: &[u8]) -> TransportResult<usize>;

    /// Read up to `buf.len()` bytes.
    ///
    /// Returns `Ok(0)` when the read-interval timeout elapses without data.
    fn read(&mut self, buf: &mut [u8]) -> TransportResult<usize>;

    /// Open a second handle to the same connection for concurrent reads.
    fn try_clone(&self) -> TransportResult<Box<dyn Transport>>;

    /// Release the connection. Closing twice is a no-op.
    fn close(&mut self);
}

/// Open the platform serial port for `config`.
#[cfg(feature = "native")]
pub fn open(config: &TransportConfig) -> TransportResult<Box<dyn Transport>> {
    Ok(Box::new(native::NativePort::open(config)?))
}

/// Open the platform serial port for `config`.
#[cfg(not(feature = "native"))]
pub fn open(config: &TransportConfig) -> TransportResult<Box<dyn Transport>> {
    Err(TransportError::open_failed(
        config.port_name.clone(),
        std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "serial ports are only available with the native feature",
        ),
    ))
}
