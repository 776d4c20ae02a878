//! # matrixlcd
//!
//! A driver for serial-attached character displays that speak the Matrix
//! Orbital style command set.
//!
//! This crate provides:
//!
//! - The command table (command byte and fixed argument length)
//! - Escape-framed command encoding (`0xFE`, command, arguments)
//! - A serial transport with a read-interval timeout
//! - A device session that sends commands and literal text and delivers
//!   keypad events to a handler on a background thread
//!
//! ## Features
//!
//! - `native` (default): Native serial port support via the `serialport` crate
//! - `serde`: Serialization support for [`CommandCode`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use matrixlcd::{CommandCode, DeviceSession, KeyHandler};
//!
//! # #[cfg(feature = "native")]
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut lcd = DeviceSession::new();
//!     let on_key: Box<dyn KeyHandler> = Box::new(|key: u8| println!("key {key}"));
//!
//!     if lcd.start("/dev/ttyUSB0", 19200, Duration::from_millis(500), Some(on_key)) {
//!         lcd.send_command(CommandCode::ClearScreen, &[])?;
//!         lcd.send_command(CommandCode::DisplayBacklightColour, &[0, 32, 255])?;
//!         lcd.display_text(b"Hello!", Duration::ZERO)?;
//!     }
//!
//!     lcd.close();
//!     Ok(())
//! }
//! # #[cfg(not(feature = "native"))]
//! # fn main() {}
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod display;
pub mod error;
pub mod keypad;
pub mod port;
pub mod protocol;
pub mod session;

// Re-exports for convenience
#[cfg(feature = "native")]
pub use port::native::NativePort;
pub use {
    display::{LCD_HEIGHT, LCD_WIDTH, SCREEN_CHARS, segments},
    error::{Error, Result, TransportError},
    keypad::KeyHandler,
    port::{
        DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT, Opener, Transport, TransportConfig,
        TransportResult,
    },
    protocol::{CommandCode, CommandFrame, ESCAPE, lookup},
    session::DeviceSession,
};
