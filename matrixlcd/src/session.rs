//! Device session: the public face of the driver.
//!
//! A [`DeviceSession`] ties the command encoder to a serial transport and,
//! when a [`KeyHandler`] is supplied, runs the keypad read loop next to the
//! caller's sends.
//!
//! ## Lifecycle
//!
//! ```text
//! Created --start--> Started --close--> Closed
//!                       ^                  |
//!                       +------start-------+
//! ```
//!
//! Sending outside `Started` fails with [`Error::NotConnected`].
//!
//! ## Concurrency
//!
//! The keypad thread reads from its own clone of the port handle while sends
//! go through the session's handle, so writes never wait on a pending read.
//! `close` stops the keypad thread and waits for it before the port is
//! released.

use std::mem;
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::display::segments;
use crate::error::{Error, Result};
use crate::keypad::{KeyHandler, KeyReader};
use crate::port::{Opener, Transport, TransportConfig};
use crate::protocol::{CommandCode, CommandFrame};

enum State {
    Created,
    Started(Connection),
    Closed,
}

struct Connection {
    config: TransportConfig,
    writer: Box<dyn Transport>,
    reader: Option<KeyReader>,
}

impl Connection {
    fn shutdown(mut self) {
        // Reader first, so no key callback can observe a closed port
        if let Some(mut reader) = self.reader.take() {
            reader.stop();
        }
        self.writer.close();
        debug!("Session on {} closed", self.config.port_name);
    }
}

/// A connection to one display.
pub struct DeviceSession {
    opener: Opener,
    state: State,
}

#[cfg(feature = "native")]
impl Default for DeviceSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceSession {
    /// Create a session that opens native serial ports.
    #[cfg(feature = "native")]
    pub fn new() -> Self {
        Self::with_opener(Box::new(crate::port::open))
    }

    /// Create a session that opens its transport through `opener`.
    pub fn with_opener(opener: Opener) -> Self {
        Self {
            opener,
            state: State::Created,
        }
    }

    /// Open `port` and, if `on_key` is given, start delivering key events.
    ///
    /// Returns whether the port was opened. Failures are logged; use
    /// [`DeviceSession::try_start`] for the error itself.
    pub fn start(
        &mut self,
        port: &str,
        baud_rate: u32,
        read_timeout: Duration,
        on_key: Option<Box<dyn KeyHandler>>,
    ) -> bool {
        let config = TransportConfig::new(port, baud_rate).with_read_timeout(read_timeout);
        match self.try_start(config, on_key) {
            Ok(()) => true,
            Err(e) => {
                warn!("{e}");
                false
            },
        }
    }

    /// Open the transport described by `config`.
    ///
    /// A session that is already started is closed first.
    pub fn try_start(
        &mut self,
        config: TransportConfig,
        on_key: Option<Box<dyn KeyHandler>>,
    ) -> Result<()> {
        self.close();

        let mut writer = (self.opener)(&config)?;

        let reader = match on_key {
            Some(handler) => {
                let spawned = writer
                    .try_clone()
                    .map_err(Error::from)
                    .and_then(|port| KeyReader::spawn(port, handler).map_err(Error::from));
                match spawned {
                    Ok(reader) => Some(reader),
                    Err(e) => {
                        writer.close();
                        return Err(e);
                    },
                }
            },
            None => None,
        };

        debug!(
            "Session started on {} at {} baud (keypad {})",
            config.port_name,
            config.baud_rate,
            if reader.is_some() { "on" } else { "off" }
        );

        self.state = State::Started(Connection {
            config,
            writer,
            reader,
        });
        Ok(())
    }

    /// Encode and send a command, returning how many bytes were transmitted.
    ///
    /// The count may be less than the frame length.
    pub fn write_command(&mut self, command: CommandCode, payload: &[u8]) -> Result<usize> {
        let frame = CommandFrame::encode(command, payload);
        self.write_frame(&frame)
    }

    /// Encode and send a command.
    ///
    /// Returns `true` if any byte of the frame was transmitted; a partial
    /// write still counts as sent. Use [`DeviceSession::write_command`] to see
    /// the actual count.
    pub fn send_command(&mut self, command: CommandCode, payload: &[u8]) -> Result<bool> {
        Ok(self.write_command(command, payload)? > 0)
    }

    /// Send a command given by its raw code.
    pub fn send_raw(&mut self, code: u8, payload: &[u8]) -> Result<bool> {
        let frame = CommandFrame::encode_raw(code, payload)?;
        Ok(self.write_frame(&frame)? > 0)
    }

    fn write_frame(&mut self, frame: &CommandFrame) -> Result<usize> {
        let conn = self.connection()?;
        let written = conn.writer.write(frame.as_bytes())?;
        if written < frame.len() {
            debug!(
                "Partial write of {}: {written}/{} bytes",
                frame.command(),
                frame.len()
            );
        }
        Ok(written)
    }

    /// Write literal text to the display.
    ///
    /// Text is not framed. With a non-zero `delay` the text is sent one
    /// screen at a time with `delay` between screens. Stops at the first
    /// screen that could not be written.
    pub fn display_text(&mut self, text: &[u8], delay: Duration) -> Result<bool> {
        let conn = self.connection()?;

        if delay.is_zero() {
            return Ok(conn.writer.write(text)? > 0);
        }

        for (index, segment) in segments(text).enumerate() {
            if index > 0 {
                thread::sleep(delay);
            }
            if conn.writer.write(segment)? == 0 {
                debug!("Text segment {index} was not written");
                return Ok(false);
            }
        }

        Ok(!text.is_empty())
    }

    /// Stop the keypad reader and release the port. Calling twice is a no-op.
    pub fn close(&mut self) {
        if let State::Started(conn) = mem::replace(&mut self.state, State::Closed) {
            conn.shutdown();
        }
    }

    /// Whether the session has an open connection.
    pub fn is_started(&self) -> bool {
        matches!(self.state, State::Started(_))
    }

    /// Configuration of the open connection.
    pub fn config(&self) -> Option<&TransportConfig> {
        match &self.state {
            State::Started(conn) => Some(&conn.config),
            State::Created | State::Closed => None,
        }
    }

    /// Name of the open port.
    pub fn port_name(&self) -> Option<&str> {
        self.config().map(|c| c.port_name.as_str())
    }

    fn connection(&mut self) -> Result<&mut Connection> {
        match &mut self.state {
            State::Started(conn) => Ok(conn),
            State::Created | State::Closed => Err(Error::NotConnected),
        }
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        self.close();
    }
}
