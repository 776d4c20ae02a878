//! Native serial port implementation using the `serialport` crate.
//!
//! This module provides the serial port implementation for native platforms
//! (Linux, macOS, Windows, FreeBSD, etc.).

use {
    crate::{
        error::TransportError,
        port::{Transport, TransportConfig, TransportResult},
    },
    log::{debug, trace},
    serialport::ClearBuffer,
    std::io::{self, Read, Write},
};

// The display only speaks 8N1 without flow control
const DATA_BITS: serialport::DataBits = serialport::DataBits::Eight;
const PARITY: serialport::Parity = serialport::Parity::None;
const STOP_BITS: serialport::StopBits = serialport::StopBits::One;
const FLOW_CONTROL: serialport::FlowControl = serialport::FlowControl::None;

/// Native serial port implementation.
pub struct NativePort {
    port: Option<Box<dyn serialport::SerialPort>>,
    name: String,
}

impl NativePort {
    /// Open and configure a serial port.
    ///
    /// Any failure while applying line settings is reported as
    /// [`TransportError::OpenFailed`]; a half-configured port is never returned.
    pub fn open(config: &TransportConfig) -> TransportResult<Self> {
        let port = serialport::new(&config.port_name, config.baud_rate)
            .timeout(config.read_timeout)
            .data_bits(DATA_BITS)
            .parity(PARITY)
            .stop_bits(STOP_BITS)
            .flow_control(FLOW_CONTROL)
            .open()
            .map_err(|e| TransportError::open_failed(config.port_name.clone(), e))?;

        port.clear(ClearBuffer::All)
            .map_err(|e| TransportError::open_failed(config.port_name.clone(), e))?;

        debug!(
            "Opened {} at {} baud (read timeout {:?})",
            config.port_name, config.baud_rate, config.read_timeout
        );

        Ok(Self {
            port: Some(port),
            name: config
                .port_name
                .clone(),
        })
    }

    fn inner(&mut self) -> TransportResult<&mut Box<dyn serialport::SerialPort>> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "port closed").into())
    }
}

impl Transport for NativePort {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, bytes: &[u8]) -> TransportResult<usize> {
        let port = self.inner()?;
        let written = match port.write(bytes) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => 0,
            Err(e) => return Err(e.into()),
        };
        port.flush()?;
        trace!("TX {written}/{} bytes: {:02X?}", bytes.len(), &bytes[..written]);
        Ok(written)
    }

    fn read(&mut self, buf: &mut [u8]) -> TransportResult<usize> {
        match self.inner()?.read(buf) {
            Ok(n) => Ok(n),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(0)
            },
            Err(e) => Err(e.into()),
        }
    }

    fn try_clone(&self) -> TransportResult<Box<dyn Transport>> {
        let port = self
            .port
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "port closed"))?
            .try_clone()
            .map_err(io::Error::from)?;

        Ok(Box::new(Self {
            port: Some(port),
            name: self.name.clone(),
        }))
    }

    fn close(&mut self) {
        // Dropping the handle closes it
        if self.port.take().is_some() {
            debug!("Closed {}", self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_port_is_open_failed() {
        let config = TransportConfig::new("/dev/matrixlcd-does-not-exist", 19200);
        match NativePort::open(&config) {
            Err(TransportError::OpenFailed { port, .. }) => {
                assert_eq!(port, "/dev/matrixlcd-does-not-exist");
            },
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("opening a missing port should fail"),
        }
    }

    #[test]
    fn test_line_is_8n1_without_flow_control() {
        assert_eq!(DATA_BITS, serialport::DataBits::Eight);
        assert_eq!(PARITY, serialport::Parity::None);
        assert_eq!(STOP_BITS, serialport::StopBits::One);
        assert_eq!(FLOW_CONTROL, serialport::FlowControl::None);
    }
}
