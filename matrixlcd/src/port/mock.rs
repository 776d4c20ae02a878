//! In-memory transport for tests.
//!
//! All handles cloned from one [`MockPort`] share the same state, so a test
//! can queue inbound bytes, inspect what was written and see how many times
//! the connection was closed.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::error::TransportError;
use crate::port::{Opener, Transport, TransportConfig, TransportResult};

/// Send library logs to the test harness so they show up for failing tests.
pub(crate) fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}

#[derive(Debug, Default)]
struct MockState {
    inbound: VecDeque<Vec<u8>>,
    written: Vec<Vec<u8>>,
    write_limit: Option<usize>,
    disconnected: bool,
    closes: usize,
    opened: Vec<TransportConfig>,
}

/// Shared handle used by tests to drive and observe mock ports.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockLine {
    state: Arc<Mutex<MockState>>,
}

impl MockLine {
    pub(crate) fn new() -> Self {
        init_logging();
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Queue bytes that the next read returns as one chunk.
    pub(crate) fn push_inbound(&self, bytes: &[u8]) {
        self.lock().inbound.push_back(bytes.to_vec());
    }

    /// Limit every write to at most `limit` bytes.
    pub(crate) fn set_write_limit(&self, limit: usize) {
        self.lock().write_limit = Some(limit);
    }

    /// Make reads and writes fail as if the cable was pulled.
    pub(crate) fn disconnect(&self) {
        self.lock().disconnected = true;
    }

    /// Every write call, in order.
    pub(crate) fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().written.clone()
    }

    /// All written bytes concatenated.
    pub(crate) fn written_bytes(&self) -> Vec<u8> {
        self.lock().written.concat()
    }

    pub(crate) fn closes(&self) -> usize {
        self.lock().closes
    }

    pub(crate) fn opened(&self) -> Vec<TransportConfig> {
        self.lock().opened.clone()
    }

    /// Opener that hands out ports on this line.
    pub(crate) fn opener(&self) -> Opener {
        let line = self.clone();
        Box::new(move |config: &TransportConfig| {
            line.lock().opened.push(config.clone());
            Ok(Box::new(MockPort {
                line: line.clone(),
                name: config.port_name.clone(),
                read_timeout: config.read_timeout,
                open: true,
            }) as Box<dyn Transport>)
        })
    }

    /// Opener that always fails to open.
    pub(crate) fn failing_opener() -> Opener {
        Box::new(|config: &TransportConfig| {
            Err(TransportError::open_failed(
                config.port_name.clone(),
                io::Error::new(io::ErrorKind::NotFound, "no such port"),
            ))
        })
    }
}

pub(crate) struct MockPort {
    line: MockLine,
    name: String,
    read_timeout: Duration,
    open: bool,
}

impl MockPort {
    fn check(&self) -> TransportResult<()> {
        if !self.open {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "port closed").into());
        }
        if self.line.lock().disconnected {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged").into());
        }
        Ok(())
    }
}

impl Transport for MockPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, bytes: &[u8]) -> TransportResult<usize> {
        self.check()?;
        let mut state = self.line.lock();
        let n = state.write_limit.map_or(bytes.len(), |limit| limit.min(bytes.len()));
        state.written.push(bytes[..n].to_vec());
        Ok(n)
    }

    fn read(&mut self, buf: &mut [u8]) -> TransportResult<usize> {
        self.check()?;
        let chunk = self.line.lock().inbound.pop_front();
        match chunk {
            Some(chunk) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    self.line.lock().inbound.push_front(chunk[n..].to_vec());
                }
                Ok(n)
            },
            None => {
                thread::sleep(self.read_timeout);
                Ok(0)
            },
        }
    }

    fn try_clone(&self) -> TransportResult<Box<dyn Transport>> {
        self.check()?;
        Ok(Box::new(Self {
            line: self.line.clone(),
            name: self.name.clone(),
            read_timeout: self.read_timeout,
            open: true,
        }))
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.line.lock().closes += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_repeatable() {
        init_logging();
        init_logging();
        log::trace!("logging ready");
    }
}
