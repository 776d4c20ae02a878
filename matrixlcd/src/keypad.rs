//! Keypad input: the background read loop and the handler it reports to.
//!
//! The display sends each key press as a single raw byte. Once a session is
//! started with a handler, a dedicated thread polls its own clone of the
//! transport and forwards every byte, in arrival order, to
//! [`KeyHandler::on_key`].

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use log::{debug, trace, warn};

use crate::error::TransportError;
use crate::port::Transport;

/// Receiver for key events coming from the display.
pub trait KeyHandler: Send {
    /// Called once per key byte, in the order the bytes arrived.
    fn on_key(&mut self, key: u8);

    /// Called at most once when the read loop stops because of a transport
    /// failure. Not called for a normal `close`.
    fn on_disconnect(&mut self, error: &TransportError) {
        let _ = error;
    }
}

impl<F> KeyHandler for F
where
    F: FnMut(u8) + Send,
{
    fn on_key(&mut self, key: u8) {
        self(key);
    }
}

/// Running keypad read loop.
///
/// Stopping (explicitly or on drop) waits for the thread to exit, so no
/// handler call can happen once [`KeyReader::stop`] has returned.
pub(crate) struct KeyReader {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl KeyReader {
    /// Spawn the read loop on `transport`.
    pub(crate) fn spawn(
        mut transport: Box<dyn Transport>,
        mut handler: Box<dyn KeyHandler>,
    ) -> io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let running_reader = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("matrixlcd-keypad".to_string())
            .spawn(move || {
                read_loop(transport.as_mut(), handler.as_mut(), &running_reader);
                transport.close();
            })?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Signal the loop to stop and wait for it. Calling twice is a no-op.
    pub(crate) fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Keypad reader thread panicked");
            }
            debug!("Keypad reader stopped");
        }
    }
}

impl Drop for KeyReader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn read_loop(transport: &mut dyn Transport, handler: &mut dyn KeyHandler, running: &AtomicBool) {
    let mut buf = [0u8; 64];

    while running.load(Ordering::Acquire) {
        match transport.read(&mut buf) {
            Ok(0) => {},
            Ok(n) => {
                trace!("RX {n} key bytes: {:02X?}", &buf[..n]);
                for &key in &buf[..n] {
                    // Bytes still in flight when close() is called are dropped
                    if !running.load(Ordering::Acquire) {
                        return;
                    }
                    handler.on_key(key);
                }
            },
            Err(e) => {
                if running.load(Ordering::Acquire) {
                    warn!("Keypad read failed on {}: {e}", transport.name());
                    handler.on_disconnect(&e);
                }
                return;
            },
        }
    }
}
