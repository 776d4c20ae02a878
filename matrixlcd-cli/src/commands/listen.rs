//! Keypad listener.

use anyhow::{Result, bail};
use console::style;
use matrixlcd::{KeyHandler, TransportError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::{Cli, open_session, was_interrupted};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Prints each key and counts them.
struct KeyPrinter {
    seen: Arc<AtomicUsize>,
    disconnected: Arc<AtomicBool>,
}

impl KeyHandler for KeyPrinter {
    fn on_key(&mut self, key: u8) {
        let shown = if key.is_ascii_graphic() {
            char::from(key)
        } else {
            '.'
        };
        println!("{key:3}  0x{key:02X}  {shown}");
        self.seen.fetch_add(1, Ordering::Relaxed);
    }

    fn on_disconnect(&mut self, error: &TransportError) {
        eprintln!("{} {error}", style("✗").red());
        self.disconnected.store(true, Ordering::Relaxed);
    }
}

/// Print key events until Ctrl-C, disconnect, or `count` keys.
pub(crate) fn cmd_listen(cli: &Cli, config: &Config, count: Option<usize>) -> Result<()> {
    let seen = Arc::new(AtomicUsize::new(0));
    let disconnected = Arc::new(AtomicBool::new(false));
    let printer = KeyPrinter {
        seen: Arc::clone(&seen),
        disconnected: Arc::clone(&disconnected),
    };

    let mut lcd = open_session(cli, config, Some(Box::new(printer)))?;
    if !cli.quiet {
        eprintln!(
            "{} Listening for keys on {} (Ctrl-C to stop)",
            style("⌨").cyan(),
            lcd.port_name().unwrap_or_default()
        );
    }

    loop {
        if was_interrupted() || disconnected.load(Ordering::Relaxed) {
            break;
        }
        if count.is_some_and(|limit| seen.load(Ordering::Relaxed) >= limit) {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }

    lcd.close();

    if disconnected.load(Ordering::Relaxed) {
        bail!("Display disconnected");
    }
    Ok(())
}
