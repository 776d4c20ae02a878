//! Single command and literal text output.

use anyhow::{Context, Result, bail};
use console::style;
use log::warn;
use matrixlcd::CommandCode;
use std::time::Duration;

use crate::config::Config;
use crate::{Cli, open_session};

/// Send one command with the given argument bytes.
pub(crate) fn cmd_send(
    cli: &Cli,
    config: &Config,
    command: CommandCode,
    bytes: &[u8],
) -> Result<()> {
    let expected = command.payload_len();
    if bytes.len() > expected {
        warn!(
            "{command} takes {expected} argument byte(s); ignoring {} extra",
            bytes.len() - expected
        );
    } else if bytes.len() < expected {
        warn!(
            "{command} takes {expected} argument byte(s); sending {} as zero",
            expected - bytes.len()
        );
    }

    let mut lcd = open_session(cli, config, None)?;
    let written = lcd
        .write_command(command, bytes)
        .with_context(|| format!("Failed to send {command}"))?;
    lcd.close();

    let frame_len = expected + 2;
    if written == 0 {
        bail!("{command} was not transmitted");
    }
    if !cli.quiet {
        eprintln!(
            "{} {command} ({written}/{frame_len} bytes)",
            style("✓").green()
        );
    }
    Ok(())
}

/// Write literal text, optionally one screen at a time.
pub(crate) fn cmd_text(cli: &Cli, config: &Config, text: &str, delay: Option<u64>) -> Result<()> {
    let delay = delay
        .or(config.display.scroll_delay_ms)
        .map_or(Duration::ZERO, Duration::from_millis);

    let mut lcd = open_session(cli, config, None)?;
    let shown = lcd
        .display_text(text.as_bytes(), delay)
        .context("Failed to write text")?;
    lcd.close();

    if !shown {
        bail!("Text was not transmitted");
    }
    if !cli.quiet {
        eprintln!("{} {} byte(s) written", style("✓").green(), text.len());
    }
    Ok(())
}
