//! Demo sequence.

use anyhow::{Context, Result};
use console::style;
use matrixlcd::CommandCode;
use std::time::Duration;

use crate::config::Config;
use crate::{Cli, open_session};

/// LED used by the demo.
const DEMO_LED: u8 = 2;

/// Keypad brightness, then the RGB backlight colour.
const DEMO_LEVELS: [u8; 3] = [0, 32, 255];

/// Turn an LED on, set keypad brightness and backlight colour, clear the
/// screen, turn the LED off and say hello.
pub(crate) fn cmd_demo(cli: &Cli, config: &Config) -> Result<()> {
    let mut lcd = open_session(cli, config, None)?;

    let steps: [(CommandCode, &[u8]); 5] = [
        (CommandCode::GPOOn, &[DEMO_LED]),
        (CommandCode::KeyBrightness, &DEMO_LEVELS),
        (CommandCode::DisplayBacklightColour, &DEMO_LEVELS),
        (CommandCode::ClearScreen, &[]),
        (CommandCode::GPOOff, &[DEMO_LED]),
    ];

    for (command, payload) in steps {
        let sent = lcd
            .send_command(command, payload)
            .with_context(|| format!("Failed to send {command}"))?;
        if !cli.quiet {
            let mark = if sent {
                style("✓").green()
            } else {
                style("✗").red()
            };
            eprintln!("{mark} {command}");
        }
    }

    let shown = lcd
        .display_text(b"Hello!", Duration::ZERO)
        .context("Failed to write text")?;
    if !cli.quiet {
        let mark = if shown {
            style("✓").green()
        } else {
            style("✗").red()
        };
        eprintln!("{mark} Hello!");
    }

    lcd.close();
    Ok(())
}
