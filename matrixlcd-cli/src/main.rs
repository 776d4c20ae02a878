//! matrixlcd CLI - Command-line tool for driving serial character displays.
//!
//! ## Features
//!
//! - Run the demo sequence (LEDs, backlight colour, text)
//! - Send any command from the command table
//! - Write literal text, optionally one screen at a time
//! - Print keypad events as they arrive
//! - Config file and environment variable support

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use matrixlcd::{
    CommandCode, DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT, DeviceSession, KeyHandler,
    TransportConfig,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

mod commands;
mod config;

use commands::{cmd_demo, cmd_list_commands, cmd_listen, cmd_send, cmd_text};
use config::Config;

/// Set by the Ctrl-C handler.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Whether Ctrl-C was pressed.
pub(crate) fn was_interrupted() -> bool {
    INTERRUPTED.load(Ordering::Relaxed)
}

/// matrixlcd - Drive a serial character display.
///
/// Environment variables:
///   MATRIXLCD_PORT           - Default serial port
///   MATRIXLCD_BAUD           - Default baud rate (default: 19200)
///   MATRIXLCD_READ_TIMEOUT   - Keypad read timeout in ms (default: 500)
#[derive(Parser)]
#[command(name = "matrixlcd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Serial port the display is attached to.
    #[arg(short, long, global = true, env = "MATRIXLCD_PORT")]
    port: Option<String>,

    /// Baud rate (display default: 19200).
    #[arg(short, long, global = true, env = "MATRIXLCD_BAUD")]
    baud: Option<u32>,

    /// Keypad read-interval timeout in milliseconds.
    #[arg(long, global = true, env = "MATRIXLCD_READ_TIMEOUT", value_name = "MS")]
    read_timeout: Option<u64>,

    /// Verbose output level (-v, -vv, -vvv for increasing detail).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-essential output).
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a configuration file.
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run the demo sequence: LED on, keypad and backlight colour, clear, LED off, "Hello!".
    Demo,

    /// Send one command.
    Send {
        /// Command name (e.g. clear-screen, DisplayBacklightColour) or code.
        command: CommandCode,

        /// Argument bytes (decimal or 0x-prefixed hex).
        #[arg(value_parser = parse_byte)]
        bytes: Vec<u8>,
    },

    /// Write literal text to the display.
    Text {
        /// Text to show.
        text: String,

        /// Show the text one screen at a time with this delay in milliseconds.
        #[arg(short, long, value_name = "MS")]
        delay: Option<u64>,
    },

    /// Print keypad events until Ctrl-C.
    Listen {
        /// Stop after this many key events.
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// List all supported commands and their argument lengths.
    ListCommands,
}

/// Parse a byte argument (decimal, or hex with 0x prefix).
fn parse_byte(s: &str) -> Result<u8, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex byte '{s}': {e}"))
    } else {
        s.parse::<u8>()
            .map_err(|e| format!("Invalid byte '{s}': {e}"))
    }
}

/// Resolve the serial settings from CLI args, environment and config.
pub(crate) fn transport_config(cli: &Cli, config: &Config) -> Result<TransportConfig> {
    let Some(port) = cli
        .port
        .clone()
        .or_else(|| config.connection.serial.clone())
    else {
        bail!("No serial port specified. Use --port, MATRIXLCD_PORT or a config file.");
    };

    let baud = cli
        .baud
        .or(config.connection.baud)
        .unwrap_or(DEFAULT_BAUD_RATE);
    let read_timeout = cli
        .read_timeout
        .or(config.connection.read_timeout_ms)
        .map_or(DEFAULT_READ_TIMEOUT, Duration::from_millis);

    Ok(TransportConfig::new(port, baud).with_read_timeout(read_timeout))
}

/// Open a session on the configured port.
pub(crate) fn open_session(
    cli: &Cli,
    config: &Config,
    on_key: Option<Box<dyn KeyHandler>>,
) -> Result<DeviceSession> {
    let transport = transport_config(cli, config)?;
    let port = transport.port_name.clone();

    let mut session = DeviceSession::new();
    session
        .try_start(transport, on_key)
        .with_context(|| format!("Failed to start display on {port}"))?;
    Ok(session)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_target(cli.verbose >= 2)
        .format_timestamp(if cli.verbose >= 2 {
            Some(env_logger::TimestampPrecision::Millis)
        } else {
            None
        })
        .init();

    debug!(
        "matrixlcd v{} (verbose level: {})",
        env!("CARGO_PKG_VERSION"),
        cli.verbose
    );

    ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::Relaxed))
        .context("Failed to install Ctrl-C handler")?;

    // Load configuration
    let config = if let Some(ref path) = cli.config_path {
        Config::load_from_path(path)
    } else {
        Config::load()
    };

    match &cli.command {
        Commands::Demo => cmd_demo(&cli, &config)?,
        Commands::Send { command, bytes } => cmd_send(&cli, &config, *command, bytes)?,
        Commands::Text { text, delay } => cmd_text(&cli, &config, text, *delay)?,
        Commands::Listen { count } => cmd_listen(&cli, &config, *count)?,
        Commands::ListCommands => cmd_list_commands(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_byte() {
        assert_eq!(parse_byte("0"), Ok(0));
        assert_eq!(parse_byte("255"), Ok(255));
        assert_eq!(parse_byte("0xFE"), Ok(0xFE));
        assert_eq!(parse_byte(" 0x0a "), Ok(10));
        assert!(parse_byte("256").is_err());
        assert!(parse_byte("0xZZ").is_err());
    }

    #[test]
    fn test_send_parses_command_and_bytes() {
        let cli = parse(&["matrixlcd", "send", "display-backlight-colour", "10", "0x14", "30"]);
        match cli.command {
            Commands::Send { command, bytes } => {
                assert_eq!(command, CommandCode::DisplayBacklightColour);
                assert_eq!(bytes, vec![10, 20, 30]);
            },
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_transport_config_prefers_cli_over_config() {
        let cli = parse(&["matrixlcd", "--port", "COM6", "--baud", "9600", "demo"]);
        let mut config = Config::default();
        config.connection.serial = Some("/dev/ttyUSB0".to_string());
        config.connection.baud = Some(57600);
        config.connection.read_timeout_ms = Some(100);

        let transport = transport_config(&cli, &config).unwrap();
        assert_eq!(transport.port_name, "COM6");
        assert_eq!(transport.baud_rate, 9600);
        assert_eq!(transport.read_timeout, Duration::from_millis(100));
    }

    #[test]
    fn test_transport_config_defaults() {
        let cli = parse(&["matrixlcd", "--port", "COM6", "demo"]);
        let transport = transport_config(&cli, &Config::default()).unwrap();
        assert_eq!(transport.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(transport.read_timeout, DEFAULT_READ_TIMEOUT);
    }

    #[test]
    fn test_transport_config_requires_port() {
        let cli = Cli {
            port: None,
            baud: None,
            read_timeout: None,
            verbose: 0,
            quiet: false,
            config_path: None,
            command: Commands::Demo,
        };
        assert!(transport_config(&cli, &Config::default()).is_err());
    }
}
