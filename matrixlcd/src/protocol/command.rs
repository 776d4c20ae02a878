//! Command table for the display's escape-prefixed command set.
//!
//! Every command is identified by a single byte and takes a fixed number of
//! argument bytes. The table below is the only source of those lengths; the
//! frame encoder never trusts the size of a caller-provided buffer.
//!
//! | Group            | Commands                                                       |
//! |------------------|----------------------------------------------------------------|
//! | Setup            | baud rate, I2C address, protocol, boot message                 |
//! | Text             | clear, auto scroll, line wrap                                  |
//! | Cursor           | position, home, move, underline/block                          |
//! | Characters       | custom characters, banks, numbers, bar graphs                  |
//! | GPO              | general purpose outputs (LEDs)                                 |
//! | Keypad           | debounce, repeat mode, key codes, keypad backlight             |
//! | Display          | backlight, brightness, RGB colour, contrast                    |
//! | Misc             | non-volatile memory, customer data, version, module type       |

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

macro_rules! command_table {
    ($($(#[$doc:meta])* $name:ident = $code:literal => $len:literal,)+) => {
        /// Command identifiers understood by the display.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u8)]
        pub enum CommandCode {
            $($(#[$doc])* $name = $code,)+
        }

        impl CommandCode {
            /// Every supported command, in table order.
            pub const ALL: &'static [CommandCode] = &[$(CommandCode::$name,)+];

            /// Number of argument bytes this command takes on the wire.
            pub const fn payload_len(self) -> usize {
                match self {
                    $(CommandCode::$name => $len,)+
                }
            }

            /// Canonical command name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(CommandCode::$name => stringify!($name),)+
                }
            }
        }

        impl TryFrom<u8> for CommandCode {
            type Error = Error;

            fn try_from(code: u8) -> Result<Self> {
                match code {
                    $($code => Ok(CommandCode::$name),)+
                    other => Err(Error::InvalidCommand(other)),
                }
            }
        }
    };
}

command_table! {
    /// Change the serial baud rate (1 byte: 83 = 1200 .. 8 = 115200, 51 = 19200).
    BaudRate = 57 => 1,
    /// Change the I2C slave address (1 byte, even value, default 80).
    I2CAddress = 51 => 1,
    /// Select the communication protocol (1 byte: 0 = I2C, 1 = serial).
    Protocol = 160 => 1,
    /// Set a non-standard baud rate (2 byte speed divisor).
    BaudNonStd = 164 => 2,
    /// Clear the screen.
    ClearScreen = 88 => 0,
    /// Store the startup message (80 characters).
    BootMsg = 64 => 80,

    /// Scroll text up a line when the end of the screen is reached.
    AutoScrollOn = 81 => 0,
    /// Disable auto scrolling.
    AutoScrollOff = 82 => 0,
    /// Wrap text into the next line.
    LineWrapOn = 67 => 0,
    /// Disable line wrapping (rows are written 1, 3, 2, 4).
    LineWrapOff = 68 => 0,

    /// Move the cursor (column 1-20, row 1-4).
    SetCursor = 71 => 2,
    /// Move the cursor to the top left.
    ResetCursor = 72 => 0,
    /// Move the cursor one position left.
    CursorLeft = 76 => 0,
    /// Move the cursor one position right.
    CursorRight = 77 => 0,
    /// Draw an underline at the cursor position.
    CursorUnderlineOn = 74 => 0,
    /// Disable the underline cursor.
    CursorUnderlineOff = 75 => 0,
    /// Draw a blinking block cursor.
    CursorBlockOn = 83 => 0,
    /// Disable the block cursor.
    CursorBlockOff = 84 => 0,

    /// Create a custom character (id 0-7, 8 row bytes).
    SpecialCharCreate = 78 => 9,
    /// Save a custom character to a bank (bank, id, 8 row bytes).
    SpecialCharSave = 193 => 10,
    /// Load a custom character bank.
    SpecialCharLoad = 192 => 1,
    /// Save a startup custom character (id, 8 row bytes).
    SaveStartupChars = 194 => 9,
    /// Load the medium number bank.
    InitMedNumbers = 109 => 0,
    /// Place a medium digit (row, column, digit).
    PlaceMedNumbers = 111 => 3,
    /// Load the large number bank.
    InitLrgNumbers = 110 => 0,
    /// Place a large digit (column, digit).
    PlaceLrgNumbers = 35 => 2,
    /// Load the horizontal bar graph bank.
    InitHorizontal = 104 => 0,
    /// Place a horizontal bar (column, row, direction, length).
    PlaceHrzBar = 124 => 4,
    /// Load the narrow vertical bar bank.
    InitVrtNarrow = 115 => 0,
    /// Load the wide vertical bar bank.
    InitVrtWide = 118 => 0,
    /// Place a vertical bar (column, length).
    PlaceVrtBar = 61 => 2,

    /// Turn on a general purpose output (1-6).
    GPOOn = 87 => 1,
    /// Turn off a general purpose output (1-6).
    GPOOff = 86 => 1,
    /// Set the startup state of an output (output, state).
    GPOStartupState = 195 => 2,

    /// Clear the key press buffer.
    ClearKeys = 69 => 0,
    /// Key debounce time in 6.5 ms units.
    SetDebounceTime = 85 => 1,
    /// Key repeat mode (1 = hold, 0 = typematic).
    SetRepeatMode = 126 => 1,
    /// Disable key repeat.
    RepeatModeOff = 96 => 0,
    /// Assign key down and key up codes for the seven keys.
    AssignKeyCodes = 213 => 14,
    /// Turn the keypad backlight off.
    KeyBacklightOff = 155 => 0,
    /// Keypad backlight brightness (0-255).
    KeyBrightness = 156 => 1,
    /// Keypad backlight behaviour on key press (0-3, 8-11).
    KeyBacklightBehaviour = 157 => 1,

    /// Turn the display backlight on (minutes, 0 = always).
    DisplayBacklightOn = 66 => 1,
    /// Turn the display backlight off.
    DisplayBacklightOff = 70 => 0,
    /// Display brightness (0-255).
    DisplayBrightness = 153 => 1,
    /// Set and save the startup display brightness (0-255).
    DisplayBrightnessSave = 152 => 1,
    /// Display backlight colour (red, green, blue).
    DisplayBacklightColour = 130 => 3,
    /// Display contrast (0-255).
    DisplayContrast = 80 => 1,

    /// Allow writes to non-volatile memory (1 or 0).
    SetRemember = 147 => 1,

    /// Store a 16 byte user data block.
    WriteCustomerData = 52 => 16,
    /// Read back the user data block.
    ReadCustomerData = 53 => 0,
    /// Query the firmware version.
    VersionNumber = 54 => 0,
    /// Query the module type.
    ReadModuleType = 55 => 0,
}

impl CommandCode {
    /// Wire byte for this command.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Payload length for a raw command byte.
pub fn lookup(code: u8) -> Result<usize> {
    CommandCode::try_from(code).map(CommandCode::payload_len)
}

impl From<CommandCode> for u8 {
    fn from(code: CommandCode) -> Self {
        code.code()
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandCode {
    type Err = String;

    /// Accepts `ClearScreen`, `clear-screen`, `clear_screen` or a numeric code.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        let numeric = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u8::from_str_radix(hex, 16).ok()
        } else {
            s.parse::<u8>().ok()
        };
        if let Some(code) = numeric {
            return Self::try_from(code).map_err(|e| e.to_string());
        }

        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        Self::ALL
            .iter()
            .copied()
            .find(|cmd| cmd.name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown command: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_lengths() {
        assert_eq!(CommandCode::ClearScreen.payload_len(), 0);
        assert_eq!(CommandCode::GPOOn.payload_len(), 1);
        assert_eq!(CommandCode::GPOOff.payload_len(), 1);
        assert_eq!(CommandCode::DisplayBacklightColour.payload_len(), 3);
        assert_eq!(CommandCode::KeyBrightness.payload_len(), 1);
    }

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<u8> = CommandCode::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes.len(), CommandCode::ALL.len());
    }

    #[test]
    fn test_every_code_round_trips_through_lookup() {
        for &cmd in CommandCode::ALL {
            assert_eq!(CommandCode::try_from(cmd.code()).ok(), Some(cmd));
            assert_eq!(lookup(cmd.code()).ok(), Some(cmd.payload_len()));
        }
    }

    #[test]
    fn test_unknown_code_is_invalid_command() {
        assert!(matches!(lookup(0), Err(Error::InvalidCommand(0))));
        assert!(matches!(
            CommandCode::try_from(0xFE),
            Err(Error::InvalidCommand(0xFE))
        ));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("ClearScreen".parse::<CommandCode>(), Ok(CommandCode::ClearScreen));
        assert_eq!("clear-screen".parse::<CommandCode>(), Ok(CommandCode::ClearScreen));
        assert_eq!("DISPLAY_BACKLIGHT_COLOUR".parse::<CommandCode>(), Ok(CommandCode::DisplayBacklightColour));
        assert_eq!("gpo-on".parse::<CommandCode>(), Ok(CommandCode::GPOOn));
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!("88".parse::<CommandCode>(), Ok(CommandCode::ClearScreen));
        assert_eq!("0x82".parse::<CommandCode>(), Ok(CommandCode::DisplayBacklightColour));
        assert!("1".parse::<CommandCode>().is_err());
        assert!("blink".parse::<CommandCode>().is_err());
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(CommandCode::SetCursor.to_string(), "SetCursor");
    }
}
