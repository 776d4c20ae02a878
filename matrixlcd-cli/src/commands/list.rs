//! Command table listing.

use matrixlcd::CommandCode;

/// Print every supported command with its code and argument length.
pub(crate) fn cmd_list_commands() {
    println!("{:<24} {:>4} {:>5}", "COMMAND", "CODE", "ARGS");
    for command in CommandCode::ALL {
        println!(
            "{:<24} {:>4} {:>5}",
            command.name(),
            command.code(),
            command.payload_len()
        );
    }
}
