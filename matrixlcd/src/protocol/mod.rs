//! Display command protocol.

pub mod command;
pub mod frame;

// Re-export common types
pub use command::{CommandCode, lookup};
pub use frame::{CommandFrame, ESCAPE};
