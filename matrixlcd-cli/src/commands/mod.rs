//! Command implementations.
//!
//! Each subcommand is implemented in its own module for clean separation.

pub(crate) mod demo;
pub(crate) mod list;
pub(crate) mod listen;
pub(crate) mod send;

pub(crate) use demo::cmd_demo;
pub(crate) use list::cmd_list_commands;
pub(crate) use listen::cmd_listen;
pub(crate) use send::{cmd_send, cmd_text};
