//! Application layer: commands and the launcher
//!
//! This layer dispatches the command line and drives the main unit.

pub mod command;
pub mod commands;
pub mod error;
pub mod launcher;

pub use command::{ArgCursor, Command, CommandResult, Flow, TokenKind};
pub use error::CommandError;
pub use launcher::{Launcher, ScanOutcome};
