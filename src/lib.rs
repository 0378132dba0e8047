//! Minimal command-line application launcher.
//!
//! A [`Registry`](infrastructure::di::Registry) maps command-line tokens to
//! [`Command`](application::Command)s and holds the main
//! [`Unit`](domain::Unit). The [`Launcher`](application::Launcher) scans the
//! argument vector, dispatches each token, runs the main unit when the command
//! line was clean and folds the unit tree's status into one exit code.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{Launcher, ScanOutcome};
pub use domain::{LocalStatus, StatusWidth, Unit, UnitRef};
pub use infrastructure::di::{Registry, Tag};
