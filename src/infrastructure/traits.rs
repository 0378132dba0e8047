//! I/O boundary traits for testability
//!
//! Commands reach process-global state only through these traits, so they
//! can be exercised with recording implementations.

use std::fmt;

use tracing::level_filters::LevelFilter;

use crate::infrastructure::error::LoggingError;

/// A logging namespace whose verbosity can be adjusted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subsystem {
    /// The root logger: applies wherever no narrower directive matches.
    Root,
    /// A tracing target prefix, usually a module path.
    Target(String),
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subsystem::Root => f.write_str("."),
            Subsystem::Target(target) => f.write_str(target),
        }
    }
}

/// Runtime control of log verbosity.
pub trait LogLevels {
    /// Set the level for one subsystem, leaving other subsystems untouched.
    fn set_level(&self, subsystem: &Subsystem, level: LevelFilter) -> Result<(), LoggingError>;
}
