//! Application-level errors (wraps domain and infrastructure errors)

use thiserror::Error;

use crate::domain::UnitError;
use crate::infrastructure::LoggingError;

/// Failure reported by a command while processing its arguments.
///
/// `Unit` is a domain error the launcher hands to the owning unit; every
/// other variant is a command-line parse failure.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{command}: missing {what}")]
    MissingArgument { command: String, what: String },

    #[error("{command}: invalid {what} '{value}': {reason}")]
    InvalidArgument {
        command: String,
        what: String,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Unit(#[from] UnitError),

    #[error("{0}")]
    Logging(#[from] LoggingError),

    #[error("{0}")]
    Failed(String),
}

impl CommandError {
    pub fn invalid(
        command: impl Into<String>,
        what: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            command: command.into(),
            what: what.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error belongs to a unit rather than to the command line.
    pub fn is_domain(&self) -> bool {
        matches!(self, CommandError::Unit(_))
    }
}
