//! Infrastructure-level errors: registry wiring and logging control

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::reload;
use tracing_subscriber::util::TryInitError;

/// Registry wiring mistakes, detected when the registry is built.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("command name must not be empty")]
    EmptyName,

    #[error("tag registered twice: {0}")]
    DuplicateTag(String),

    #[error("alias {alias} points to unknown command {target}")]
    UnknownAliasTarget { alias: String, target: String },
}

/// Failures while installing or adjusting the log filter.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log directive '{directive}': {source}")]
    InvalidDirective {
        directive: String,
        #[source]
        source: ParseError,
    },

    #[error("cannot reload log filter: {0}")]
    Reload(#[from] reload::Error),

    #[error("cannot install logging: {0}")]
    Init(#[from] TryInitError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
