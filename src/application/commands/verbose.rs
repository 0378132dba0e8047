//! `--verbose [level [subsystem]]`: runtime log level control
//!
//! Settings only affect logging that happens after the command is processed.

use std::rc::Rc;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing::{debug, warn};

use crate::application::command::{ArgCursor, Command, CommandResult, Flow};
use crate::application::error::CommandError;
use crate::cli::output;
use crate::domain::UnitRef;
use crate::infrastructure::di::Registry;
use crate::infrastructure::traits::{LogLevels, Subsystem};

/// Level applied when the level argument is omitted.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::DEBUG;

/// Subsystem token denoting the root logger.
pub const ROOT_SUBSYSTEM: &str = ".";

const TAG: &str = "--verbose";

pub struct VerboseCommand {
    unit: UnitRef,
    levels: Rc<dyn LogLevels>,
}

impl VerboseCommand {
    /// `unit` is the main unit; its namespace is the default subsystem.
    pub fn new(unit: UnitRef, levels: Rc<dyn LogLevels>) -> Self {
        Self { unit, levels }
    }

    fn default_subsystem(&self) -> Subsystem {
        match self.unit.borrow().namespace() {
            Some(namespace) => Subsystem::Target(namespace),
            None => Subsystem::Root,
        }
    }
}

/// Parse a level name or a verbosity number.
///
/// Numbers follow the ladder `0 = warn`, `1 = info`, `2 = debug`, `3 = trace`;
/// anything above 3 is clamped to `trace`.
pub fn parse_level(token: &str) -> Result<LevelFilter, String> {
    if let Ok(verbosity) = token.parse::<u32>() {
        return Ok(match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            3 => LevelFilter::TRACE,
            _ => {
                output::warning(&format!("verbosity {verbosity} is above 3, using trace"));
                warn!(verbosity, "verbosity above 3 requested, using trace");
                LevelFilter::TRACE
            }
        });
    }
    LevelFilter::from_str(&token.to_ascii_lowercase())
        .map_err(|_| "expected off, error, warn, info, debug, trace or 0-3".to_string())
}

impl Command for VerboseCommand {
    fn process(&self, args: &mut ArgCursor<'_>, _registry: &Registry) -> CommandResult {
        let mut level = DEFAULT_LEVEL;
        let mut subsystem = None;

        if let Some(token) = args.fetch_argument() {
            level = parse_level(token)
                .map_err(|reason| CommandError::invalid(TAG, "level", token, reason))?;
            if let Some(token) = args.fetch_argument() {
                let token = token.trim();
                subsystem = Some(if token == ROOT_SUBSYSTEM {
                    Subsystem::Root
                } else {
                    Subsystem::Target(token.to_string())
                });
            }
        }

        let subsystem = subsystem.unwrap_or_else(|| self.default_subsystem());
        debug!(%subsystem, %level, "adjusting log level");
        self.levels.set_level(&subsystem, level)?;
        Ok(Flow::Continue)
    }

    fn arg_spec(&self) -> Option<&str> {
        Some("[level [subsystem]]")
    }

    fn summary(&self) -> &str {
        "Controls the amount of logging produced by the application. \
         The level argument is a level name (off, error, warn, info, debug, trace), \
         case-insensitive, or a verbosity number from 0 (warn) to 3 (trace). \
         When omitted, debug is assumed. The subsystem argument is a module path \
         or a period; the period denotes the root logger. When subsystem is omitted, \
         the module of the application's main unit is assumed. A command line may \
         contain more than one --verbose command to apply different levels to \
         different subsystems."
    }
}
