//! Launcher: command-line scan, main unit run and exit code
//!
//! The scan is a single left-to-right pass. Each token is resolved to a
//! command (or the default handler), the command consumes what it needs and
//! the first terminal outcome stops the scan. Only a scan that runs out of
//! tokens lets the main unit run.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, info, instrument, trace, warn};

use crate::application::command::{ArgCursor, CommandResult, Flow, TokenKind};
use crate::application::error::CommandError;
use crate::cli::output;
use crate::domain::{AbsorbError, UnitError};
use crate::exitcode;
use crate::infrastructure::di::{CommandRef, Registry};

/// Name of the command pointed to after a parse failure.
const HELP: &str = "help";

/// Terminal state of a command-line scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every token was processed; the main unit may run.
    Completed,
    /// Malformed command line, unknown token or a failing command.
    ParseFailure,
    /// A command asked to exit without running the main unit.
    RunSkipped,
    /// A unit error could not be recorded by its unit.
    InternalError,
    /// A unit error was recorded in the unit's status.
    UnitFailure,
}

impl ScanOutcome {
    /// Fixed exit code of outcomes that bypass unit status entirely.
    pub fn reserved_code(self) -> Option<i32> {
        match self {
            ScanOutcome::ParseFailure => Some(exitcode::PARSE_FAILURE),
            ScanOutcome::RunSkipped => Some(exitcode::RUN_SKIPPED),
            ScanOutcome::InternalError => Some(exitcode::INTERNAL_ERROR),
            ScanOutcome::Completed | ScanOutcome::UnitFailure => None,
        }
    }
}

/// Drives a registry through scan, run and status computation.
pub struct Launcher {
    registry: Registry,
    outcome: Option<ScanOutcome>,
    /// Exit status; `OK` means "not decided yet, ask the main unit".
    status: i32,
    ran: bool,
}

impl Launcher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            outcome: None,
            status: exitcode::OK,
            ran: false,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Outcome of the last [`Launcher::parse_arguments`] call.
    pub fn outcome(&self) -> Option<ScanOutcome> {
        self.outcome
    }

    /// Process the whole command line and run the main unit if it was clean.
    /// Returns the process exit code.
    pub fn launch(mut self, args: &[String]) -> i32 {
        self.parse_arguments(args);
        let status = self.status_code();
        if status != exitcode::OK {
            return status;
        }
        self.run();
        self.status_code()
    }

    /// Scan `args` and record the outcome and its fixed exit code, if any.
    pub fn parse_arguments(&mut self, args: &[String]) -> ScanOutcome {
        let outcome = self.scan(args);
        self.outcome = Some(outcome);
        self.status = outcome.reserved_code().unwrap_or(exitcode::OK);
        outcome
    }

    /// Scan `args` against the registry without touching launcher state.
    #[instrument(level = "debug", skip(self))]
    pub fn scan(&self, args: &[String]) -> ScanOutcome {
        let mut cursor = ArgCursor::new(args);
        while let Some(token) = cursor.next() {
            let bound = TokenKind::classify(token).and_then(|(kind, name)| {
                let found = self.registry.resolve(kind, name);
                if found.is_none() {
                    trace!(token, "no handler registered for token");
                }
                found
            });

            let (command, by_default) = match bound {
                Some(command) => (command, false),
                None => {
                    cursor.back();
                    match self.registry.default_handler() {
                        Some(handler) => (handler, true),
                        None => {
                            output::error(&format!("unknown command line argument: {token}"));
                            self.usage_hint();
                            error!(token, "unknown command line argument");
                            return ScanOutcome::ParseFailure;
                        }
                    }
                }
            };

            let start = cursor.position();
            match invoke(&command, &mut cursor, &self.registry) {
                Ok(Ok(Flow::Continue)) => {
                    if by_default && cursor.position() == start {
                        output::error(&format!("command line argument not consumed: {token}"));
                        error!(token, "default handler did not consume the argument");
                        return ScanOutcome::ParseFailure;
                    }
                }
                Ok(Ok(Flow::SkipRun)) => {
                    trace!(token, "handler requested to skip the application run");
                    return ScanOutcome::RunSkipped;
                }
                Ok(Err(CommandError::Unit(err))) => return absorb(token, err),
                Ok(Err(err)) => {
                    output::error(&format!("invalid command line argument(s) near {token}: {err}"));
                    self.usage_hint();
                    error!(token, error = ?err, "invalid command line argument");
                    return ScanOutcome::ParseFailure;
                }
                Err(panic) => {
                    let reason = panic_message(panic.as_ref());
                    output::error(&format!("invalid command line argument(s) near {token}: {reason}"));
                    error!(token, reason = %reason, "command handler panicked");
                    return ScanOutcome::ParseFailure;
                }
            }
        }
        debug!("command line processed");
        ScanOutcome::Completed
    }

    /// Point at `--help` when one is registered.
    fn usage_hint(&self) {
        if self.registry.resolve(TokenKind::Command, HELP).is_some() {
            output::hint(&format!("run with {}{HELP} for usage", TokenKind::Command.prefix()));
        }
    }

    /// Run the main unit. Refused after an unclean scan or a previous run.
    pub fn run(&mut self) {
        if self.ran {
            warn!("main unit already ran, ignoring repeated run");
            return;
        }
        if !matches!(self.outcome, None | Some(ScanOutcome::Completed)) || self.status != exitcode::OK {
            warn!(outcome = ?self.outcome, "command line was not processed cleanly, main unit not run");
            return;
        }
        self.ran = true;

        let Some(unit) = self.registry.main_unit() else {
            output::error("no main unit registered");
            error!("no main unit registered");
            self.status = exitcode::INTERNAL_ERROR;
            return;
        };

        let name = unit.borrow().name();
        info!(unit = %name, "running main unit");
        match panic::catch_unwind(AssertUnwindSafe(|| unit.borrow_mut().run())) {
            Ok(Ok(())) => debug!(unit = %name, "main unit finished"),
            Ok(Err(err)) => {
                output::error(&format!("{name}: {err}"));
                error!(unit = %name, error = ?err, "unhandled error");
                self.status = exitcode::INTERNAL_ERROR;
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                output::error(&format!("{name}: {reason}"));
                error!(unit = %name, reason = %reason, "main unit panicked");
                self.status = exitcode::INTERNAL_ERROR;
            }
        }
    }

    /// Final exit code.
    ///
    /// A fixed code recorded during scan or run wins; otherwise the main
    /// unit's status code is shifted past the reserved range.
    pub fn status_code(&mut self) -> i32 {
        if self.status != exitcode::OK {
            return self.status;
        }
        let Some(unit) = self.registry.main_unit() else {
            output::error("no main unit registered");
            error!("no main unit registered");
            self.status = exitcode::INTERNAL_ERROR;
            return self.status;
        };

        let code = match unit.try_borrow() {
            Ok(unit) => unit.status_code(),
            Err(_) => {
                error!("main unit is in use, cannot obtain its status");
                self.status = exitcode::INTERNAL_ERROR;
                return self.status;
            }
        };
        self.status = exitcode::from_unit_status(code);
        if self.status == exitcode::INTERNAL_ERROR && code != 0 {
            error!(code, "main unit returned a status code out of range");
        }

        if self.status == exitcode::OK && self.outcome == Some(ScanOutcome::UnitFailure) {
            warn!("a unit error was recorded but the main unit reports success");
            self.status = exitcode::INTERNAL_ERROR;
        }
        self.status
    }
}

fn invoke(
    command: &CommandRef,
    cursor: &mut ArgCursor<'_>,
    registry: &Registry,
) -> Result<CommandResult, Box<dyn Any + Send>> {
    panic::catch_unwind(AssertUnwindSafe(|| command.process(cursor, registry)))
}

/// Let the owning unit record `err`; failing that, it is an internal error.
fn absorb(token: &str, err: UnitError) -> ScanOutcome {
    output::error(&format!("error processing command line argument {token}: {err}"));
    error!(token, unit = %err.unit_name(), error = ?err, "unit error while processing command line");

    let unit = err.unit().clone();
    let absorbed = match unit.try_borrow_mut() {
        Ok(mut unit) => unit.absorb(&err),
        Err(_) => Err(AbsorbError::Busy {
            unit: err.unit_name(),
        }),
    };
    match absorbed {
        Ok(()) => ScanOutcome::UnitFailure,
        Err(absorb_err) => {
            warn!(error = %absorb_err, "could not obtain status code");
            ScanOutcome::InternalError
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_outcomes_when_mapping_then_fixed_codes_bypass_unit_status() {
        assert_eq!(ScanOutcome::ParseFailure.reserved_code(), Some(2));
        assert_eq!(ScanOutcome::RunSkipped.reserved_code(), Some(3));
        assert_eq!(ScanOutcome::InternalError.reserved_code(), Some(1));
        assert_eq!(ScanOutcome::Completed.reserved_code(), None);
        assert_eq!(ScanOutcome::UnitFailure.reserved_code(), None);
    }

    #[test]
    fn given_string_payloads_when_extracting_then_message_recovered() {
        let static_payload: Box<dyn Any + Send> = Box::new("boom");
        let owned_payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let other_payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(static_payload.as_ref()), "boom");
        assert_eq!(panic_message(owned_payload.as_ref()), "bang");
        assert_eq!(panic_message(other_payload.as_ref()), "unknown panic");
    }

    #[test]
    fn given_empty_registry_when_launching_then_internal_error() {
        let registry = Registry::builder().build().unwrap();
        assert_eq!(Launcher::new(registry).launch(&[]), exitcode::INTERNAL_ERROR);
    }
}
