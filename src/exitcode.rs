//! Exit codes reserved by the launcher
//!
//! Unit-derived status codes are shifted past `RESERVED_MAX` before they
//! reach the operating system, so the two ranges never overlap.

/// Successful termination
pub const OK: i32 = 0;

/// Internal error: unhandled failure, missing main unit, unmapped unit error
pub const INTERNAL_ERROR: i32 = 1;

/// Malformed command line
pub const PARSE_FAILURE: i32 = 2;

/// Run intentionally skipped (help, version, ...)
pub const RUN_SKIPPED: i32 = 3;

/// Largest code reserved by the launcher
pub const RESERVED_MAX: i32 = RUN_SKIPPED;

/// Largest exit status a POSIX parent can observe (low 8 bits).
pub const EXIT_STATUS_MAX: i32 = 255;

/// Shift a positive unit status code past the reserved range.
///
/// Returns `INTERNAL_ERROR` if the shifted code exceeds [`EXIT_STATUS_MAX`];
/// it would otherwise wrap into `OK` or a reserved code.
pub fn from_unit_status(code: u32) -> i32 {
    if code == 0 {
        return OK;
    }
    i32::try_from(code)
        .ok()
        .and_then(|c| c.checked_add(RESERVED_MAX))
        .filter(|&shifted| shifted <= EXIT_STATUS_MAX)
        .unwrap_or(INTERNAL_ERROR)
}
