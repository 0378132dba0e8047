//! Terminal output for launcher diagnostics and built-in commands
//!
//! Diagnostics go to stderr, usage and listings to stdout. Colors follow
//! NO_COLOR, CLICOLOR and CLICOLOR_FORCE.

use colored::Colorize;

/// One-line diagnostic with a red `error:` prefix.
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Follow-up to an error, e.g. where to find usage.
pub fn hint(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}", msg.to_string().dimmed());
}

/// Synopsis line of usage output.
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
