//! `--help`: usage summary built from the registry

use itertools::Itertools;

use crate::application::command::{ArgCursor, Command, CommandResult, Flow};
use crate::cli::output;
use crate::infrastructure::di::Registry;

/// Prints every registered command with its tags, arg spec and summary,
/// then skips the application run.
pub struct HelpCommand {
    program: String,
}

impl HelpCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn synopsis(&self) -> String {
        format!("Usage: {} [args]", self.program)
    }

    /// Usage text below the synopsis line.
    pub fn usage(&self, registry: &Registry) -> String {
        let mut lines = vec![
            String::new(),
            " where: args := arg [args] ;".to_string(),
            "  arg is one of the following:".to_string(),
        ];

        for listing in registry.list_commands() {
            let tags = std::iter::once(listing.tag)
                .chain(listing.aliases.iter().copied())
                .join(", ");
            lines.push(String::new());
            lines.push(with_arg_spec(format!(" {tags}"), listing.command.arg_spec()));
            lines.push(String::new());
            lines.push(format!("   {}", listing.command.summary()));
        }

        if let Some(handler) = registry.default_handler() {
            lines.push(String::new());
            lines.push(format!(" {}", handler.arg_spec().unwrap_or("argument")));
            lines.push(String::new());
            lines.push(format!("   {}", handler.summary()));
        }

        lines.push(String::new());
        lines.join("\n")
    }
}

fn with_arg_spec(tags: String, arg_spec: Option<&str>) -> String {
    match arg_spec {
        Some(spec) => format!("{tags} {spec}"),
        None => tags,
    }
}

impl Command for HelpCommand {
    fn process(&self, _args: &mut ArgCursor<'_>, registry: &Registry) -> CommandResult {
        output::header(&self.synopsis());
        output::info(&self.usage(registry));
        Ok(Flow::SkipRun)
    }

    fn summary(&self) -> &str {
        "Displays this help screen and exits."
    }
}
