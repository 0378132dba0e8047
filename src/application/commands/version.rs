//! `--version`: prints name and version, then skips the run

use crate::application::command::{ArgCursor, Command, CommandResult, Flow};
use crate::cli::output;
use crate::infrastructure::di::Registry;

pub struct VersionCommand {
    name: String,
    version: String,
}

impl VersionCommand {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn banner(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}

impl Command for VersionCommand {
    fn process(&self, _args: &mut ArgCursor<'_>, _registry: &Registry) -> CommandResult {
        output::info(&self.banner());
        Ok(Flow::SkipRun)
    }

    fn summary(&self) -> &str {
        "Displays the application version and exits."
    }
}
