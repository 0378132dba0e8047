//! `--status-map`: shows how the unit tree divides the exit code space

use termtree::Tree;

use crate::application::command::{ArgCursor, Command, CommandResult, Flow};
use crate::cli::output;
use crate::domain::{StatusWidth, UnitRef};
use crate::exitcode;
use crate::infrastructure::di::Registry;

pub struct StatusMapCommand {
    unit: UnitRef,
}

impl StatusMapCommand {
    pub fn new(unit: UnitRef) -> Self {
        Self { unit }
    }
}

/// Render `unit` and its dependencies as a tree of code-space reservations.
pub fn status_tree(unit: &UnitRef) -> Tree<String> {
    let unit = unit.borrow();
    let label = match unit.status_width() {
        StatusWidth::Weighted(width) => format!(
            "{} (width {}, code space {})",
            unit.name(),
            width,
            unit.max_status_code()
        ),
        StatusWidth::Opaque => format!("{} (opaque)", unit.name()),
    };
    Tree::new(label).with_leaves(unit.dependencies().iter().map(status_tree))
}

impl Command for StatusMapCommand {
    fn process(&self, _args: &mut ArgCursor<'_>, _registry: &Registry) -> CommandResult {
        output::info(&format!(
            "Exit codes above {} are {} + unit status code.\n",
            exitcode::RESERVED_MAX,
            exitcode::RESERVED_MAX
        ));
        output::info(&status_tree(&self.unit));
        Ok(Flow::SkipRun)
    }

    fn summary(&self) -> &str {
        "Displays the tree of application units with their status code widths and exits."
    }
}
