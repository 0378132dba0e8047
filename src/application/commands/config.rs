//! `--config config-file`: records the configuration file on a unit

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::debug;

use crate::application::command::{ArgCursor, Command, CommandResult, Flow};
use crate::config::ConfigurableUnit;
use crate::infrastructure::di::Registry;

const TAG: &str = "--config";

/// Takes exactly one following token (even one that looks like a flag) and
/// stores it, tilde-expanded, as the unit's configuration file.
pub struct ConfigCommand<U: ConfigurableUnit> {
    unit: Rc<RefCell<U>>,
}

impl<U: ConfigurableUnit> ConfigCommand<U> {
    pub fn new(unit: Rc<RefCell<U>>) -> Self {
        Self { unit }
    }
}

impl<U: ConfigurableUnit> Command for ConfigCommand<U> {
    fn process(&self, args: &mut ArgCursor<'_>, _registry: &Registry) -> CommandResult {
        let raw = args.require_argument(TAG, "config-file argument")?;
        let path = PathBuf::from(shellexpand::tilde(raw).as_ref());
        debug!(path = %path.display(), "configuration file selected");
        self.unit.borrow_mut().set_config_file(path);
        Ok(Flow::Continue)
    }

    fn arg_spec(&self) -> Option<&str> {
        Some("config-file")
    }

    fn summary(&self) -> &str {
        "Points to the configuration file to use."
    }
}
