//! Units: runnable components taking part in status aggregation

use std::any::type_name;
use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::error::{AbsorbError, UnitError};
use crate::domain::status::{self, StatusWidth};

/// Shared handle to a unit. Units are configured by commands and polled by
/// their parents, all on one thread.
pub type UnitRef = Rc<RefCell<dyn Unit>>;

/// Failure escaping a unit's `run`.
pub type RunError = Box<dyn std::error::Error + Send + Sync>;

pub type RunResult = Result<(), RunError>;

/// A runnable component with a local status and zero or more dependencies.
///
/// Implementors provide `run`, their local status and its width. Status
/// aggregation over the dependency tree comes for free; opaque units that
/// compute their code some other way override [`Unit::status_code`].
pub trait Unit {
    /// Perform the unit's work. Called at most once per process.
    fn run(&mut self) -> RunResult;

    /// Ordinal of the current local status, `None` while nothing is recorded.
    fn local_status(&self) -> Option<u32>;

    fn status_width(&self) -> StatusWidth;

    /// Dependencies in priority order. The set must not change after
    /// construction; only their internal state may.
    fn dependencies(&self) -> &[UnitRef] {
        &[]
    }

    /// Status code of this unit and its dependency tree, `0` on full success.
    fn status_code(&self) -> u32 {
        status::aggregate(self.local_status(), self.status_width(), self.dependencies())
    }

    /// Size of this unit's code space.
    fn max_status_code(&self) -> u32 {
        status::max_code(self.status_width(), self.dependencies())
    }

    /// Record a domain error in the local status.
    ///
    /// Units without an error mapping keep the default, which refuses.
    fn absorb(&mut self, error: &UnitError) -> Result<(), AbsorbError> {
        Err(AbsorbError::Unsupported {
            unit: self.name(),
            message: error.message().to_string(),
        })
    }

    /// Short name used in logs and listings.
    fn name(&self) -> String {
        short_name(type_name::<Self>()).to_string()
    }

    /// Logging namespace of the unit: the module path of its type.
    /// `None` stands for the root namespace.
    fn namespace(&self) -> Option<String> {
        module_path_of(type_name::<Self>()).map(str::to_string)
    }
}

/// Strip generic arguments from a type path.
fn base_path(type_path: &str) -> &str {
    type_path.split('<').next().unwrap_or(type_path)
}

fn short_name(type_path: &str) -> &str {
    let base = base_path(type_path);
    base.rsplit("::").next().unwrap_or(base)
}

fn module_path_of(type_path: &str) -> Option<&str> {
    base_path(type_path)
        .rsplit_once("::")
        .map(|(module, _)| module)
}
