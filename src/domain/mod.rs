//! Domain layer: units and status aggregation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod status;
pub mod unit;

pub use error::{AbsorbError, UnitError};
pub use status::{LocalStatus, StatusWidth};
pub use unit::{RunError, RunResult, Unit, UnitRef};
