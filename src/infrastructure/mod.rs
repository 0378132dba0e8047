//! Infrastructure layer: injected collaborators and I/O boundaries
//!
//! This layer implements I/O boundary traits and wires up commands and units.

pub mod di;
pub mod error;
pub mod logging;
pub mod traits;

pub use di::{CommandRef, Registry, Tag};
pub use error::{LoggingError, RegistryError};
pub use traits::{LogLevels, Subsystem};
