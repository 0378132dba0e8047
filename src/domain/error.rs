//! Domain-level errors (no external dependencies)

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::domain::unit::UnitRef;

/// A failure reported by a command on behalf of a specific unit.
///
/// The unit gets the first chance to absorb it into its local status.
#[derive(Error)]
#[error("{message}")]
pub struct UnitError {
    unit: UnitRef,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl UnitError {
    pub fn new(unit: UnitRef, message: impl Into<String>) -> Self {
        Self {
            unit,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        unit: UnitRef,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            unit,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The unit this error belongs to.
    pub fn unit(&self) -> &UnitRef {
        &self.unit
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this error belongs to `unit` (pointer identity).
    pub fn is_for(&self, unit: &UnitRef) -> bool {
        Rc::ptr_eq(&self.unit, unit)
    }

    /// Name of the owning unit, safe to call while the unit is borrowed.
    pub fn unit_name(&self) -> String {
        self.unit
            .try_borrow()
            .map(|unit| unit.name())
            .unwrap_or_else(|_| "<busy unit>".to_string())
    }
}

impl fmt::Debug for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitError")
            .field("unit", &self.unit_name())
            .field("message", &self.message)
            .field("source", &self.source)
            .finish()
    }
}

/// A unit could not record a domain error in its local status.
#[derive(Error, Debug)]
pub enum AbsorbError {
    #[error("unit {unit} does not map errors to status codes: {message}")]
    Unsupported { unit: String, message: String },

    #[error("unit {unit} is in use and cannot record its status")]
    Busy { unit: String },
}
