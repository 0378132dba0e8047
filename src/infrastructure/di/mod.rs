//! Dependency wiring: the registry handed to the launcher

pub mod registry;

pub use registry::{CommandListing, CommandRef, Registry, RegistryBuilder, Tag};
