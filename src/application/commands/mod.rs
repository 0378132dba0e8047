//! Built-in commands

pub mod config;
pub mod help;
pub mod status_map;
pub mod verbose;
pub mod version;

pub use config::ConfigCommand;
pub use help::HelpCommand;
pub use status_map::StatusMapCommand;
pub use verbose::VerboseCommand;
pub use version::VersionCommand;
