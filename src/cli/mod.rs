//! CLI layer: terminal output

pub mod output;
