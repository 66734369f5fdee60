//! CLI subcommand implementations.

pub mod history;
pub mod project;
