//! CLI command implementations

pub mod build;
pub mod config;
pub mod import;

pub use build::BuildCommand;
pub use config::ConfigCommand;
pub use import::{ImportCommand, ImportReport};
