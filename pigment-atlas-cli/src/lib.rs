//! pigment-atlas CLI library

#![allow(clippy::missing_errors_doc)]

pub mod commands;

pub use commands::{BuildCommand, ConfigCommand, ImportCommand, ImportReport};

/// Spinner shown while a command works
pub(crate) fn spinner(message: &'static str) -> anyhow::Result<indicatif::ProgressBar> {
    use anyhow::Context;
    use indicatif::{ProgressBar, ProgressStyle};

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Failed to set progress style")?,
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_message(message);
    Ok(spinner)
}
