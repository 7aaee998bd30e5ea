//! Print the effective configuration

use anyhow::{Context, Result};
use pigment_atlas::config::AtlasConfig;

/// Show configuration after defaults, file and environment are merged
pub struct ConfigCommand;

impl ConfigCommand {
    /// Effective configuration as TOML
    pub fn render(config: &AtlasConfig) -> Result<String> {
        toml::to_string_pretty(config).context("Failed to serialize configuration")
    }

    /// Execute the command
    pub fn execute(config: &AtlasConfig) -> Result<()> {
        print!("{}", Self::render(config)?);
        Ok(())
    }
}
