//! Configuration management for pigment-atlas
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `PIGMENT_ATLAS_` prefix,
//!    nested keys separated by `__`, e.g. `PIGMENT_ATLAS_SITE__ROOT_PATH`)
//! 2. A TOML file (`./pigment-atlas.toml` unless a path is given)
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! [database]
//! url = "sqlite://pigments.sqlite3"
//!
//! [site]
//! output_dir = "build"
//! root_path = "/pigments"
//! assets_dir = "assets"
//! clean = true
//! pigment_index = true
//! title = "Watercolor Pigments"
//! stylesheet = "css/style.css"
//!
//! [templates]
//! template_dir = "./templates"
//!
//! [logging]
//! format = "pretty"
//! level = "info"
//! ```

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AtlasError, Result};

/// Default configuration file looked up by [`AtlasConfig::load`]
pub const DEFAULT_CONFIG_FILE: &str = "pigment-atlas.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PIGMENT_ATLAS_";

/// Relational store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite connection URL
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://pigments.sqlite3".to_string(),
        }
    }
}

impl DatabaseSettings {
    /// Database file named by the URL; `None` for in-memory databases
    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        let rest = self
            .url
            .strip_prefix("sqlite://")
            .or_else(|| self.url.strip_prefix("sqlite:"))?;
        let file = rest.split('?').next().unwrap_or_default();
        (!file.is_empty() && file != ":memory:").then(|| PathBuf::from(file))
    }
}

/// Generated site settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Build root every page is written under
    pub output_dir: PathBuf,

    /// URL prefix prepended to every internal link (no trailing slash)
    pub root_path: String,

    /// Directory copied verbatim into the build root
    pub assets_dir: Option<PathBuf>,

    /// Remove the build root before writing
    pub clean: bool,

    /// Emit `pigments/index.html`
    pub pigment_index: bool,

    /// Site title shown in every page header
    pub title: String,

    /// Stylesheet linked from every page, relative to the build root
    pub stylesheet: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("build"),
            root_path: String::new(),
            assets_dir: None,
            clean: true,
            pigment_index: true,
            title: "Watercolor Pigments".to_string(),
            stylesheet: None,
        }
    }
}

/// Template engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory of `<template>.hbs` files overriding the built-in ones
    pub template_dir: Option<PathBuf>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable output
    #[default]
    Pretty,
    /// Single-line human readable output
    Compact,
    /// Structured JSON lines
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Output format
    pub format: LogFormat,

    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            level: "info".to_string(),
        }
    }
}

/// Complete pigment-atlas configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Relational store settings
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Generated site settings
    #[serde(default)]
    pub site: SiteSettings,

    /// Template settings
    #[serde(default)]
    pub templates: TemplateSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AtlasConfig {
    /// Load configuration from `./pigment-atlas.toml` (if present) and the
    /// environment
    pub fn load() -> Result<Self> {
        Self::figment(Path::new(DEFAULT_CONFIG_FILE))
            .extract()
            .map_err(AtlasError::from)
    }

    /// Load configuration from a specific file
    ///
    /// Unlike [`AtlasConfig::load`], a missing file is an error.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use pigment_atlas::config::AtlasConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = AtlasConfig::load_from("./config/production.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AtlasError::Config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }

        Self::figment(path).extract().map_err(AtlasError::from)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Normalised link prefix: empty, or starting with `/` and without a
    /// trailing `/`
    #[must_use]
    pub fn root_path(&self) -> String {
        let trimmed = self.site.root_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}
