//! Error types and error handling
//!
//! Every failure aborts the whole build. Nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T, E = AtlasError> = std::result::Result<T, E>;

/// Build error type
#[derive(Debug, Error)]
pub enum AtlasError {
    /// A record references something that does not exist, or a required
    /// field is missing or malformed
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Two entities map to the same output path
    #[error("Slug collision at {path}: {first} and {second}")]
    SlugCollision {
        /// Output path both entities claim
        path: String,
        /// Entity that claimed the path first
        first: String,
        /// Entity that tried to claim it again
        second: String,
    },

    /// A page links to a path no page is planned for
    #[error("Dangling link on {from}: {to} is never written")]
    DanglingLink {
        /// Page carrying the link
        from: String,
        /// Link target
        to: String,
    },

    /// A template failed to produce output for its bindings
    #[error("Render error in template {template}: {message}")]
    Render {
        /// Template name
        template: String,
        /// Underlying renderer message
        message: String,
    },

    /// A template could not be registered
    #[error("Template error: {0}")]
    Template(String),

    /// Writing an output file failed
    #[error("Sink error writing {}: {source}", path.display())]
    Sink {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Import source could not be parsed
    #[error("Import error: {0}")]
    Import(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error outside of page writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AtlasError {
    /// Shorthand for a [`AtlasError::DataIntegrity`] error
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::DataIntegrity(message.into())
    }

    /// True for every error caused by the source data rather than the
    /// environment
    #[must_use]
    pub const fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::DataIntegrity(_) | Self::SlugCollision { .. } | Self::DanglingLink { .. }
        )
    }
}

impl From<figment::Error> for AtlasError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}
