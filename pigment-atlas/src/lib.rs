//! pigment-atlas: a static hypertext atlas of paint manufacturers, paints
//! and pigments
//!
//! A scraped catalog is loaded into a relational store, then projected into
//! a tree of linked HTML pages:
//!
//! - `index.html` lists manufacturers
//! - `paints/<manufacturer>/index.html` lists a manufacturer's paints
//! - `paints/<manufacturer>/<paint>.html` lists a paint's pigments
//! - `pigments/<code>-<name>.html` lists the paints using a pigment, split
//!   into single-pigment paints and blends
//! - `pigments/index.html` lists every pigment
//!
//! Every internal link resolves to a generated page, and building the same
//! catalog twice produces byte-identical output.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pigment_atlas::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AtlasConfig::load()?;
//!     pigment_atlas::observability::init(&config.logging)?;
//!
//!     // Load the scraper output into SQLite
//!     let catalog = SqliteCatalog::connect(&config.database.url).await?;
//!     let source = CatalogSource::from_path("pigments.json").await?;
//!     replace_catalog(&catalog, &source).await?;
//!
//!     // Project it into ./build
//!     let report = SiteBuilder::from_config(&config)?.build(&catalog).await?;
//!     println!("{} pages written to {}", report.pages, report.output_dir.display());
//!
//!     catalog.close().await;
//!     Ok(())
//! }
//! ```

#![allow(clippy::missing_errors_doc)]

pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod import;
pub mod observability;
pub mod sink;
pub mod site;
pub mod slug;
pub mod template;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use pigment_atlas::prelude::*;
    //! ```

    pub use crate::catalog::{Catalog, MemoryCatalog, PigmentKey, SqliteCatalog};
    pub use crate::classify::{Cardinality, PaintKey, UsageIndex};
    pub use crate::config::AtlasConfig;
    pub use crate::error::{AtlasError, Result};
    pub use crate::import::{apply_notes, import_catalog, replace_catalog, CatalogSource, PigmentNote};
    pub use crate::sink::{DocumentSink, FsSink};
    pub use crate::site::{BuildReport, PathScheme, Projector, SiteBuilder, SitePath, SitePlan};
    pub use crate::slug::slug;
    pub use crate::template::{HandlebarsRenderer, Renderer, TemplateId};
}
