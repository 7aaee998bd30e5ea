//! Read-only relational view over manufacturers, paints and pigments
//!
//! The projection engine only ever talks to a [`Catalog`]. Two backends are
//! provided:
//!
//! - [`SqliteCatalog`]: the persistent store the importer fills
//! - [`MemoryCatalog`]: built straight from a parsed import file
//!
//! Both return rows in the same order so a site built from either is
//! byte-identical.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryCatalog;
pub use sqlite::SqliteCatalog;

/// Row identifier shared by every entity
pub type RowId = i64;

/// A manufacturer and how many paints it sells
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ManufacturerSummary {
    /// Manufacturer id
    pub id: RowId,
    /// Display name
    pub name: String,
    /// Number of paints owned by this manufacturer
    pub paint_count: i64,
}

/// A paint within one manufacturer's line
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PaintSummary {
    /// Paint display name
    pub name: String,
    /// Number of pigments the paint uses
    pub pigment_count: i64,
}

/// A paint together with its manufacturer's name
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PaintRecord {
    /// Paint id
    pub id: RowId,
    /// Owning manufacturer's display name
    pub manufacturer_name: String,
    /// Paint display name
    pub name: String,
}

/// The identifying pair of a pigment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct PigmentKey {
    /// Colour index code, e.g. `PR101`
    pub code: String,
    /// Pigment display name
    pub name: String,
}

impl PigmentKey {
    /// Build a key from its parts
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for PigmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code, self.name)
    }
}

/// A pigment row
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PigmentRecord {
    /// Pigment id
    pub id: RowId,
    /// Colour index code
    pub code: String,
    /// Display name
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
}

impl PigmentRecord {
    /// The (code, name) pair identifying this pigment
    #[must_use]
    pub fn key(&self) -> PigmentKey {
        PigmentKey::new(&self.code, &self.name)
    }
}

/// A paint whose only pigment is the one being queried
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ExclusiveUse {
    /// Manufacturer display name
    pub manufacturer_name: String,
    /// Paint display name
    pub paint_name: String,
}

/// A paint mixing the queried pigment with others
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BlendedUse {
    /// Manufacturer display name
    pub manufacturer_name: String,
    /// Paint display name
    pub paint_name: String,
    /// Total number of pigments in that paint
    pub pigment_count: i64,
}

/// An external reference for a pigment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PigmentLink {
    /// Who publishes the reference
    pub source: String,
    /// Where it lives
    pub url: String,
}

/// Read-only query contract consumed by the projection engine
///
/// Implementations must present a consistent snapshot for the duration of
/// one build and must return rows in the documented order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Every manufacturer with its paint count, ordered by name
    async fn list_manufacturers_with_paint_count(&self) -> Result<Vec<ManufacturerSummary>>;

    /// Paints of one manufacturer with their pigment counts, ordered by name
    async fn list_paints_of(&self, manufacturer_id: RowId) -> Result<Vec<PaintSummary>>;

    /// Every paint, ordered by manufacturer name then paint name
    async fn list_all_paints(&self) -> Result<Vec<PaintRecord>>;

    /// Pigments used by one paint, ordered by code then name
    async fn list_pigments_of(&self, paint_id: RowId) -> Result<Vec<PigmentKey>>;

    /// Every pigment, ordered by code then name
    async fn list_all_pigments(&self) -> Result<Vec<PigmentRecord>>;

    /// Paints in which this pigment is the only pigment, ordered by
    /// manufacturer then paint
    async fn list_exclusive_paints_of(&self, pigment_id: RowId) -> Result<Vec<ExclusiveUse>>;

    /// Paints in which this pigment is one of several, ordered by
    /// manufacturer then paint
    async fn list_blended_paints_of(&self, pigment_id: RowId) -> Result<Vec<BlendedUse>>;

    /// External references of one pigment, ordered by source then url
    async fn list_links_of(&self, pigment_id: RowId) -> Result<Vec<PigmentLink>>;
}
