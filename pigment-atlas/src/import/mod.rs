//! Import of scraped catalog data
//!
//! The scraper writes one JSON document shaped as
//!
//! ```json
//! { "Acme": [ { "Red": [["PR101", "Red Iron Oxide"]] } ] }
//! ```
//!
//! i.e. manufacturer name → list of mappings from paint name → list of
//! `[code, name]` pigment pairs. [`CatalogSource`] is the validated form of
//! that document; it feeds both the SQLite importer and [`MemoryCatalog`].
//!
//! [`MemoryCatalog`]: crate::catalog::MemoryCatalog

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::catalog::{PigmentKey, PigmentLink};
use crate::error::{AtlasError, Result};

mod sqlite;

pub use sqlite::{apply_notes, import_catalog, replace_catalog};

/// Raw scraper document
type RawCatalog = BTreeMap<String, Vec<BTreeMap<String, Vec<Vec<String>>>>>;

/// A validated catalog ready to be loaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSource {
    /// Manufacturers, ordered by name
    pub manufacturers: Vec<ManufacturerSource>,
}

/// One manufacturer and its paints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerSource {
    /// Display name
    pub name: String,
    /// Paints in source order
    pub paints: Vec<PaintSource>,
}

/// One paint and the pigments it lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintSource {
    /// Display name
    pub name: String,
    /// Pigments in source order, without repeats
    pub pigments: Vec<PigmentKey>,
}

/// Row counts of a loaded catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Manufacturer rows
    pub manufacturers: usize,
    /// Paint rows
    pub paints: usize,
    /// Distinct pigments
    pub pigments: usize,
    /// Paint/pigment uses
    pub uses: usize,
}

impl CatalogSource {
    /// Parse and validate a scraper document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Read, parse and validate a scraper document from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json_str(&json)
    }

    fn from_raw(raw: RawCatalog) -> Result<Self> {
        let mut manufacturers = Vec::with_capacity(raw.len());
        let mut seen_manufacturers = HashSet::new();

        for (manufacturer, lines) in raw {
            let manufacturer = required("manufacturer name", &manufacturer, || {
                "manufacturer list".to_string()
            })?;
            if !seen_manufacturers.insert(manufacturer.clone()) {
                return Err(AtlasError::integrity(format!(
                    "manufacturer {manufacturer} is listed twice"
                )));
            }
            let mut seen = HashSet::new();
            let mut paints = Vec::new();

            for (paint, entries) in lines.into_iter().flatten() {
                let paint = required("paint name", &paint, || format!("manufacturer {manufacturer}"))?;
                if !seen.insert(paint.clone()) {
                    return Err(AtlasError::integrity(format!(
                        "paint {manufacturer} / {paint} is listed twice"
                    )));
                }

                let mut pigments: Vec<PigmentKey> = Vec::with_capacity(entries.len());
                for entry in entries {
                    let key = pigment_pair(&entry, &manufacturer, &paint)?;
                    if !pigments.contains(&key) {
                        pigments.push(key);
                    }
                }

                paints.push(PaintSource { name: paint, pigments });
            }

            manufacturers.push(ManufacturerSource {
                name: manufacturer,
                paints,
            });
        }

        manufacturers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { manufacturers })
    }

    /// Row counts this source produces once loaded
    #[must_use]
    pub fn summary(&self) -> ImportSummary {
        let paints = self.manufacturers.iter().flat_map(|m| &m.paints);
        let pigments: HashSet<&PigmentKey> = paints.clone().flat_map(|p| &p.pigments).collect();

        ImportSummary {
            manufacturers: self.manufacturers.len(),
            paints: paints.clone().count(),
            pigments: pigments.len(),
            uses: paints.map(|p| p.pigments.len()).sum(),
        }
    }
}

/// Trimmed, non-empty field value
fn required(field: &str, value: &str, owner: impl FnOnce() -> String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AtlasError::integrity(format!("empty {field} in {}", owner())));
    }
    Ok(trimmed.to_string())
}

fn pigment_pair(entry: &[String], manufacturer: &str, paint: &str) -> Result<PigmentKey> {
    let owner = || format!("paint {manufacturer} / {paint}");
    match entry {
        [code, name] => Ok(PigmentKey::new(
            required("pigment code", code, owner)?,
            required("pigment name", name, owner)?,
        )),
        _ => Err(AtlasError::integrity(format!(
            "pigment entry {entry:?} in {} is not a [code, name] pair",
            owner()
        ))),
    }
}

/// Curated description and references for one pigment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PigmentNote {
    /// Colour index code of an imported pigment
    pub code: String,
    /// Name of an imported pigment
    pub name: String,
    /// Replaces the stored description when present
    #[serde(default)]
    pub description: Option<String>,
    /// Replaces the stored references
    #[serde(default)]
    pub links: Vec<PigmentLink>,
}

impl PigmentNote {
    /// The pigment this note annotates
    #[must_use]
    pub fn key(&self) -> PigmentKey {
        PigmentKey::new(self.code.trim(), self.name.trim())
    }

    /// Parse a JSON array of notes
    pub fn list_from_json_str(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON array of notes from disk
    pub async fn list_from_path(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        let json = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::list_from_json_str(&json)
    }
}
