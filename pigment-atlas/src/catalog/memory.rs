//! In-memory catalog built from an import document
//!
//! Assigns ids in the same order the SQLite importer does, so both backends
//! agree row for row.

use async_trait::async_trait;
use std::collections::HashMap;

use super::{
    BlendedUse, Catalog, ExclusiveUse, ManufacturerSummary, PaintRecord, PaintSummary, PigmentKey,
    PigmentLink, PigmentRecord, RowId,
};
use crate::error::{AtlasError, Result};
use crate::import::{CatalogSource, PigmentNote};

#[derive(Debug, Clone)]
struct Manufacturer {
    id: RowId,
    name: String,
}

#[derive(Debug, Clone)]
struct Paint {
    id: RowId,
    manufacturer_id: RowId,
    name: String,
}

#[derive(Debug, Clone)]
struct Pigment {
    record: PigmentRecord,
    links: Vec<PigmentLink>,
}

/// Catalog held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    manufacturers: Vec<Manufacturer>,
    paints: Vec<Paint>,
    pigments: Vec<Pigment>,
    /// (paint id, pigment id)
    uses: Vec<(RowId, RowId)>,
}

impl MemoryCatalog {
    /// Build a catalog from a validated import document
    #[must_use]
    pub fn from_source(source: &CatalogSource) -> Self {
        let mut catalog = Self::default();
        let mut pigment_ids: HashMap<&PigmentKey, RowId> = HashMap::new();

        for manufacturer in &source.manufacturers {
            let manufacturer_id = next_id(catalog.manufacturers.len());
            catalog.manufacturers.push(Manufacturer {
                id: manufacturer_id,
                name: manufacturer.name.clone(),
            });

            for paint in &manufacturer.paints {
                let paint_id = next_id(catalog.paints.len());
                catalog.paints.push(Paint {
                    id: paint_id,
                    manufacturer_id,
                    name: paint.name.clone(),
                });

                for key in &paint.pigments {
                    let pigment_id = *pigment_ids.entry(key).or_insert_with(|| {
                        let id = next_id(catalog.pigments.len());
                        catalog.pigments.push(Pigment {
                            record: PigmentRecord {
                                id,
                                code: key.code.clone(),
                                name: key.name.clone(),
                                description: None,
                            },
                            links: Vec::new(),
                        });
                        id
                    });
                    if !catalog.uses.contains(&(paint_id, pigment_id)) {
                        catalog.uses.push((paint_id, pigment_id));
                    }
                }
            }
        }

        catalog
    }

    /// Attach descriptions and references, replacing existing links
    pub fn with_notes(mut self, notes: &[PigmentNote]) -> Result<Self> {
        for note in notes {
            let key = note.key();
            let pigment = self
                .pigments
                .iter_mut()
                .find(|p| p.record.key() == key)
                .ok_or_else(|| AtlasError::integrity(format!("note for unknown pigment {key}")))?;

            if let Some(description) = &note.description {
                pigment.record.description = Some(description.clone());
            }
            pigment.links.clone_from(&note.links);
        }
        Ok(self)
    }

    fn manufacturer_name(&self, id: RowId) -> Result<&str> {
        self.manufacturers
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.as_str())
            .ok_or_else(|| AtlasError::integrity(format!("paint references missing manufacturer {id}")))
    }

    fn pigment_count(&self, paint_id: RowId) -> i64 {
        let count = self.uses.iter().filter(|(paint, _)| *paint == paint_id).count();
        i64::try_from(count).unwrap_or(i64::MAX)
    }

    /// Paints using `pigment_id`, with their manufacturer name and pigment count
    fn uses_of(&self, pigment_id: RowId) -> Result<Vec<(String, String, i64)>> {
        let mut rows = Vec::new();
        for (paint_id, _) in self.uses.iter().filter(|(_, pigment)| *pigment == pigment_id) {
            let paint = self
                .paints
                .iter()
                .find(|p| p.id == *paint_id)
                .ok_or_else(|| AtlasError::integrity(format!("use references missing paint {paint_id}")))?;
            rows.push((
                self.manufacturer_name(paint.manufacturer_id)?.to_string(),
                paint.name.clone(),
                self.pigment_count(paint.id),
            ));
        }
        rows.sort();
        Ok(rows)
    }
}

const fn next_id(len: usize) -> RowId {
    len as RowId + 1
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn list_manufacturers_with_paint_count(&self) -> Result<Vec<ManufacturerSummary>> {
        let mut rows: Vec<_> = self
            .manufacturers
            .iter()
            .map(|m| {
                let count = self.paints.iter().filter(|p| p.manufacturer_id == m.id).count();
                ManufacturerSummary {
                    id: m.id,
                    name: m.name.clone(),
                    paint_count: i64::try_from(count).unwrap_or(i64::MAX),
                }
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn list_paints_of(&self, manufacturer_id: RowId) -> Result<Vec<PaintSummary>> {
        let mut paints: Vec<_> = self
            .paints
            .iter()
            .filter(|p| p.manufacturer_id == manufacturer_id)
            .collect();
        paints.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(paints
            .into_iter()
            .map(|p| PaintSummary {
                name: p.name.clone(),
                pigment_count: self.pigment_count(p.id),
            })
            .collect())
    }

    async fn list_all_paints(&self) -> Result<Vec<PaintRecord>> {
        let mut rows = Vec::with_capacity(self.paints.len());
        for paint in &self.paints {
            rows.push(PaintRecord {
                id: paint.id,
                manufacturer_name: self.manufacturer_name(paint.manufacturer_id)?.to_string(),
                name: paint.name.clone(),
            });
        }
        rows.sort_by(|a, b| {
            (&a.manufacturer_name, &a.name, a.id).cmp(&(&b.manufacturer_name, &b.name, b.id))
        });
        Ok(rows)
    }

    async fn list_pigments_of(&self, paint_id: RowId) -> Result<Vec<PigmentKey>> {
        let mut keys = Vec::new();
        for (_, pigment_id) in self.uses.iter().filter(|(paint, _)| *paint == paint_id) {
            let pigment = self
                .pigments
                .iter()
                .find(|p| p.record.id == *pigment_id)
                .ok_or_else(|| AtlasError::integrity(format!("use references missing pigment {pigment_id}")))?;
            keys.push(pigment.record.key());
        }
        keys.sort();
        Ok(keys)
    }

    async fn list_all_pigments(&self) -> Result<Vec<PigmentRecord>> {
        let mut rows: Vec<_> = self.pigments.iter().map(|p| p.record.clone()).collect();
        rows.sort_by(|a, b| (&a.code, &a.name).cmp(&(&b.code, &b.name)));
        Ok(rows)
    }

    async fn list_exclusive_paints_of(&self, pigment_id: RowId) -> Result<Vec<ExclusiveUse>> {
        Ok(self
            .uses_of(pigment_id)?
            .into_iter()
            .filter(|(_, _, count)| *count == 1)
            .map(|(manufacturer_name, paint_name, _)| ExclusiveUse {
                manufacturer_name,
                paint_name,
            })
            .collect())
    }

    async fn list_blended_paints_of(&self, pigment_id: RowId) -> Result<Vec<BlendedUse>> {
        Ok(self
            .uses_of(pigment_id)?
            .into_iter()
            .filter(|(_, _, count)| *count > 1)
            .map(|(manufacturer_name, paint_name, pigment_count)| BlendedUse {
                manufacturer_name,
                paint_name,
                pigment_count,
            })
            .collect())
    }

    async fn list_links_of(&self, pigment_id: RowId) -> Result<Vec<PigmentLink>> {
        let mut links = self
            .pigments
            .iter()
            .find(|p| p.record.id == pigment_id)
            .map(|p| p.links.clone())
            .unwrap_or_default();
        links.sort_by(|a, b| (&a.source, &a.url).cmp(&(&b.source, &b.url)));
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SqliteCatalog;
    use crate::import::replace_catalog;

    const PALETTE: &str = r#"{
        "Acme": [{"Red": [["PR101","Red Iron Oxide"]],
                  "Purple": [["PR101","Red Iron Oxide"],["PB29","Ultramarine"]],
                  "Empty": []}],
        "Brightline": [{"Sienna": [["PY42","Yellow Iron Oxide"],["PR101","Red Iron Oxide"],["PBk9","Bone Black"]]}],
        "Unlisted": [{}]
    }"#;

    #[tokio::test]
    async fn test_matches_sqlite_row_for_row() {
        let source = CatalogSource::from_json_str(PALETTE).unwrap();
        let memory = MemoryCatalog::from_source(&source);
        let sqlite = SqliteCatalog::in_memory().await.unwrap();
        replace_catalog(&sqlite, &source).await.unwrap();

        let makers = memory.list_manufacturers_with_paint_count().await.unwrap();
        assert_eq!(makers, sqlite.list_manufacturers_with_paint_count().await.unwrap());
        for maker in &makers {
            assert_eq!(
                memory.list_paints_of(maker.id).await.unwrap(),
                sqlite.list_paints_of(maker.id).await.unwrap()
            );
        }

        let paints = memory.list_all_paints().await.unwrap();
        assert_eq!(paints, sqlite.list_all_paints().await.unwrap());
        for paint in &paints {
            assert_eq!(
                memory.list_pigments_of(paint.id).await.unwrap(),
                sqlite.list_pigments_of(paint.id).await.unwrap()
            );
        }

        let pigments = memory.list_all_pigments().await.unwrap();
        assert_eq!(pigments, sqlite.list_all_pigments().await.unwrap());
        for pigment in &pigments {
            assert_eq!(
                memory.list_exclusive_paints_of(pigment.id).await.unwrap(),
                sqlite.list_exclusive_paints_of(pigment.id).await.unwrap()
            );
            assert_eq!(
                memory.list_blended_paints_of(pigment.id).await.unwrap(),
                sqlite.list_blended_paints_of(pigment.id).await.unwrap()
            );
        }
    }

    #[tokio::test]
    async fn test_manufacturer_without_paints() {
        let catalog = MemoryCatalog::from_source(&CatalogSource::from_json_str(PALETTE).unwrap());
        let makers = catalog.list_manufacturers_with_paint_count().await.unwrap();
        let unlisted = makers.iter().find(|m| m.name == "Unlisted").unwrap();
        assert_eq!(unlisted.paint_count, 0);
        assert!(catalog.list_paints_of(unlisted.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notes_replace_links() {
        let source = CatalogSource::from_json_str(PALETTE).unwrap();
        let notes = PigmentNote::list_from_json_str(
            r#"[{"code": "PB29", "name": "Ultramarine", "description": "Sodium aluminosilicate",
                 "links": [{"source": "Pigment Database", "url": "https://example.org/pb29"}]}]"#,
        )
        .unwrap();
        let catalog = MemoryCatalog::from_source(&source).with_notes(&notes).unwrap();

        let pb29 = catalog
            .list_all_pigments()
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.code == "PB29")
            .unwrap();
        assert_eq!(pb29.description.as_deref(), Some("Sodium aluminosilicate"));
        assert_eq!(catalog.list_links_of(pb29.id).await.unwrap().len(), 1);
    }

    #[test]
    fn test_note_for_unknown_pigment() {
        let source = CatalogSource::from_json_str(PALETTE).unwrap();
        let notes = PigmentNote::list_from_json_str(r#"[{"code": "PG7", "name": "Phthalo Green"}]"#).unwrap();
        let err = MemoryCatalog::from_source(&source).with_notes(&notes).unwrap_err();
        assert!(err.is_data_error());
    }
}
