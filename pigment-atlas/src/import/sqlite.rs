//! Loading a [`CatalogSource`] into the SQLite store

use sqlx::SqliteConnection;
use std::collections::HashMap;

use super::{CatalogSource, ImportSummary, PigmentNote};
use crate::catalog::{PigmentKey, RowId, SqliteCatalog};
use crate::error::{AtlasError, Result};

/// Statements wiping every catalog table, children first
const CLEAR_STATEMENTS: [&str; 6] = [
    "DELETE FROM pigments_to_paint",
    "DELETE FROM pigment_links",
    "DELETE FROM paints",
    "DELETE FROM pigments",
    "DELETE FROM manufacturers",
    "DELETE FROM sqlite_sequence WHERE name IN \
     ('manufacturers', 'paints', 'pigments', 'pigment_links', 'pigments_to_paint')",
];

/// Replace the whole stored catalog with `source`
///
/// Runs in one transaction: either the previous catalog survives untouched
/// or it is fully replaced. Id sequences restart, so importing the same
/// document twice yields the same ids.
#[tracing::instrument(skip_all)]
pub async fn replace_catalog(catalog: &SqliteCatalog, source: &CatalogSource) -> Result<ImportSummary> {
    let (summary, _) = import_catalog(catalog, source, &[]).await?;
    Ok(summary)
}

/// Replace the stored catalog with `source` and annotate it with `notes`
///
/// Both steps share one transaction, so a note naming a pigment missing
/// from `source` leaves the previous catalog in place.
#[tracing::instrument(skip_all, fields(notes = notes.len()))]
pub async fn import_catalog(
    catalog: &SqliteCatalog,
    source: &CatalogSource,
    notes: &[PigmentNote],
) -> Result<(ImportSummary, usize)> {
    let mut tx = catalog.pool().begin().await?;

    let summary = insert_source(&mut *tx, source).await?;
    let applied = insert_notes(&mut *tx, notes).await?;

    tx.commit().await?;

    tracing::info!(
        manufacturers = summary.manufacturers,
        paints = summary.paints,
        pigments = summary.pigments,
        uses = summary.uses,
        notes = applied,
        "catalog replaced"
    );
    Ok((summary, applied))
}

/// Attach descriptions and references to already imported pigments
///
/// Each note replaces the stored links of its pigment. A note naming a
/// pigment no paint uses fails the whole batch.
#[tracing::instrument(skip_all, fields(notes = notes.len()))]
pub async fn apply_notes(catalog: &SqliteCatalog, notes: &[PigmentNote]) -> Result<usize> {
    let mut tx = catalog.pool().begin().await?;
    let applied = insert_notes(&mut *tx, notes).await?;
    tx.commit().await?;
    Ok(applied)
}

async fn insert_source(conn: &mut SqliteConnection, source: &CatalogSource) -> Result<ImportSummary> {
    for statement in CLEAR_STATEMENTS {
        sqlx::query(statement).execute(&mut *conn).await?;
    }

    let mut pigment_ids: HashMap<&PigmentKey, RowId> = HashMap::new();
    let mut summary = ImportSummary::default();

    for manufacturer in &source.manufacturers {
        let manufacturer_id = sqlx::query("INSERT INTO manufacturers (name) VALUES (?)")
            .bind(&manufacturer.name)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid();
        summary.manufacturers += 1;

        for paint in &manufacturer.paints {
            let paint_id = sqlx::query("INSERT INTO paints (manufacturer_id, name) VALUES (?, ?)")
                .bind(manufacturer_id)
                .bind(&paint.name)
                .execute(&mut *conn)
                .await?
                .last_insert_rowid();
            summary.paints += 1;

            for key in &paint.pigments {
                let pigment_id = if let Some(id) = pigment_ids.get(key) {
                    *id
                } else {
                    let id = sqlx::query("INSERT INTO pigments (code, name) VALUES (?, ?)")
                        .bind(&key.code)
                        .bind(&key.name)
                        .execute(&mut *conn)
                        .await?
                        .last_insert_rowid();
                    pigment_ids.insert(key, id);
                    id
                };

                let inserted = sqlx::query(
                    "INSERT OR IGNORE INTO pigments_to_paint (paint_id, pigment_id) VALUES (?, ?)",
                )
                .bind(paint_id)
                .bind(pigment_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();
                summary.uses += usize::try_from(inserted).unwrap_or_default();
            }
        }

        tracing::debug!(manufacturer = %manufacturer.name, paints = manufacturer.paints.len(), "imported manufacturer");
    }

    summary.pigments = pigment_ids.len();
    Ok(summary)
}

async fn insert_notes(conn: &mut SqliteConnection, notes: &[PigmentNote]) -> Result<usize> {
    for note in notes {
        let key = note.key();
        let pigment_id: Option<RowId> =
            sqlx::query_scalar("SELECT id FROM pigments WHERE code = ? AND name = ?")
                .bind(&key.code)
                .bind(&key.name)
                .fetch_optional(&mut *conn)
                .await?;
        let pigment_id =
            pigment_id.ok_or_else(|| AtlasError::integrity(format!("note for unknown pigment {key}")))?;

        if let Some(description) = &note.description {
            sqlx::query("UPDATE pigments SET description = ? WHERE id = ?")
                .bind(description)
                .bind(pigment_id)
                .execute(&mut *conn)
                .await?;
        }

        sqlx::query("DELETE FROM pigment_links WHERE pigment_id = ?")
            .bind(pigment_id)
            .execute(&mut *conn)
            .await?;

        for link in &note.links {
            sqlx::query("INSERT INTO pigment_links (pigment_id, source, url) VALUES (?, ?, ?)")
                .bind(pigment_id)
                .bind(&link.source)
                .bind(&link.url)
                .execute(&mut *conn)
                .await?;
        }
    }

    Ok(notes.len())
}
