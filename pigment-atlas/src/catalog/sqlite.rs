//! SQLite-backed catalog

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use super::{
    BlendedUse, Catalog, ExclusiveUse, ManufacturerSummary, PaintRecord, PaintSummary, PigmentKey,
    PigmentLink, PigmentRecord, RowId,
};
use crate::error::Result;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Per-paint pigment counts, shared by both cardinality views
const PIGMENT_COUNTS: &str = "WITH pigment_counts AS ( \
        SELECT paint_id, COUNT(*) AS pigment_count \
        FROM pigments_to_paint \
        GROUP BY paint_id \
    )";

/// Catalog stored in an SQLite database
///
/// Foreign keys are enforced, so every use row points at a real paint and
/// pigment and every paint at a real manufacturer.
///
/// # Examples
///
/// ```rust,no_run
/// use pigment_atlas::catalog::{Catalog, SqliteCatalog};
///
/// # async fn example() -> anyhow::Result<()> {
/// let catalog = SqliteCatalog::connect("sqlite://pigments.sqlite3").await?;
/// for maker in catalog.list_manufacturers_with_paint_count().await? {
///     println!("{} ({} paints)", maker.name, maker.paint_count);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    /// Open (creating if missing) the database at `url` and bring its
    /// schema up to date
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database, mostly for tests
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    /// Wrap an existing pool, running migrations on it
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        MIGRATOR.run(&pool).await?;
        Ok(Self { pool })
    }

    /// Underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Catalog for SqliteCatalog {
    async fn list_manufacturers_with_paint_count(&self) -> Result<Vec<ManufacturerSummary>> {
        let rows = sqlx::query_as(
            "SELECT m.id, m.name, COUNT(p.id) AS paint_count \
             FROM manufacturers AS m \
             LEFT JOIN paints AS p ON p.manufacturer_id = m.id \
             GROUP BY m.id, m.name \
             ORDER BY m.name, m.id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_paints_of(&self, manufacturer_id: RowId) -> Result<Vec<PaintSummary>> {
        let rows = sqlx::query_as(
            "SELECT p.name, COUNT(ptp.pigment_id) AS pigment_count \
             FROM paints AS p \
             LEFT JOIN pigments_to_paint AS ptp ON ptp.paint_id = p.id \
             WHERE p.manufacturer_id = ? \
             GROUP BY p.id, p.name \
             ORDER BY p.name, p.id",
        )
        .bind(manufacturer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_all_paints(&self) -> Result<Vec<PaintRecord>> {
        let rows = sqlx::query_as(
            "SELECT p.id, m.name AS manufacturer_name, p.name \
             FROM paints AS p \
             INNER JOIN manufacturers AS m ON p.manufacturer_id = m.id \
             ORDER BY m.name, p.name, p.id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_pigments_of(&self, paint_id: RowId) -> Result<Vec<PigmentKey>> {
        let rows = sqlx::query_as(
            "SELECT pg.code, pg.name \
             FROM pigments_to_paint AS ptp \
             INNER JOIN pigments AS pg ON ptp.pigment_id = pg.id \
             WHERE ptp.paint_id = ? \
             ORDER BY pg.code, pg.name",
        )
        .bind(paint_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_all_pigments(&self) -> Result<Vec<PigmentRecord>> {
        let rows = sqlx::query_as("SELECT id, code, name, description FROM pigments ORDER BY code, name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_exclusive_paints_of(&self, pigment_id: RowId) -> Result<Vec<ExclusiveUse>> {
        let sql = format!(
            "{PIGMENT_COUNTS} \
             SELECT m.name AS manufacturer_name, p.name AS paint_name \
             FROM pigments_to_paint AS ptp \
             INNER JOIN paints AS p ON ptp.paint_id = p.id \
             INNER JOIN manufacturers AS m ON p.manufacturer_id = m.id \
             INNER JOIN pigment_counts AS pc ON pc.paint_id = p.id \
             WHERE ptp.pigment_id = ? AND pc.pigment_count = 1 \
             ORDER BY m.name, p.name"
        );
        let rows = sqlx::query_as(&sql)
            .bind(pigment_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_blended_paints_of(&self, pigment_id: RowId) -> Result<Vec<BlendedUse>> {
        let sql = format!(
            "{PIGMENT_COUNTS} \
             SELECT m.name AS manufacturer_name, p.name AS paint_name, pc.pigment_count \
             FROM pigments_to_paint AS ptp \
             INNER JOIN paints AS p ON ptp.paint_id = p.id \
             INNER JOIN manufacturers AS m ON p.manufacturer_id = m.id \
             INNER JOIN pigment_counts AS pc ON pc.paint_id = p.id \
             WHERE ptp.pigment_id = ? AND pc.pigment_count > 1 \
             ORDER BY m.name, p.name"
        );
        let rows = sqlx::query_as(&sql)
            .bind(pigment_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_links_of(&self, pigment_id: RowId) -> Result<Vec<PigmentLink>> {
        let rows = sqlx::query_as(
            "SELECT source, url FROM pigment_links WHERE pigment_id = ? ORDER BY source, url",
        )
        .bind(pigment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
