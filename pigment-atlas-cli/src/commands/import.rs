//! Catalog import command

use anyhow::{Context, Result};
use console::style;
use pigment_atlas::import::{import_catalog, CatalogSource, ImportSummary, PigmentNote};
use pigment_atlas::{catalog::SqliteCatalog, config::AtlasConfig};
use std::path::PathBuf;

/// Replace the relational store's contents with a scraper document
#[derive(Debug, Clone)]
pub struct ImportCommand {
    source: PathBuf,
    notes: Option<PathBuf>,
}

/// What an import loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows loaded from the scraper document
    pub summary: ImportSummary,
    /// Pigments annotated from the notes file
    pub notes: usize,
}

impl ImportCommand {
    /// Create a new command instance
    ///
    /// # Arguments
    ///
    /// * `source` - Scraper JSON document
    /// * `notes` - Optional JSON array of pigment descriptions and links
    pub fn new(source: PathBuf, notes: Option<PathBuf>) -> Result<Self> {
        if !source.is_file() {
            anyhow::bail!("Source file not found: {}", source.display());
        }
        if let Some(notes) = &notes {
            if !notes.is_file() {
                anyhow::bail!("Notes file not found: {}", notes.display());
            }
        }
        Ok(Self { source, notes })
    }

    /// Execute the command
    pub async fn execute(&self, config: &AtlasConfig) -> Result<()> {
        println!(
            "{} {} {}",
            style("Importing").green().bold(),
            style(self.source.display()).cyan().bold(),
            style(format!("into {}", config.database.url)).dim()
        );

        let spinner = crate::spinner("Loading catalog...")?;
        let report = self.run(config).await;
        spinner.finish_and_clear();

        let report = report?;
        Self::print_success(&report);
        Ok(())
    }

    /// Load the document (and notes) into the configured store
    ///
    /// Both files are read before the store is opened and loaded in one
    /// transaction.
    pub async fn run(&self, config: &AtlasConfig) -> Result<ImportReport> {
        let source = CatalogSource::from_path(&self.source)
            .await
            .with_context(|| format!("Failed to read catalog {}", self.source.display()))?;
        let notes = match &self.notes {
            Some(path) => PigmentNote::list_from_path(path)
                .await
                .with_context(|| format!("Failed to read notes {}", path.display()))?,
            None => Vec::new(),
        };

        let catalog = SqliteCatalog::connect(&config.database.url)
            .await
            .with_context(|| format!("Failed to open database {}", config.database.url))?;

        let result = import_catalog(&catalog, &source, &notes).await;
        catalog.close().await;

        let (summary, notes) = result?;
        Ok(ImportReport { summary, notes })
    }

    fn print_success(report: &ImportReport) {
        let summary = &report.summary;
        println!("{}", style("✓ Catalog imported").green().bold());
        println!("  {} manufacturers", style(summary.manufacturers).cyan());
        println!("  {} paints", style(summary.paints).cyan());
        println!("  {} pigments ({} uses)", style(summary.pigments).cyan(), summary.uses);
        if report.notes > 0 {
            println!("  {} pigment notes applied", style(report.notes).cyan());
        }
    }
}
