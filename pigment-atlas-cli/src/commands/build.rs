//! Site build command

use anyhow::{Context, Result};
use console::style;
use pigment_atlas::catalog::{MemoryCatalog, SqliteCatalog};
use pigment_atlas::config::AtlasConfig;
use pigment_atlas::import::CatalogSource;
use pigment_atlas::site::{BuildReport, SiteBuilder};
use std::path::PathBuf;

/// Project the catalog into a static site
#[derive(Debug, Clone, Default)]
pub struct BuildCommand {
    /// Build straight from a scraper document instead of the database
    pub json: Option<PathBuf>,
    /// Overrides `site.output_dir`
    pub output: Option<PathBuf>,
    /// Overrides `site.root_path`
    pub root_path: Option<String>,
}

impl BuildCommand {
    /// The configuration with command-line overrides applied
    #[must_use]
    pub fn effective_config(&self, config: &AtlasConfig) -> AtlasConfig {
        let mut config = config.clone();
        if let Some(output) = &self.output {
            config.site.output_dir.clone_from(output);
        }
        if let Some(root_path) = &self.root_path {
            config.site.root_path.clone_from(root_path);
        }
        config
    }

    /// Execute the command
    pub async fn execute(&self, config: &AtlasConfig) -> Result<()> {
        let source = self
            .json
            .as_ref()
            .map_or_else(|| config.database.url.clone(), |json| json.display().to_string());
        println!(
            "{} {} {}",
            style("Building").green().bold(),
            style("site from").bold(),
            style(source).cyan().bold()
        );

        let spinner = crate::spinner("Projecting catalog...")?;
        let report = self.run(config).await;
        spinner.finish_and_clear();

        let report = report?;
        Self::print_success(&report);
        Ok(())
    }

    /// Build the site and report what was written
    pub async fn run(&self, config: &AtlasConfig) -> Result<BuildReport> {
        let config = self.effective_config(config);
        let builder = SiteBuilder::from_config(&config).context("Failed to prepare site builder")?;

        if let Some(json) = &self.json {
            let source = CatalogSource::from_path(json)
                .await
                .with_context(|| format!("Failed to read catalog {}", json.display()))?;
            tracing::debug!(path = %json.display(), "building from scraper document");
            let builder = builder.protect(json.clone());
            return Ok(builder.build(&MemoryCatalog::from_source(&source)).await?);
        }

        let catalog = SqliteCatalog::connect(&config.database.url)
            .await
            .with_context(|| format!("Failed to open database {}", config.database.url))?;
        let report = builder.build(&catalog).await;
        catalog.close().await;
        Ok(report?)
    }

    fn print_success(report: &BuildReport) {
        println!("{}", style("✓ Site built successfully!").green().bold());
        println!(
            "  {} pages, {} links checked, {} assets",
            style(report.pages).cyan(),
            style(report.links).cyan(),
            style(report.assets).cyan()
        );
        println!(
            "  {} {}",
            style("Output:").dim(),
            style(report.output_dir.display()).cyan().underlined()
        );
    }
}
