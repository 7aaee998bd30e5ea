//! Plan, render and publish a whole site

use std::path::PathBuf;

use super::paths::SitePath;
use super::projector::{Projector, SitePlan};
use crate::catalog::Catalog;
use crate::config::AtlasConfig;
use crate::error::Result;
use crate::sink::{list_assets, DocumentSink, FsSink};
use crate::template::{HandlebarsRenderer, Renderer};

/// A page ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Output path relative to the build root
    pub path: SitePath,
    /// Rendered document
    pub html: String,
}

/// Outcome of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Pages written
    pub pages: usize,
    /// Internal links checked
    pub links: usize,
    /// Static asset files copied
    pub assets: usize,
    /// Build root
    pub output_dir: PathBuf,
}

/// Render every planned page, stopping at the first failure
pub fn render_plan(plan: &SitePlan, renderer: &dyn Renderer) -> Result<Vec<RenderedPage>> {
    plan.pages()
        .iter()
        .map(|page| {
            let html = renderer.render(page.template, &page.bindings)?;
            Ok(RenderedPage {
                path: page.path.clone(),
                html,
            })
        })
        .collect()
}

/// Write rendered pages in order; returns how many were written
pub async fn publish(pages: &[RenderedPage], sink: &dyn DocumentSink) -> Result<usize> {
    for page in pages {
        sink.write(&page.path, &page.html).await?;
        tracing::debug!(path = %page.path, bytes = page.html.len(), "page written");
    }
    Ok(pages.len())
}

/// Builds the site described by an [`AtlasConfig`]
///
/// Every page is planned and rendered before the build root is touched,
/// so a data or template error leaves the previous build in place. Static
/// assets are claimed in the same plan as the pages, and a build root that
/// holds the database, the assets or the templates is never cleaned.
pub struct SiteBuilder {
    projector: Projector,
    renderer: Box<dyn Renderer>,
    sink: FsSink,
    clean: bool,
    assets_dir: Option<PathBuf>,
    protected: Vec<PathBuf>,
}

impl std::fmt::Debug for SiteBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteBuilder")
            .field("projector", &self.projector)
            .field("sink", &self.sink)
            .field("clean", &self.clean)
            .field("assets_dir", &self.assets_dir)
            .field("protected", &self.protected)
            .finish_non_exhaustive()
    }
}

impl SiteBuilder {
    /// Builder using the configured templates, build root and assets
    pub fn from_config(config: &AtlasConfig) -> Result<Self> {
        let renderer = match &config.templates.template_dir {
            Some(dir) => HandlebarsRenderer::with_overrides(dir)?,
            None => HandlebarsRenderer::new()?,
        };

        let protected = config
            .database
            .file_path()
            .into_iter()
            .chain(config.site.assets_dir.clone())
            .chain(config.templates.template_dir.clone())
            .collect();

        Ok(Self {
            projector: Projector::from_config(config),
            renderer: Box::new(renderer),
            sink: FsSink::new(&config.site.output_dir)?,
            clean: config.site.clean,
            assets_dir: config.site.assets_dir.clone(),
            protected,
        })
    }

    /// Keep `path` out of the build root when cleaning is enabled
    #[must_use]
    pub fn protect(mut self, path: impl Into<PathBuf>) -> Self {
        self.protected.push(path.into());
        self
    }

    /// Replace the renderer
    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Build root pages are written to
    #[must_use]
    pub fn output_dir(&self) -> &std::path::Path {
        self.sink.root()
    }

    /// Project `catalog`, render every page, then write the site
    #[tracing::instrument(skip_all, fields(output_dir = %self.sink.root().display()))]
    pub async fn build<C: Catalog + ?Sized>(&self, catalog: &C) -> Result<BuildReport> {
        if self.clean {
            self.sink.check_clean_root(&self.protected)?;
        }
        let assets = match &self.assets_dir {
            Some(dir) => list_assets(dir)?,
            None => Vec::new(),
        };

        let plan = self.projector.project_with_assets(catalog, &assets).await?;
        let pages = render_plan(&plan, self.renderer.as_ref())?;
        tracing::info!(pages = pages.len(), "site rendered");

        if self.clean {
            self.sink.clean().await?;
        }
        let copied = match &self.assets_dir {
            Some(dir) => self.sink.copy_assets(dir, &assets).await?,
            None => 0,
        };
        let written = publish(&pages, &self.sink).await?;

        let report = BuildReport {
            pages: written,
            links: plan.link_count(),
            assets: copied,
            output_dir: self.sink.root().to_path_buf(),
        };
        tracing::info!(pages = report.pages, links = report.links, assets = report.assets, "site built");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::error::AtlasError;
    use crate::import::CatalogSource;
    use crate::sink::MockDocumentSink;
    use crate::template::MockRenderer;
    use tempfile::TempDir;

    const ACME: &str = r#"{"Acme": [{"Red": [["PR101","Red Iron Oxide"]],
        "Purple": [["PR101","Red Iron Oxide"],["PB29","Ultramarine"]]}]}"#;

    fn acme() -> MemoryCatalog {
        MemoryCatalog::from_source(&CatalogSource::from_json_str(ACME).unwrap())
    }

    fn config_in(temp: &TempDir) -> AtlasConfig {
        let mut config = AtlasConfig::default();
        config.site.output_dir = temp.path().join("build");
        config
    }

    #[tokio::test]
    async fn test_build_writes_every_page() {
        let temp = TempDir::new().unwrap();
        let builder = SiteBuilder::from_config(&config_in(&temp)).unwrap();

        let report = builder.build(&acme()).await.unwrap();

        assert_eq!(report.pages, 7);
        assert_eq!(report.assets, 0);
        assert!(report.links > report.pages);
        let red = std::fs::read_to_string(temp.path().join("build/paints/acme/red.html")).unwrap();
        assert!(red.contains("/pigments/pr101-red-iron-oxide.html"));
    }

    #[tokio::test]
    async fn test_render_failure_leaves_build_root_untouched() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        std::fs::create_dir_all(&config.site.output_dir).unwrap();
        std::fs::write(config.site.output_dir.join("index.html"), "previous").unwrap();

        let mut renderer = MockRenderer::new();
        renderer.expect_render().returning(|template, _| {
            Err(AtlasError::Render {
                template: template.name().to_string(),
                message: "boom".to_string(),
            })
        });
        let builder = SiteBuilder::from_config(&config).unwrap().with_renderer(Box::new(renderer));

        let err = builder.build(&acme()).await.unwrap_err();
        assert!(matches!(err, AtlasError::Render { .. }));
        assert_eq!(
            std::fs::read_to_string(config.site.output_dir.join("index.html")).unwrap(),
            "previous"
        );
    }

    #[tokio::test]
    async fn test_clean_removes_stale_pages() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        std::fs::create_dir_all(&config.site.output_dir).unwrap();
        std::fs::write(config.site.output_dir.join("stale.html"), "old").unwrap();

        SiteBuilder::from_config(&config).unwrap().build(&acme()).await.unwrap();
        assert!(!config.site.output_dir.join("stale.html").exists());
    }

    #[tokio::test]
    async fn test_assets_are_copied() {
        let temp = TempDir::new().unwrap();
        let assets = temp.path().join("static");
        std::fs::create_dir_all(assets.join("css")).unwrap();
        std::fs::write(assets.join("css/style.css"), "body {}").unwrap();

        let mut config = config_in(&temp);
        config.site.assets_dir = Some(assets);
        config.site.stylesheet = Some("css/style.css".to_string());

        let report = SiteBuilder::from_config(&config).unwrap().build(&acme()).await.unwrap();
        assert_eq!(report.assets, 1);

        let index = std::fs::read_to_string(config.site.output_dir.join("index.html")).unwrap();
        assert!(index.contains(r#"href="/css/style.css""#));
        assert!(config.site.output_dir.join("css/style.css").is_file());
    }

    #[tokio::test]
    async fn test_missing_stylesheet_fails_before_writing() {
        let temp = TempDir::new().unwrap();
        let mut config = config_in(&temp);
        config.site.stylesheet = Some("css/style.css".to_string());

        let err = SiteBuilder::from_config(&config).unwrap().build(&acme()).await.unwrap_err();
        assert!(matches!(err, AtlasError::DanglingLink { ref to, .. } if to == "css/style.css"), "{err}");
        assert!(!config.site.output_dir.exists());
    }

    #[tokio::test]
    async fn test_asset_on_a_page_path_fails_the_build() {
        let temp = TempDir::new().unwrap();
        let assets = temp.path().join("static");
        std::fs::create_dir_all(assets.join("pigments")).unwrap();
        std::fs::write(assets.join("pigments/index.html"), "hand written").unwrap();

        let mut config = config_in(&temp);
        config.site.assets_dir = Some(assets);

        let err = SiteBuilder::from_config(&config).unwrap().build(&acme()).await.unwrap_err();
        assert!(
            matches!(err, AtlasError::SlugCollision { ref path, .. } if path == "pigments/index.html"),
            "{err}"
        );
        assert!(!config.site.output_dir.exists());
    }

    #[tokio::test]
    async fn test_build_root_holding_the_database_is_not_cleaned() {
        let temp = TempDir::new().unwrap();
        let database = temp.path().join("pigments.sqlite3");
        std::fs::write(&database, "data").unwrap();

        let mut config = AtlasConfig::default();
        config.database.url = format!("sqlite://{}", database.display());
        config.site.output_dir = temp.path().to_path_buf();

        let err = SiteBuilder::from_config(&config).unwrap().build(&acme()).await.unwrap_err();
        assert!(matches!(err, AtlasError::Config(ref msg) if msg.contains("pigments.sqlite3")), "{err}");
        assert_eq!(std::fs::read_to_string(&database).unwrap(), "data");
        assert!(!temp.path().join("index.html").exists());

        // without cleaning nothing is deleted, so the build may proceed
        config.site.clean = false;
        SiteBuilder::from_config(&config).unwrap().build(&acme()).await.unwrap();
        assert_eq!(std::fs::read_to_string(&database).unwrap(), "data");
    }

    #[tokio::test]
    async fn test_build_root_holding_assets_is_not_cleaned() {
        let temp = TempDir::new().unwrap();
        let mut config = config_in(&temp);
        let assets = config.site.output_dir.join("static");
        std::fs::create_dir_all(&assets).unwrap();
        std::fs::write(assets.join("logo.svg"), "<svg/>").unwrap();
        config.site.assets_dir = Some(assets.clone());

        let err = SiteBuilder::from_config(&config).unwrap().build(&acme()).await.unwrap_err();
        assert!(matches!(err, AtlasError::Config(_)));
        assert!(assets.join("logo.svg").is_file());
    }

    #[tokio::test]
    async fn test_publish_stops_at_sink_failure() {
        let pages = vec![
            RenderedPage {
                path: crate::site::PathScheme::default().manufacturer_index(),
                html: "index".to_string(),
            },
            RenderedPage {
                path: crate::site::PathScheme::default().pigment_index(),
                html: "pigments".to_string(),
            },
        ];

        let mut sink = MockDocumentSink::new();
        sink.expect_write().times(1).returning(|path, _| {
            Err(AtlasError::Sink {
                path: PathBuf::from(path.as_str()),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        });

        let err = publish(&pages, &sink).await.unwrap_err();
        assert!(matches!(err, AtlasError::Sink { .. }));
    }
}
