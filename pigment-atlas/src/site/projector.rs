//! The projection engine
//!
//! Walks a [`Catalog`] once and plans every page of the site: its output
//! path, its template and its bindings. Nothing is rendered or written
//! here; the returned [`SitePlan`] is complete and link-checked, so a
//! failure leaves the build root untouched.

use serde::Serialize;

use super::context::{
    Chrome, ManufacturerEntry, ManufacturerIndexPage, PaintDetailPage, PaintEntry, PaintIndexPage,
    PigmentDetailPage, PigmentEntry, PigmentIndexPage, UseEntry,
};
use super::ledger::LinkLedger;
use super::paths::{PathScheme, SitePath};
use crate::catalog::{Catalog, PigmentRecord};
use crate::classify::{Cardinality, PaintKey, ResolvedUse, UsageIndex};
use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::slug::slug;
use crate::template::TemplateId;

/// Site-wide presentation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Title shown in every header
    pub site_title: String,
    /// Plan `pigments/index.html` and link it from every page
    pub pigment_index: bool,
    /// Stylesheet path relative to the build root
    pub stylesheet: Option<String>,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            site_title: "Watercolor Pigments".to_string(),
            pigment_index: true,
            stylesheet: None,
        }
    }
}

/// One planned page
#[derive(Debug, Clone)]
pub struct Page {
    /// Output path relative to the build root
    pub path: SitePath,
    /// Template rendering this page
    pub template: TemplateId,
    /// Template bindings
    pub bindings: serde_json::Value,
}

/// Every page of one build, in planning order
#[derive(Debug, Clone, Default)]
pub struct SitePlan {
    pages: Vec<Page>,
    link_count: usize,
}

impl SitePlan {
    /// Planned pages
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Page planned at `path`, if any
    #[must_use]
    pub fn page(&self, path: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.path.as_str() == path)
    }

    /// Number of planned pages
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True when nothing is planned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Internal links checked while planning
    #[must_use]
    pub const fn link_count(&self) -> usize {
        self.link_count
    }
}

/// Pages and ledger under construction
struct PlanBuilder {
    pages: Vec<Page>,
    ledger: LinkLedger,
    stylesheet: Option<SitePath>,
}

impl PlanBuilder {
    /// Builder with `assets` already claimed; every page links `stylesheet`
    fn new(assets: &[SitePath], stylesheet: Option<SitePath>) -> Result<Self> {
        let mut ledger = LinkLedger::default();
        for asset in assets {
            ledger.claim(asset, format!("asset {asset}"))?;
        }
        Ok(Self {
            pages: Vec::new(),
            ledger,
            stylesheet,
        })
    }

    fn add<T: Serialize>(
        &mut self,
        path: SitePath,
        owner: String,
        template: TemplateId,
        context: &T,
        links: &[SitePath],
    ) -> Result<()> {
        self.ledger.claim(&path, owner)?;
        for link in links.iter().chain(&self.stylesheet) {
            self.ledger.link(&path, link);
        }

        let bindings = serde_json::to_value(context).map_err(|e| AtlasError::Render {
            template: template.name().to_string(),
            message: format!("bindings for {path}: {e}"),
        })?;
        tracing::debug!(%path, %template, "page planned");
        self.pages.push(Page {
            path,
            template,
            bindings,
        });
        Ok(())
    }

    fn finish(self) -> Result<SitePlan> {
        let link_count = self.ledger.verify()?;
        Ok(SitePlan {
            pages: self.pages,
            link_count,
        })
    }
}

/// Plans a site from a catalog
///
/// # Examples
///
/// ```rust,no_run
/// use pigment_atlas::catalog::MemoryCatalog;
/// use pigment_atlas::import::CatalogSource;
/// use pigment_atlas::site::Projector;
///
/// # async fn example() -> anyhow::Result<()> {
/// let source = CatalogSource::from_path("pigments.json").await?;
/// let catalog = MemoryCatalog::from_source(&source);
/// let plan = Projector::default().project(&catalog).await?;
/// println!("{} pages, {} links", plan.len(), plan.link_count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Projector {
    scheme: PathScheme,
    options: ProjectionOptions,
}

impl Projector {
    /// Projector with an explicit path scheme and options
    #[must_use]
    pub const fn new(scheme: PathScheme, options: ProjectionOptions) -> Self {
        Self { scheme, options }
    }

    /// Projector configured from the `[site]` section
    #[must_use]
    pub fn from_config(config: &AtlasConfig) -> Self {
        Self::new(
            PathScheme::new(config.root_path()),
            ProjectionOptions {
                site_title: config.site.title.clone(),
                pigment_index: config.site.pigment_index,
                stylesheet: config.site.stylesheet.clone(),
            },
        )
    }

    /// Path scheme used for pages and links
    #[must_use]
    pub const fn scheme(&self) -> &PathScheme {
        &self.scheme
    }

    /// Plan every page of the site
    pub async fn project<C: Catalog + ?Sized>(&self, catalog: &C) -> Result<SitePlan> {
        self.project_with_assets(catalog, &[]).await
    }

    /// Plan every page of the site next to the static files in `assets`
    ///
    /// Asset paths are claimed before any page, so a page landing on one
    /// fails with [`AtlasError::SlugCollision`]. The configured stylesheet
    /// must be one of them.
    #[tracing::instrument(skip_all, fields(assets = assets.len()))]
    pub async fn project_with_assets<C: Catalog + ?Sized>(
        &self,
        catalog: &C,
        assets: &[SitePath],
    ) -> Result<SitePlan> {
        let stylesheet = self.options.stylesheet.as_deref().map(SitePath::asset).transpose()?;
        let mut plan = PlanBuilder::new(assets, stylesheet)?;

        let pigments = self.navigation_pass(catalog, &mut plan).await?;
        self.manufacturer_pass(catalog, &mut plan).await?;
        let usage = self.paint_pass(catalog, &mut plan).await?;
        self.pigment_pass(catalog, &pigments, &usage, &mut plan).await?;

        let plan = plan.finish()?;
        tracing::info!(pages = plan.len(), links = plan.link_count(), "site planned");
        Ok(plan)
    }

    /// Header bindings for a page, plus the links they add to it
    fn chrome(&self, page_title: impl Into<String>) -> (Chrome, Vec<SitePath>) {
        let home = self.scheme.manufacturer_index();
        let mut links = vec![home.clone()];

        let pigment_index_href = self.options.pigment_index.then(|| {
            let index = self.scheme.pigment_index();
            let href = self.scheme.href(&index);
            links.push(index);
            href
        });

        let stylesheet_href = self
            .options
            .stylesheet
            .as_deref()
            .and_then(|sheet| SitePath::asset(sheet).ok())
            .map(|sheet| self.scheme.href(&sheet));

        let chrome = Chrome {
            page_title: page_title.into(),
            site_title: self.options.site_title.clone(),
            home_href: self.scheme.href(&home),
            pigment_index_href,
            stylesheet_href,
        };
        (chrome, links)
    }

    fn pigment_entry(&self, code: &str, name: &str, path: &SitePath) -> PigmentEntry {
        PigmentEntry {
            code: code.to_string(),
            name: name.to_string(),
            href: self.scheme.href(path),
        }
    }

    /// Every pigment by (code, name); plans the pigment index when enabled
    #[tracing::instrument(skip_all)]
    async fn navigation_pass<C: Catalog + ?Sized>(
        &self,
        catalog: &C,
        plan: &mut PlanBuilder,
    ) -> Result<Vec<PigmentRecord>> {
        let pigments = catalog.list_all_pigments().await?;

        if self.options.pigment_index {
            let (chrome, mut links) = self.chrome("Pigments");
            let mut entries = Vec::with_capacity(pigments.len());
            for pigment in &pigments {
                let path = self.scheme.pigment_page(&pigment.key())?;
                entries.push(self.pigment_entry(&pigment.code, &pigment.name, &path));
                links.push(path);
            }

            plan.add(
                self.scheme.pigment_index(),
                "pigment index".to_string(),
                TemplateId::PigmentIndex,
                &PigmentIndexPage { chrome, pigments: entries },
                &links,
            )?;
        }

        tracing::info!(pigments = pigments.len(), "navigation pass complete");
        Ok(pigments)
    }

    /// One paint index per manufacturer, then the manufacturer index
    #[tracing::instrument(skip_all)]
    async fn manufacturer_pass<C: Catalog + ?Sized>(&self, catalog: &C, plan: &mut PlanBuilder) -> Result<()> {
        let manufacturers = catalog.list_manufacturers_with_paint_count().await?;
        let (index_chrome, mut index_links) = self.chrome("Manufacturers");
        let mut entries = Vec::with_capacity(manufacturers.len());

        for manufacturer in manufacturers {
            let index_path = self.scheme.paint_index(&manufacturer.name)?;
            let (chrome, mut links) = self.chrome(manufacturer.name.clone());

            let paints = catalog.list_paints_of(manufacturer.id).await?;
            let mut paint_entries = Vec::with_capacity(paints.len());
            for paint in paints {
                let path = self.scheme.paint_page(&manufacturer.name, &paint.name)?;
                paint_entries.push(PaintEntry {
                    href: self.scheme.href(&path),
                    name: paint.name,
                    pigment_count: paint.pigment_count,
                });
                links.push(path);
            }

            let manufacturer_slug = slug(&manufacturer.name);
            plan.add(
                index_path.clone(),
                format!("manufacturer {}", manufacturer.name),
                TemplateId::PaintIndex,
                &PaintIndexPage {
                    chrome,
                    manufacturer: manufacturer.name.clone(),
                    manufacturer_slug: manufacturer_slug.clone(),
                    paints: paint_entries,
                },
                &links,
            )?;

            entries.push(ManufacturerEntry {
                name: manufacturer.name,
                slug: manufacturer_slug,
                href: self.scheme.href(&index_path),
                paint_count: manufacturer.paint_count,
            });
            index_links.push(index_path);
        }

        tracing::info!(manufacturers = entries.len(), "manufacturer pass complete");
        plan.add(
            self.scheme.manufacturer_index(),
            "manufacturer index".to_string(),
            TemplateId::ManufacturerIndex,
            &ManufacturerIndexPage {
                chrome: index_chrome,
                manufacturers: entries,
            },
            &index_links,
        )
    }

    /// One page per paint; classifies every use into the returned index
    #[tracing::instrument(skip_all)]
    async fn paint_pass<C: Catalog + ?Sized>(&self, catalog: &C, plan: &mut PlanBuilder) -> Result<UsageIndex> {
        let paints = catalog.list_all_paints().await?;
        let mut usage = UsageIndex::default();

        for paint in paints {
            let key = PaintKey::new(&paint.manufacturer_name, &paint.name);
            let path = self.scheme.paint_page(&paint.manufacturer_name, &paint.name)?;
            let manufacturer_path = self.scheme.paint_index(&paint.manufacturer_name)?;

            let pigments = catalog.list_pigments_of(paint.id).await?;
            let cardinality = usage.record(key.clone(), path.clone(), &pigments)?;

            let (chrome, mut links) = self.chrome(paint.name.clone());
            links.push(manufacturer_path.clone());

            let mut entries = Vec::with_capacity(pigments.len());
            for pigment in &pigments {
                let pigment_path = self.scheme.pigment_page(pigment)?;
                entries.push(self.pigment_entry(&pigment.code, &pigment.name, &pigment_path));
                links.push(pigment_path);
            }

            plan.add(
                path,
                format!("paint {key}"),
                TemplateId::PaintDetail,
                &PaintDetailPage {
                    chrome,
                    manufacturer: paint.manufacturer_name,
                    manufacturer_href: self.scheme.href(&manufacturer_path),
                    paint_name: paint.name,
                    cardinality: cardinality.label(),
                    single_pigment: cardinality == Cardinality::Exclusive,
                    pigment_count: pigments.len(),
                    pigments: entries,
                },
                &links,
            )?;
        }

        tracing::info!(paints = usage.paint_count(), "paint pass complete");
        Ok(usage)
    }

    /// One page per pigment, listing its exclusive and blended uses
    #[tracing::instrument(skip_all)]
    async fn pigment_pass<C: Catalog + ?Sized>(
        &self,
        catalog: &C,
        pigments: &[PigmentRecord],
        usage: &UsageIndex,
        plan: &mut PlanBuilder,
    ) -> Result<()> {
        for pigment in pigments {
            let key = pigment.key();
            let path = self.scheme.pigment_page(&key)?;

            let exclusive = catalog.list_exclusive_paints_of(pigment.id).await?;
            let blended = catalog.list_blended_paints_of(pigment.id).await?;
            let references = catalog.list_links_of(pigment.id).await?;
            let resolved = usage.reconcile(&key, &exclusive, &blended)?;

            let (chrome, mut links) = self.chrome(format!("{} {}", pigment.code, pigment.name));
            let exclusive = self.use_entries(&resolved.exclusive, &mut links);
            let blended = self.use_entries(&resolved.blended, &mut links);

            plan.add(
                path,
                format!("pigment {key}"),
                TemplateId::PigmentDetail,
                &PigmentDetailPage {
                    chrome,
                    code: pigment.code.clone(),
                    name: pigment.name.clone(),
                    description: pigment.description.clone(),
                    exclusive,
                    blended,
                    links: references,
                },
                &links,
            )?;
        }

        tracing::info!(pigments = pigments.len(), "pigment pass complete");
        Ok(())
    }

    fn use_entries(&self, uses: &[ResolvedUse], links: &mut Vec<SitePath>) -> Vec<UseEntry> {
        uses.iter()
            .map(|resolved| {
                links.push(resolved.page.clone());
                UseEntry {
                    label: resolved.paint.label(),
                    href: self.scheme.href(&resolved.page),
                    pigment_count: resolved.pigment_count,
                }
            })
            .collect()
    }
}
