//! Template bindings for each page kind

use serde::Serialize;

use crate::catalog::PigmentLink;

/// Bindings shared by every page (header and navigation)
#[derive(Debug, Clone, Serialize)]
pub struct Chrome {
    /// Page-specific title
    pub page_title: String,
    /// Site-wide title
    pub site_title: String,
    /// Link to the manufacturer index
    pub home_href: String,
    /// Link to the pigment index, when one is generated
    pub pigment_index_href: Option<String>,
    /// Stylesheet shipped with the static assets
    pub stylesheet_href: Option<String>,
}

/// `index.html`
#[derive(Debug, Clone, Serialize)]
pub struct ManufacturerIndexPage {
    /// Header bindings
    #[serde(flatten)]
    pub chrome: Chrome,
    /// Manufacturers ordered by name
    pub manufacturers: Vec<ManufacturerEntry>,
}

/// One row of the manufacturer index
#[derive(Debug, Clone, Serialize)]
pub struct ManufacturerEntry {
    /// Display name
    pub name: String,
    /// Slug used for the manufacturer's directory
    pub slug: String,
    /// Link to the manufacturer's paint index
    pub href: String,
    /// Paints sold
    pub paint_count: i64,
}

/// `paints/<manufacturer>/index.html`
#[derive(Debug, Clone, Serialize)]
pub struct PaintIndexPage {
    /// Header bindings
    #[serde(flatten)]
    pub chrome: Chrome,
    /// Manufacturer display name
    pub manufacturer: String,
    /// Manufacturer slug
    pub manufacturer_slug: String,
    /// Paints ordered by name
    pub paints: Vec<PaintEntry>,
}

/// One row of a paint index
#[derive(Debug, Clone, Serialize)]
pub struct PaintEntry {
    /// Display name
    pub name: String,
    /// Link to the paint page
    pub href: String,
    /// Pigments in the paint
    pub pigment_count: i64,
}

/// `paints/<manufacturer>/<paint>.html`
#[derive(Debug, Clone, Serialize)]
pub struct PaintDetailPage {
    /// Header bindings
    #[serde(flatten)]
    pub chrome: Chrome,
    /// Manufacturer display name
    pub manufacturer: String,
    /// Link back to the manufacturer's paint index
    pub manufacturer_href: String,
    /// Paint display name
    pub paint_name: String,
    /// `unused`, `exclusive` or `blended`
    pub cardinality: &'static str,
    /// True when the paint holds exactly one pigment
    pub single_pigment: bool,
    /// Number of pigments
    pub pigment_count: usize,
    /// Pigments ordered by code and name
    pub pigments: Vec<PigmentEntry>,
}

/// A pigment as listed on paint pages and the pigment index
#[derive(Debug, Clone, Serialize)]
pub struct PigmentEntry {
    /// Colour index code
    pub code: String,
    /// Display name
    pub name: String,
    /// Link to the pigment page
    pub href: String,
}

/// `pigments/index.html`
#[derive(Debug, Clone, Serialize)]
pub struct PigmentIndexPage {
    /// Header bindings
    #[serde(flatten)]
    pub chrome: Chrome,
    /// Every pigment ordered by code and name
    pub pigments: Vec<PigmentEntry>,
}

/// `pigments/<code>-<name>.html`
#[derive(Debug, Clone, Serialize)]
pub struct PigmentDetailPage {
    /// Header bindings
    #[serde(flatten)]
    pub chrome: Chrome,
    /// Colour index code
    pub code: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Paints made of this pigment alone
    pub exclusive: Vec<UseEntry>,
    /// Paints blending this pigment with others
    pub blended: Vec<UseEntry>,
    /// External references
    pub links: Vec<PigmentLink>,
}

/// A paint listed on a pigment page
#[derive(Debug, Clone, Serialize)]
pub struct UseEntry {
    /// `"<manufacturer> - <paint>"`
    pub label: String,
    /// Link to the paint page
    pub href: String,
    /// Pigments in that paint
    pub pigment_count: usize,
}
