//! Cardinality classification of paint/pigment uses
//!
//! A paint with exactly one pigment is that pigment's *exclusive* use; a
//! paint with several is a *blended* use of each of them. The class belongs
//! to the paint and fans out to every pigment it contains.
//!
//! [`UsageIndex`] is filled during the paint pass and consumed, complete,
//! by the pigment pass.

use std::collections::HashMap;

use crate::catalog::{BlendedUse, ExclusiveUse, PigmentKey};
use crate::error::{AtlasError, Result};
use crate::site::SitePath;

/// How a paint uses each of its pigments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// No pigments at all
    Unused,
    /// Exactly one pigment
    Exclusive,
    /// This many pigments, always more than one
    Blended(usize),
}

impl Cardinality {
    /// Classify a paint by its pigment count
    #[must_use]
    pub const fn of(pigment_count: usize) -> Self {
        match pigment_count {
            0 => Self::Unused,
            1 => Self::Exclusive,
            n => Self::Blended(n),
        }
    }

    /// Lowercase label exposed to templates
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unused => "unused",
            Self::Exclusive => "exclusive",
            Self::Blended(_) => "blended",
        }
    }
}

/// A paint identified by display names, as the cardinality views report it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaintKey {
    /// Manufacturer display name
    pub manufacturer: String,
    /// Paint display name
    pub paint: String,
}

impl PaintKey {
    /// Build a key from its parts
    pub fn new(manufacturer: impl Into<String>, paint: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            paint: paint.into(),
        }
    }

    /// `"Acme - Red"`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.manufacturer, self.paint)
    }
}

impl std::fmt::Display for PaintKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.manufacturer, self.paint)
    }
}

/// Uses of one pigment gathered during the paint pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PigmentUsage {
    /// Paints made of this pigment alone
    pub exclusive: Vec<PaintKey>,
    /// Paints blending this pigment, with their pigment count
    pub blended: Vec<(PaintKey, usize)>,
}

/// One paint entry on a pigment page, tied to the paint's page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUse {
    /// The using paint
    pub paint: PaintKey,
    /// Where that paint's page is written
    pub page: SitePath,
    /// Total pigments in that paint
    pub pigment_count: usize,
}

/// Exclusive and blended uses of one pigment, ready to render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedUsage {
    /// Paints made of this pigment alone
    pub exclusive: Vec<ResolvedUse>,
    /// Paints blending this pigment
    pub blended: Vec<ResolvedUse>,
}

/// Accumulator threaded from the paint pass into the pigment pass
#[derive(Debug, Default)]
pub struct UsageIndex {
    paint_pages: HashMap<PaintKey, SitePath>,
    by_pigment: HashMap<PigmentKey, PigmentUsage>,
}

impl UsageIndex {
    /// Record a paint, its planned page, and its classified pigment uses
    pub fn record(&mut self, paint: PaintKey, page: SitePath, pigments: &[PigmentKey]) -> Result<Cardinality> {
        if self.paint_pages.contains_key(&paint) {
            return Err(AtlasError::integrity(format!("paint {paint} appears twice")));
        }

        let cardinality = Cardinality::of(pigments.len());
        for pigment in pigments {
            let usage = self.by_pigment.entry(pigment.clone()).or_default();
            match cardinality {
                Cardinality::Exclusive => usage.exclusive.push(paint.clone()),
                Cardinality::Blended(n) => usage.blended.push((paint.clone(), n)),
                Cardinality::Unused => {}
            }
        }

        self.paint_pages.insert(paint, page);
        Ok(cardinality)
    }

    /// Planned page of a recorded paint
    #[must_use]
    pub fn paint_page(&self, paint: &PaintKey) -> Option<&SitePath> {
        self.paint_pages.get(paint)
    }

    /// Uses recorded for a pigment; `None` when no paint used it
    #[must_use]
    pub fn usage_of(&self, pigment: &PigmentKey) -> Option<&PigmentUsage> {
        self.by_pigment.get(pigment)
    }

    /// Number of recorded paints
    #[must_use]
    pub fn paint_count(&self) -> usize {
        self.paint_pages.len()
    }

    /// Match the catalog's cardinality views for `pigment` against what the
    /// paint pass recorded, attaching each paint's page
    ///
    /// Any disagreement (a paint without a page, a paint in the wrong list,
    /// a different pigment count, or a recorded use the views omit) is a
    /// data-integrity error.
    pub fn reconcile(
        &self,
        pigment: &PigmentKey,
        exclusive: &[ExclusiveUse],
        blended: &[BlendedUse],
    ) -> Result<ResolvedUsage> {
        let empty = PigmentUsage::default();
        let recorded = self.usage_of(pigment).unwrap_or(&empty);
        let mut resolved = ResolvedUsage::default();

        for row in exclusive {
            let paint = PaintKey::new(&row.manufacturer_name, &row.paint_name);
            if !recorded.exclusive.contains(&paint) {
                return Err(mismatch(pigment, &paint, "exclusive"));
            }
            resolved.exclusive.push(ResolvedUse {
                page: self.page_for(pigment, &paint)?,
                paint,
                pigment_count: 1,
            });
        }

        for row in blended {
            let paint = PaintKey::new(&row.manufacturer_name, &row.paint_name);
            let count = usize::try_from(row.pigment_count).unwrap_or_default();
            if !recorded.blended.iter().any(|(p, n)| *p == paint && *n == count) {
                return Err(mismatch(pigment, &paint, &format!("blended ({count} pigments)")));
            }
            resolved.blended.push(ResolvedUse {
                page: self.page_for(pigment, &paint)?,
                paint,
                pigment_count: count,
            });
        }

        if resolved.exclusive.len() != recorded.exclusive.len() || resolved.blended.len() != recorded.blended.len() {
            return Err(AtlasError::integrity(format!(
                "pigment {pigment}: catalog reports {} exclusive / {} blended uses, paints list {} / {}",
                resolved.exclusive.len(),
                resolved.blended.len(),
                recorded.exclusive.len(),
                recorded.blended.len()
            )));
        }

        Ok(resolved)
    }

    fn page_for(&self, pigment: &PigmentKey, paint: &PaintKey) -> Result<SitePath> {
        self.paint_page(paint).cloned().ok_or_else(|| {
            AtlasError::integrity(format!("pigment {pigment} is used by paint {paint}, which has no page"))
        })
    }
}

fn mismatch(pigment: &PigmentKey, paint: &PaintKey, class: &str) -> AtlasError {
    AtlasError::integrity(format!(
        "catalog lists paint {paint} as a {class} use of pigment {pigment}, which its pigment list contradicts"
    ))
}
