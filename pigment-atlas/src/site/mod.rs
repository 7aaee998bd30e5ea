//! Static site projection
//!
//! The catalog is projected in four passes:
//!
//! 1. **navigation**: every pigment, for the pigment index
//! 2. **manufacturers**: one paint index per manufacturer, then the home page
//! 3. **paints**: one page per paint, classifying each of its pigment uses
//! 4. **pigments**: one page per pigment, listing exclusive and blended uses
//!
//! [`Projector`] plans the pages, [`render_plan`] renders them and
//! [`publish`] hands them to a [`DocumentSink`](crate::sink::DocumentSink).
//! [`SiteBuilder`] runs all three against a configured build root.

mod builder;
mod context;
mod ledger;
mod paths;
mod projector;

pub use builder::{publish, render_plan, BuildReport, RenderedPage, SiteBuilder};
pub use context::{
    Chrome, ManufacturerEntry, ManufacturerIndexPage, PaintDetailPage, PaintEntry, PaintIndexPage,
    PigmentDetailPage, PigmentEntry, PigmentIndexPage, UseEntry,
};
pub use ledger::LinkLedger;
pub use paths::{PathScheme, SitePath};
pub use projector::{Page, ProjectionOptions, Projector, SitePlan};
