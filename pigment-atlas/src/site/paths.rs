//! Output path scheme
//!
//! Every page path and every internal link comes from [`PathScheme`]; a
//! link is only ever a page path with the root prefix in front, which is
//! what keeps generated links and written files in agreement.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::catalog::PigmentKey;
use crate::error::{AtlasError, Result};
use crate::slug::slug;

/// Page path relative to the build root, `/`-separated
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SitePath(String);

impl SitePath {
    fn from_segments(segments: &[&str]) -> Self {
        Self(segments.join("/"))
    }

    /// Path of a static file copied into the build root, e.g. `css/style.css`
    ///
    /// A leading `/` is ignored; empty, `.` and `..` segments are refused.
    pub fn asset(relative: &str) -> Result<Self> {
        let trimmed = relative.trim_start_matches('/');
        let segments: Vec<&str> = trimmed.split('/').collect();
        if trimmed.is_empty() || segments.iter().any(|s| s.is_empty() || *s == "." || *s == "..") {
            return Err(AtlasError::Config(format!(
                "asset path {relative:?} is not a plain path inside the build root"
            )));
        }
        Ok(Self::from_segments(&segments))
    }

    /// The path as written in links, without the root prefix
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem location of this page under `root`
    #[must_use]
    pub fn to_fs_path(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl fmt::Display for SitePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps entities to page paths and page paths to hrefs
#[derive(Debug, Clone, Default)]
pub struct PathScheme {
    root_path: String,
}

impl PathScheme {
    /// Scheme prefixing every link with `root_path` (empty, or `/` + prefix)
    pub fn new(root_path: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }

    /// Prefix put in front of every link
    #[must_use]
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// `index.html`
    #[must_use]
    pub fn manufacturer_index(&self) -> SitePath {
        SitePath::from_segments(&["index.html"])
    }

    /// `pigments/index.html`
    #[must_use]
    pub fn pigment_index(&self) -> SitePath {
        SitePath::from_segments(&["pigments", "index.html"])
    }

    /// `paints/<manufacturer>/index.html`
    pub fn paint_index(&self, manufacturer: &str) -> Result<SitePath> {
        let manufacturer = segment("manufacturer", manufacturer)?;
        Ok(SitePath::from_segments(&["paints", &manufacturer, "index.html"]))
    }

    /// `paints/<manufacturer>/<paint>.html`
    pub fn paint_page(&self, manufacturer: &str, paint: &str) -> Result<SitePath> {
        let manufacturer = segment("manufacturer", manufacturer)?;
        let paint = segment("paint", paint)?;
        Ok(SitePath::from_segments(&["paints", &manufacturer, &format!("{paint}.html")]))
    }

    /// `pigments/<code>-<name>.html`
    pub fn pigment_page(&self, pigment: &PigmentKey) -> Result<SitePath> {
        let code = segment("pigment code", &pigment.code)?;
        let name = segment("pigment name", &pigment.name)?;
        Ok(SitePath::from_segments(&["pigments", &format!("{code}-{name}.html")]))
    }

    /// Link to a page, e.g. `/pigments/paints/acme/red.html`
    #[must_use]
    pub fn href(&self, path: &SitePath) -> String {
        format!("{}/{}", self.root_path, path)
    }
}

/// Slug of `name`, which must not be empty
fn segment(kind: &str, name: &str) -> Result<String> {
    let segment = slug(name);
    if segment.is_empty() {
        return Err(AtlasError::integrity(format!(
            "{kind} {name:?} has no usable characters for a path"
        )));
    }
    Ok(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_layout() {
        let scheme = PathScheme::default();
        assert_eq!(scheme.manufacturer_index().as_str(), "index.html");
        assert_eq!(scheme.pigment_index().as_str(), "pigments/index.html");
        assert_eq!(scheme.paint_index("Daniel Smith").unwrap().as_str(), "paints/daniel-smith/index.html");
        assert_eq!(
            scheme.paint_page("Daniel Smith", "Quinacridone Rose").unwrap().as_str(),
            "paints/daniel-smith/quinacridone-rose.html"
        );
        assert_eq!(
            scheme.pigment_page(&PigmentKey::new("PR101", "Red Iron Oxide")).unwrap().as_str(),
            "pigments/pr101-red-iron-oxide.html"
        );
    }

    #[test]
    fn test_asset_paths() {
        assert_eq!(SitePath::asset("css/style.css").unwrap().as_str(), "css/style.css");
        assert_eq!(SitePath::asset("/style.css").unwrap().as_str(), "style.css");
        for bad in ["", "/", "css//style.css", "../style.css", "css/./style.css"] {
            assert!(matches!(SitePath::asset(bad), Err(AtlasError::Config(_))), "{bad:?}");
        }
    }

    #[test]
    fn test_href_uses_root_prefix() {
        let page = PathScheme::default().paint_index("Acme").unwrap();
        assert_eq!(PathScheme::default().href(&page), "/paints/acme/index.html");
        assert_eq!(PathScheme::new("/pigments").href(&page), "/pigments/paints/acme/index.html");
    }

    #[test]
    fn test_empty_slug_is_an_integrity_error() {
        let err = PathScheme::default().paint_page("Acme", "???").unwrap_err();
        match err {
            AtlasError::DataIntegrity(msg) => assert!(msg.contains("paint \"???\"")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fs_path() {
        let page = PathScheme::default().paint_page("Acme", "Red").unwrap();
        assert_eq!(
            page.to_fs_path(Path::new("/tmp/build")),
            PathBuf::from("/tmp/build/paints/acme/red.html")
        );
    }
}
