//! Document sink
//!
//! Rendered pages go to a [`DocumentSink`] keyed by their [`SitePath`].
//! [`FsSink`] writes them beneath a build root on the local filesystem.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

use crate::error::{AtlasError, Result};
use crate::site::SitePath;

/// Destination for rendered pages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Store `contents` at `path`, creating intermediate directories and
    /// replacing any previous document
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Sink`] when the document cannot be stored.
    async fn write(&self, path: &SitePath, contents: &str) -> Result<()>;
}

/// Filesystem sink rooted at a build directory
///
/// # Examples
///
/// ```rust,no_run
/// use pigment_atlas::sink::{list_assets, FsSink};
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let sink = FsSink::new("build")?;
/// sink.check_clean_root(&[])?;
/// sink.clean().await?;
/// let assets = list_assets(Path::new("assets"))?;
/// let copied = sink.copy_assets(Path::new("assets"), &assets).await?;
/// println!("{copied} assets copied");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    /// Sink writing beneath `root`
    ///
    /// The root is created on first write.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Sink`] if `root` exists and is not a directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.exists() && !root.is_dir() {
            return Err(AtlasError::Sink {
                source: io::Error::new(io::ErrorKind::NotADirectory, "build root is not a directory"),
                path: root,
            });
        }
        Ok(Self { root })
    }

    /// Build root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove the build root and everything under it
    pub async fn clean(&self) -> Result<()> {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => {
                tracing::debug!(root = %self.root.display(), "build root removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(AtlasError::Sink {
                path: self.root.clone(),
                source,
            }),
        }
    }

    /// Refuse to clean a root holding the working directory or any of
    /// `protected`
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Config`] naming the path the clean would delete.
    pub fn check_clean_root(&self, protected: &[PathBuf]) -> Result<()> {
        let root = resolve(&self.root);
        let cwd = std::env::current_dir()?;
        for path in std::iter::once(&cwd).chain(protected) {
            if resolve(path).starts_with(&root) {
                return Err(AtlasError::Config(format!(
                    "refusing to clean build root {}: it contains {}",
                    self.root.display(),
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Copy `assets`, as listed by [`list_assets`], from `dir` into the
    /// build root; returns the number of files copied
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Sink`] when a file cannot be copied.
    pub async fn copy_assets(&self, dir: &Path, assets: &[SitePath]) -> Result<usize> {
        for asset in assets {
            let target = asset.to_fs_path(&self.root);
            ensure_parent(&target).await?;
            fs::copy(asset.to_fs_path(dir), &target)
                .await
                .map_err(|source| AtlasError::Sink {
                    path: target.clone(),
                    source,
                })?;
        }

        tracing::debug!(from = %dir.display(), copied = assets.len(), "assets copied");
        Ok(assets.len())
    }
}

/// Every file under `dir` as a path relative to the build root, sorted
///
/// # Errors
///
/// Returns [`AtlasError::Config`] when `dir` is not a directory or holds a
/// file name that is not valid UTF-8.
pub fn list_assets(dir: &Path) -> Result<Vec<SitePath>> {
    if !dir.is_dir() {
        return Err(AtlasError::Config(format!(
            "assets directory {} does not exist",
            dir.display()
        )));
    }

    let mut assets = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| AtlasError::Sink {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(dir).unwrap_or_else(|_| entry.path());
        let segments = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| AtlasError::Config(format!("asset {} is not valid UTF-8", relative.display())))?;
        assets.push(SitePath::asset(&segments.join("/"))?);
    }
    Ok(assets)
}

/// Absolute form of `path` with symlinks resolved as far as it exists
fn resolve(path: &Path) -> PathBuf {
    if let Ok(resolved) = std::fs::canonicalize(path) {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
            resolve(parent).join(name)
        }
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

#[async_trait]
impl DocumentSink for FsSink {
    async fn write(&self, path: &SitePath, contents: &str) -> Result<()> {
        let target = path.to_fs_path(&self.root);
        ensure_parent(&target).await?;
        fs::write(&target, contents)
            .await
            .map_err(|source| AtlasError::Sink { path: target, source })
    }
}

async fn ensure_parent(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| AtlasError::Sink {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::PathScheme;
    use tempfile::TempDir;

    fn create_test_sink() -> (FsSink, TempDir) {
        let temp = TempDir::new().unwrap();
        let sink = FsSink::new(temp.path().join("build")).unwrap();
        (sink, temp)
    }

    #[tokio::test]
    async fn test_write_creates_directories() {
        let (sink, temp) = create_test_sink();
        let page = PathScheme::default().paint_page("Acme", "Red").unwrap();

        sink.write(&page, "<p>red</p>").await.unwrap();

        let written = temp.path().join("build/paints/acme/red.html");
        assert_eq!(std::fs::read_to_string(written).unwrap(), "<p>red</p>");
    }

    #[tokio::test]
    async fn test_write_replaces_existing_document() {
        let (sink, _temp) = create_test_sink();
        let page = PathScheme::default().manufacturer_index();

        sink.write(&page, "first").await.unwrap();
        sink.write(&page, "second").await.unwrap();

        let written = page.to_fs_path(sink.root());
        assert_eq!(std::fs::read_to_string(written).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_root_must_be_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("not-a-directory");
        std::fs::write(&file, b"x").unwrap();

        let result = FsSink::new(file);
        assert!(matches!(result, Err(AtlasError::Sink { .. })));
    }

    #[tokio::test]
    async fn test_write_failure_is_a_sink_error() {
        let (sink, _temp) = create_test_sink();
        // a file where the `paints` directory should go
        std::fs::create_dir_all(sink.root()).unwrap();
        std::fs::write(sink.root().join("paints"), b"x").unwrap();

        let page = PathScheme::default().paint_index("Acme").unwrap();
        let err = sink.write(&page, "page").await.unwrap_err();
        assert!(matches!(err, AtlasError::Sink { .. }));
    }

    #[tokio::test]
    async fn test_clean_removes_build_root() {
        let (sink, _temp) = create_test_sink();
        sink.write(&PathScheme::default().manufacturer_index(), "old").await.unwrap();
        assert!(sink.root().exists());

        sink.clean().await.unwrap();
        assert!(!sink.root().exists());

        // idempotent
        sink.clean().await.unwrap();
    }

    #[tokio::test]
    async fn test_copy_assets_keeps_layout() {
        let (sink, temp) = create_test_sink();
        let dir = temp.path().join("assets");
        std::fs::create_dir_all(dir.join("css")).unwrap();
        std::fs::write(dir.join("css/style.css"), "body {}").unwrap();
        std::fs::write(dir.join("favicon.ico"), b"icon").unwrap();

        let assets = list_assets(&dir).unwrap();
        let listed: Vec<_> = assets.iter().map(SitePath::as_str).collect();
        assert_eq!(listed, ["css/style.css", "favicon.ico"]);

        let copied = sink.copy_assets(&dir, &assets).await.unwrap();

        assert_eq!(copied, 2);
        assert_eq!(
            std::fs::read_to_string(sink.root().join("css/style.css")).unwrap(),
            "body {}"
        );
        assert!(sink.root().join("favicon.ico").is_file());
    }

    #[test]
    fn test_list_assets_requires_directory() {
        let temp = TempDir::new().unwrap();
        let err = list_assets(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, AtlasError::Config(_)));
    }

    #[test]
    fn test_clean_root_must_not_hold_protected_paths() {
        let (sink, temp) = create_test_sink();
        let database = sink.root().join("pigments.sqlite3");
        let err = sink.check_clean_root(&[database]).unwrap_err();
        assert!(matches!(err, AtlasError::Config(ref msg) if msg.contains("pigments.sqlite3")));

        // the root itself, even before it exists
        assert!(sink.check_clean_root(&[sink.root().to_path_buf()]).is_err());
        assert!(sink.check_clean_root(&[temp.path().join("pigments.sqlite3")]).is_ok());
    }

    #[test]
    fn test_clean_root_must_not_hold_working_directory() {
        let cwd = std::env::current_dir().unwrap();
        assert!(FsSink::new(".").unwrap().check_clean_root(&[]).is_err());
        assert!(FsSink::new(&cwd).unwrap().check_clean_root(&[]).is_err());
        if let Some(parent) = cwd.parent() {
            assert!(FsSink::new(parent).unwrap().check_clean_root(&[]).is_err());
        }
    }
}
