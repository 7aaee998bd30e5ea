//! Bookkeeping of planned pages and the links between them

use std::collections::BTreeMap;

use super::paths::SitePath;
use crate::error::{AtlasError, Result};

/// Records which entity owns each output path and every internal link
///
/// Claiming a path twice is a slug collision. [`LinkLedger::verify`] fails
/// on the first link whose target was never claimed.
#[derive(Debug, Default)]
pub struct LinkLedger {
    owners: BTreeMap<SitePath, String>,
    links: Vec<(SitePath, SitePath)>,
}

impl LinkLedger {
    /// Reserve `path` for the entity described by `owner`
    pub fn claim(&mut self, path: &SitePath, owner: impl Into<String>) -> Result<()> {
        let owner = owner.into();
        if let Some(first) = self.owners.get(path) {
            return Err(AtlasError::SlugCollision {
                path: path.to_string(),
                first: first.clone(),
                second: owner,
            });
        }
        self.owners.insert(path.clone(), owner);
        Ok(())
    }

    /// Note a link from page `from` to the page or asset `to`
    pub fn link(&mut self, from: &SitePath, to: &SitePath) {
        self.links.push((from.clone(), to.clone()));
    }

    /// True once `path` has been claimed
    #[must_use]
    pub fn is_claimed(&self, path: &SitePath) -> bool {
        self.owners.contains_key(path)
    }

    /// Number of claimed paths, pages and assets alike
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.owners.len()
    }

    /// Check every recorded link resolves; returns the link count
    pub fn verify(&self) -> Result<usize> {
        if let Some((from, to)) = self.links.iter().find(|(_, to)| !self.owners.contains_key(to)) {
            return Err(AtlasError::DanglingLink {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(self.links.len())
    }
}
