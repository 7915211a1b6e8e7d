//! Listing data for packages and versions.

use anyhow::Result;
use std::path::PathBuf;

use crate::package::{PackageName, PackageRepository};
use crate::runtime::Runtime;

/// Versions of one package plus the name the `current` link points at.
pub struct VersionListing {
    pub versions: Vec<String>,
    pub current: Option<String>,
}

/// Read-only queries; never talks to the external linker, so listing works
/// even when the tool is not installed.
pub struct ListAction<'a, R: Runtime> {
    repo: PackageRepository<'a, R>,
}

impl<'a, R: Runtime> ListAction<'a, R> {
    pub fn new(runtime: &'a R, root: impl Into<PathBuf>) -> Self {
        Self {
            repo: PackageRepository::new(runtime, root),
        }
    }

    pub fn packages(&self) -> Result<Vec<String>> {
        self.repo.packages()
    }

    pub fn versions(&self, package: &PackageName) -> Result<VersionListing> {
        let versions = self.repo.versions(package)?;
        let current = self.repo.current_version(package)?;
        Ok(VersionListing { versions, current })
    }
}
