//! Stow / unstow / restow sequencing.
//!
//! The governing invariant: the `current` pointer exists if and only if that
//! version is actually linked into the target directory. Every path through
//! these operations preserves it, linker failures included.

use anyhow::Result;
use log::{debug, warn};
use std::path::PathBuf;

use crate::error::Error;
use crate::package::{PackageName, PackageRepository, VersionName};
use crate::runtime::Runtime;
use crate::stow::Linker;

pub struct StowAction<'a, R: Runtime, L: Linker> {
    repo: PackageRepository<'a, R>,
    linker: &'a L,
}

impl<'a, R: Runtime, L: Linker> StowAction<'a, R, L> {
    pub fn new(runtime: &'a R, linker: &'a L, root: impl Into<PathBuf>) -> Self {
        Self {
            repo: PackageRepository::new(runtime, root),
            linker,
        }
    }

    pub fn package_repo(&self) -> &PackageRepository<'a, R> {
        &self.repo
    }

    /// Point `current` at a version and link it into the target directory.
    ///
    /// Any previously stowed version is unstowed first so no stale links
    /// survive. When the linker fails, the freshly written pointer is
    /// removed again before the failure is surfaced.
    pub fn stow(&self, package: &PackageName, version: &VersionName) -> Result<()> {
        if !self.repo.version_exists(package, version) {
            return Err(Error::NotInstalled {
                package: package.to_string(),
                version: version.to_string(),
            }
            .into());
        }

        self.unstow(package, false)?;
        self.repo.link_current(package, version)?;

        debug!("linking '{}/{}' into target", package, version);
        if let Err(err) = self.linker.link(&self.repo.package_dir(package)) {
            // The pointer must not outlive a failed link attempt.
            if let Err(rollback) = self.repo.remove_current(package) {
                warn!(
                    "failed to roll back current link of '{}': {:#}",
                    package, rollback
                );
            }
            return Err(err);
        }
        Ok(())
    }

    /// Remove a package's links from the target directory.
    ///
    /// With no `current` pointer this is a no-op, unless `strict` makes the
    /// missing pointer a [`Error::NotStowed`] failure. On linker failure the
    /// pointer is kept: links may be partially present and the pointer is
    /// what makes a clean retry possible. Only a successful unlink removes
    /// it.
    pub fn unstow(&self, package: &PackageName, strict: bool) -> Result<()> {
        if self.repo.current_version(package)?.is_none() {
            if strict {
                return Err(Error::NotStowed(package.to_string()).into());
            }
            debug!("'{}' is not stowed, nothing to unlink", package);
            return Ok(());
        }

        self.linker.unlink(&self.repo.package_dir(package))?;
        self.repo.remove_current(package)
    }

    /// Unlink and relink the current version, picking up files added to its
    /// tree since it was stowed. The pointer keeps its value.
    pub fn restow(&self, package: &PackageName) -> Result<()> {
        let Some(current) = self.repo.current_version(package)? else {
            return Err(Error::NotStowed(package.to_string()).into());
        };
        let version: VersionName = current.parse()?;
        self.unstow(package, true)?;
        self.stow(package, &version)
    }
}
