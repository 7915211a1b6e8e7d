//! Install sequencing: copy a source tree into a version directory, then
//! stow it.

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::error::Error;
use crate::package::{PackageName, VersionName};
use crate::runtime::Runtime;
use crate::stow::Linker;

use super::stow::StowAction;
use super::uninstall::{UninstallAction, UninstallOptions};

pub struct InstallAction<'a, R: Runtime, L: Linker> {
    runtime: &'a R,
    stow: StowAction<'a, R, L>,
    uninstall: UninstallAction<'a, R, L>,
}

impl<'a, R: Runtime, L: Linker> InstallAction<'a, R, L> {
    pub fn new(runtime: &'a R, linker: &'a L, root: &Path) -> Self {
        Self {
            runtime,
            stow: StowAction::new(runtime, linker, root),
            uninstall: UninstallAction::new(runtime, linker, root),
        }
    }

    /// Copy `source` into place as `package/version` and stow it.
    ///
    /// Installing over an existing version is a reinstall: the old version
    /// is uninstalled first, behind the same confirmation gate as an
    /// explicit uninstall but worded for what the whole operation does.
    /// A reinstall whose copy or link step fails afterwards leaves the
    /// package uninstalled; only the source check below runs early enough
    /// to abort with nothing mutated.
    pub fn install(
        &self,
        package: &PackageName,
        version: &VersionName,
        source: &Path,
        assume_yes: bool,
    ) -> Result<()> {
        if !self.runtime.exists(source) {
            return Err(Error::SourceNotFound(source.to_path_buf()).into());
        }

        let repo = self.stow.package_repo();
        if repo.version_exists(package, version) {
            self.uninstall.uninstall_version(
                package,
                version,
                UninstallOptions {
                    assume_yes,
                    reinstall: true,
                },
            )?;
        }

        self.runtime.create_dir_all(&repo.package_dir(package))?;
        if repo.version_exists(package, version) {
            // Cleared above; something re-created it behind our back.
            return Err(Error::AlreadyInstalled {
                package: package.to_string(),
                version: version.to_string(),
            }
            .into());
        }

        self.runtime
            .copy_dir_all(source, &repo.version_dir(package, version))
            .with_context(|| format!("Failed to install '{}/{}'", package, version))?;
        info!("installed '{}/{}' from {}", package, version, source.display());

        // A failed link leaves the copied tree in place: the data is the
        // expensive part, relinking is a cheap retry.
        self.stow.stow(package, version)
    }
}
