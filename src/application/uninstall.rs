//! Uninstall sequencing: unstow when needed, delete, prune.

use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::error::Error;
use crate::package::{PackageName, VersionName};
use crate::runtime::Runtime;
use crate::stow::Linker;

use super::stow::StowAction;

#[derive(Debug, Clone, Copy, Default)]
pub struct UninstallOptions {
    /// Skip the interactive confirmation.
    pub assume_yes: bool,
    /// Word the prompt as a reinstall; set by the install path when it
    /// clears an existing version.
    pub reinstall: bool,
}

pub struct UninstallAction<'a, R: Runtime, L: Linker> {
    runtime: &'a R,
    stow: StowAction<'a, R, L>,
}

impl<'a, R: Runtime, L: Linker> UninstallAction<'a, R, L> {
    pub fn new(runtime: &'a R, linker: &'a L, root: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            stow: StowAction::new(runtime, linker, root),
        }
    }

    pub fn uninstall(
        &self,
        package: &PackageName,
        version: Option<&VersionName>,
        opts: UninstallOptions,
    ) -> Result<()> {
        match version {
            Some(version) => self.uninstall_version(package, version, opts),
            None => self.uninstall_package(package, opts),
        }
    }

    /// Remove one version. If it is the currently linked one it is unstowed
    /// first; other versions and their links are never touched. An emptied
    /// package directory is pruned.
    pub fn uninstall_version(
        &self,
        package: &PackageName,
        version: &VersionName,
        opts: UninstallOptions,
    ) -> Result<()> {
        let repo = self.stow.package_repo();
        // Existence is checked before any prompt is shown
        if !repo.version_exists(package, version) {
            return Err(Error::NotInstalled {
                package: package.to_string(),
                version: version.to_string(),
            }
            .into());
        }

        self.confirm_or_abort(&opts, &format!("{}/{}", package, version))?;

        if repo.current_version(package)?.as_deref() == Some(version.as_str()) {
            self.stow.unstow(package, false)?;
        }
        repo.remove_version_dir(package, version)?;
        if repo.prune_if_empty(package)? {
            debug!("removed empty package directory of '{}'", package);
        }
        Ok(())
    }

    /// Remove a package with all its versions. The versions about to be
    /// destroyed are listed before the confirmation.
    pub fn uninstall_package(&self, package: &PackageName, opts: UninstallOptions) -> Result<()> {
        let repo = self.stow.package_repo();
        if !repo.package_exists(package) {
            return Err(Error::NoSuchPackage(package.to_string()).into());
        }

        if confirmation_required(opts.assume_yes) {
            println!("Versions of '{}' to be removed:", package);
            for version in repo.versions(package)? {
                println!("  {}", version);
            }
        }
        self.confirm_or_abort(&opts, package.as_str())?;

        self.stow.unstow(package, false)?;
        repo.remove_package_dir(package)
    }

    fn confirm_or_abort(&self, opts: &UninstallOptions, target: &str) -> Result<()> {
        if !confirmation_required(opts.assume_yes) {
            return Ok(());
        }
        if self.runtime.confirm(&removal_prompt(opts.reinstall, target))? {
            Ok(())
        } else {
            Err(Error::Declined.into())
        }
    }
}

/// Pure prompt policy, kept apart from the blocking read.
pub(crate) fn confirmation_required(assume_yes: bool) -> bool {
    !assume_yes
}

fn removal_prompt(reinstall: bool, target: &str) -> String {
    let verb = if reinstall { "Reinstall" } else { "Uninstall" };
    format!("{} '{}'?", verb, target)
}
