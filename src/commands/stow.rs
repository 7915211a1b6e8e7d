use anyhow::Result;
use log::debug;

use crate::application::StowAction;
use crate::package::{PackageName, VersionName};
use crate::runtime::Runtime;
use crate::stow::Linker;

use super::Config;

/// Link a specific installed version into the target directory.
#[tracing::instrument(skip(config))]
pub fn stow<R: Runtime, L: Linker>(
    config: &Config<R, L>,
    package: &PackageName,
    version: &VersionName,
) -> Result<()> {
    debug!("stowing {}/{}", package, version);
    config.linker.ensure_available()?;

    let action = StowAction::new(&config.runtime, &config.linker, &config.repo_root);
    action.stow(package, version)?;
    println!("Stowed '{}/{}'", package, version);
    Ok(())
}

/// Remove the links of one or more packages. Strict: a package that is not
/// stowed is an error, since unstowing it was the caller's whole intent.
/// Packages are processed in order and the first failure stops the run.
#[tracing::instrument(skip(config))]
pub fn unstow<R: Runtime, L: Linker>(
    config: &Config<R, L>,
    packages: &[PackageName],
) -> Result<()> {
    config.linker.ensure_available()?;

    let action = StowAction::new(&config.runtime, &config.linker, &config.repo_root);
    for package in packages {
        debug!("unstowing {}", package);
        action.unstow(package, true)?;
        println!("Unstowed '{}'", package);
    }
    Ok(())
}

/// Unlink and relink the current version, picking up new files in its tree.
#[tracing::instrument(skip(config))]
pub fn restow<R: Runtime, L: Linker>(config: &Config<R, L>, package: &PackageName) -> Result<()> {
    debug!("restowing {}", package);
    config.linker.ensure_available()?;

    let action = StowAction::new(&config.runtime, &config.linker, &config.repo_root);
    action.restow(package)?;
    println!("Restowed '{}'", package);
    Ok(())
}
