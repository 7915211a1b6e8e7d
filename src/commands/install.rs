use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::application::InstallAction;
use crate::package::{PackageName, VersionName};
use crate::runtime::Runtime;
use crate::stow::Linker;

use super::Config;

/// Install a package version from a directory tree and stow it.
#[tracing::instrument(skip(config, path))]
pub fn install<R: Runtime, L: Linker>(
    config: &Config<R, L>,
    package: &PackageName,
    version: &VersionName,
    path: &Path,
    yes: bool,
) -> Result<()> {
    debug!("installing {}/{} from {:?}", package, version, path);
    config.linker.ensure_available()?;

    let action = InstallAction::new(&config.runtime, &config.linker, &config.repo_root);
    action.install(package, version, path, yes)?;
    println!("Installed '{}/{}'", package, version);
    Ok(())
}
