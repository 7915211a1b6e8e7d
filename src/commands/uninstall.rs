use anyhow::Result;
use log::debug;

use crate::application::{UninstallAction, UninstallOptions};
use crate::package::{PackageName, VersionName};
use crate::runtime::Runtime;
use crate::stow::Linker;

use super::Config;

/// Remove one version or a whole package, after confirmation.
#[tracing::instrument(skip(config))]
pub fn uninstall<R: Runtime, L: Linker>(
    config: &Config<R, L>,
    package: &PackageName,
    version: Option<&VersionName>,
    yes: bool,
) -> Result<()> {
    debug!("uninstalling {} version={:?}", package, version);
    config.linker.ensure_available()?;

    let action = UninstallAction::new(&config.runtime, &config.linker, &config.repo_root);
    action.uninstall(
        package,
        version,
        UninstallOptions {
            assume_yes: yes,
            reinstall: false,
        },
    )?;

    match version {
        Some(version) => println!("Removed '{}/{}'", package, version),
        None => println!("Removed package '{}'", package),
    }
    Ok(())
}
