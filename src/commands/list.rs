use anyhow::Result;
use log::debug;

use crate::application::ListAction;
use crate::package::PackageName;
use crate::runtime::Runtime;
use crate::stow::Linker;

use super::Config;

/// List packages, or the versions of one package with the current version
/// marked. Never probes for the external linker: listing must work on a
/// machine that does not have it.
#[tracing::instrument(skip(config))]
pub fn list<R: Runtime, L: Linker>(
    config: &Config<R, L>,
    package: Option<&PackageName>,
) -> Result<()> {
    let action = ListAction::new(&config.runtime, &config.repo_root);

    match package {
        None => {
            debug!("listing packages");
            for name in action.packages()? {
                println!("{}", name);
            }
        }
        Some(package) => {
            debug!("listing versions of {}", package);
            let listing = action.versions(package)?;
            for version in &listing.versions {
                println!("{}", version_row(version, listing.current.as_deref()));
            }
        }
    }
    Ok(())
}

fn version_row(version: &str, current: Option<&str>) -> String {
    let marker = if current == Some(version) { "* " } else { "  " };
    format!("{}{}", marker, version)
}

#[cfg(test)]
mod tests {
    use super::version_row;

    #[test]
    fn test_version_row_marks_only_current() {
        assert_eq!(version_row("1.0", Some("2.0")), "  1.0");
        assert_eq!(version_row("2.0", Some("2.0")), "* 2.0");
        assert_eq!(version_row("1.0", None), "  1.0");
    }
}
