//! On-disk repository of installed packages.
//!
//! Layout under the repository root:
//!
//! ```text
//! <root>/<package>/<version>/...       installed files
//! <root>/<package>/current -> <version>
//! ```
//!
//! The `current` symlink is the single source of truth for whether a package
//! is linked into the target directory: pointer absent means not linked. No
//! other state is stored, so nothing can diverge from it.

use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::runtime::Runtime;

use super::{CURRENT_LINK, PackageName, VersionName};

/// Bookkeeping over package and version directories. Knows nothing about the
/// external linker.
pub struct PackageRepository<'a, R: Runtime> {
    runtime: &'a R,
    root: PathBuf,
}

impl<'a, R: Runtime> PackageRepository<'a, R> {
    pub fn new(runtime: &'a R, root: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            root: root.into(),
        }
    }

    /// The repository root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<package>`
    pub fn package_dir(&self, package: &PackageName) -> PathBuf {
        self.root.join(package.as_str())
    }

    /// `<root>/<package>/<version>`
    pub fn version_dir(&self, package: &PackageName, version: &VersionName) -> PathBuf {
        self.package_dir(package).join(version.as_str())
    }

    /// `<root>/<package>/current`
    pub fn current_link(&self, package: &PackageName) -> PathBuf {
        self.package_dir(package).join(CURRENT_LINK)
    }

    pub fn package_exists(&self, package: &PackageName) -> bool {
        self.runtime.is_dir(&self.package_dir(package))
    }

    pub fn version_exists(&self, package: &PackageName, version: &VersionName) -> bool {
        self.runtime.is_dir(&self.version_dir(package, version))
    }

    /// Version name the `current` link points at, or `None` when the link
    /// does not exist. Read failures other than absence propagate.
    pub fn current_version(&self, package: &PackageName) -> Result<Option<String>> {
        let link = self.current_link(package);
        if !self.runtime.is_symlink(&link) {
            return Ok(None);
        }
        let target = self
            .runtime
            .read_link(&link)
            .with_context(|| format!("Failed to read current link of '{}'", package))?;
        // Final path segment; Path::file_name already ignores a trailing
        // separator.
        let version = target
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .ok_or_else(|| anyhow!("current link of '{}' points at {:?}", package, target))?;
        Ok(Some(version))
    }

    /// Point the `current` link at a version directory, replacing any
    /// existing link. A missing old link is not an error. The link target is
    /// the bare version name, resolved relative to the package directory.
    pub fn link_current(&self, package: &PackageName, version: &VersionName) -> Result<()> {
        let link = self.current_link(package);
        if self.runtime.is_symlink(&link) {
            self.runtime.remove_symlink(&link)?;
        }
        self.runtime
            .symlink(Path::new(version.as_str()), &link)
            .with_context(|| format!("Failed to link '{}/{}' as current", package, version))
    }

    /// Delete the `current` link. Errors if it is absent; callers are
    /// expected to have checked.
    pub fn remove_current(&self, package: &PackageName) -> Result<()> {
        self.runtime
            .remove_symlink(&self.current_link(package))
            .with_context(|| format!("Failed to remove current link of '{}'", package))
    }

    /// Names of all package directories under the root, sorted. An absent
    /// root reads as an empty repository.
    pub fn packages(&self) -> Result<Vec<String>> {
        if !self.runtime.is_dir(&self.root) {
            return Ok(vec![]);
        }
        let mut names: Vec<String> = self
            .runtime
            .read_dir(&self.root)?
            .into_iter()
            .filter(|entry| self.runtime.is_dir(entry))
            .filter_map(|entry| {
                entry
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(String::from)
            })
            .collect();
        names.sort();
        Ok(names)
    }

    /// Names of the installed versions of a package, sorted, never including
    /// the `current` pseudo-entry. A missing package directory is a distinct
    /// not-found condition.
    pub fn versions(&self, package: &PackageName) -> Result<Vec<String>> {
        let dir = self.package_dir(package);
        if !self.runtime.is_dir(&dir) {
            return Err(Error::NoSuchPackage(package.to_string()).into());
        }
        let mut names: Vec<String> = self
            .runtime
            .read_dir(&dir)?
            .into_iter()
            .filter_map(|entry| {
                entry
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(String::from)
            })
            .filter(|name| name != CURRENT_LINK)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Recursively delete one version directory.
    pub fn remove_version_dir(&self, package: &PackageName, version: &VersionName) -> Result<()> {
        self.runtime
            .remove_dir_all(&self.version_dir(package, version))
    }

    /// Recursively delete the whole package directory.
    pub fn remove_package_dir(&self, package: &PackageName) -> Result<()> {
        self.runtime.remove_dir_all(&self.package_dir(package))
    }

    /// Remove the package directory if nothing is left in it. Returns
    /// whether it was removed.
    pub fn prune_if_empty(&self, package: &PackageName) -> Result<bool> {
        let dir = self.package_dir(package);
        if self.runtime.read_dir(&dir)?.is_empty() {
            self.runtime.remove_dir(&dir)?;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    fn pkg(name: &str) -> PackageName {
        name.parse().unwrap()
    }

    fn ver(name: &str) -> VersionName {
        name.parse().unwrap()
    }

    #[test]
    fn test_path_composition() {
        let runtime = MockRuntime::new();
        let repo = PackageRepository::new(&runtime, "/stow");

        assert_eq!(repo.package_dir(&pkg("foo")), PathBuf::from("/stow/foo"));
        assert_eq!(
            repo.version_dir(&pkg("foo"), &ver("1.0")),
            PathBuf::from("/stow/foo/1.0")
        );
        assert_eq!(repo.current_link(&pkg("foo")), PathBuf::from("/stow/foo/current"));
    }

    #[test]
    fn test_current_version_reads_final_segment() {
        let mut runtime = MockRuntime::new();
        let link = PathBuf::from("/stow/foo/current");

        runtime
            .expect_is_symlink()
            .with(eq(link.clone()))
            .returning(|_| true);
        runtime
            .expect_read_link()
            .with(eq(link))
            .returning(|_| Ok(PathBuf::from("/stow/foo/1.2.3/")));

        let repo = PackageRepository::new(&runtime, "/stow");
        assert_eq!(
            repo.current_version(&pkg("foo")).unwrap(),
            Some("1.2.3".to_string())
        );
    }

    #[test]
    fn test_current_version_none_when_link_absent() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_symlink().returning(|_| false);

        let repo = PackageRepository::new(&runtime, "/stow");
        assert_eq!(repo.current_version(&pkg("foo")).unwrap(), None);
    }

    #[test]
    fn test_current_version_propagates_read_failure() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_symlink().returning(|_| true);
        runtime.expect_read_link().returning(|_| {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        });

        let repo = PackageRepository::new(&runtime, "/stow");
        assert!(repo.current_version(&pkg("foo")).is_err());
    }

    #[test]
    fn test_link_current_replaces_existing_link() {
        let mut runtime = MockRuntime::new();
        let link = PathBuf::from("/stow/foo/current");

        runtime
            .expect_is_symlink()
            .with(eq(link.clone()))
            .returning(|_| true);
        runtime
            .expect_remove_symlink()
            .with(eq(link.clone()))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_symlink()
            .with(eq(PathBuf::from("2.0")), eq(link))
            .times(1)
            .returning(|_, _| Ok(()));

        let repo = PackageRepository::new(&runtime, "/stow");
        repo.link_current(&pkg("foo"), &ver("2.0")).unwrap();
    }

    #[test]
    fn test_link_current_tolerates_missing_link() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_symlink().returning(|_| false);
        runtime
            .expect_symlink()
            .times(1)
            .returning(|_, _| Ok(()));

        let repo = PackageRepository::new(&runtime, "/stow");
        repo.link_current(&pkg("foo"), &ver("1.0")).unwrap();
    }

    #[test]
    fn test_versions_excludes_current_entry() {
        let mut runtime = MockRuntime::new();
        let dir = PathBuf::from("/stow/foo");

        runtime
            .expect_is_dir()
            .with(eq(dir.clone()))
            .returning(|_| true);
        runtime
            .expect_read_dir()
            .with(eq(dir))
            .returning(|p| Ok(vec![p.join("2.0"), p.join("current"), p.join("1.0")]));

        let repo = PackageRepository::new(&runtime, "/stow");
        assert_eq!(repo.versions(&pkg("foo")).unwrap(), vec!["1.0", "2.0"]);
    }

    #[test]
    fn test_versions_of_missing_package_is_not_found() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| false);

        let repo = PackageRepository::new(&runtime, "/stow");
        let err = repo.versions(&pkg("ghost")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NoSuchPackage(name)) if name == "ghost"
        ));
    }

    #[test]
    fn test_packages_sorted_and_empty_root_ok() {
        let mut runtime = MockRuntime::new();
        let root = PathBuf::from("/stow");

        runtime
            .expect_is_dir()
            .with(eq(root.clone()))
            .returning(|_| true);
        runtime
            .expect_is_dir()
            .returning(|p| !p.ends_with("README"));
        runtime
            .expect_read_dir()
            .with(eq(root))
            .returning(|p| Ok(vec![p.join("zsh"), p.join("README"), p.join("gcc")]));

        let repo = PackageRepository::new(&runtime, "/stow");
        assert_eq!(repo.packages().unwrap(), vec!["gcc", "zsh"]);

        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| false);
        let repo = PackageRepository::new(&runtime, "/stow");
        assert!(repo.packages().unwrap().is_empty());
    }

    #[test]
    fn test_prune_if_empty() {
        let mut runtime = MockRuntime::new();
        let dir = PathBuf::from("/stow/foo");

        runtime
            .expect_read_dir()
            .with(eq(dir.clone()))
            .returning(|_| Ok(vec![]));
        runtime
            .expect_remove_dir()
            .with(eq(dir))
            .times(1)
            .returning(|_| Ok(()));

        let repo = PackageRepository::new(&runtime, "/stow");
        assert!(repo.prune_if_empty(&pkg("foo")).unwrap());
    }

    #[test]
    fn test_prune_if_empty_keeps_populated_dir() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_dir()
            .returning(|p| Ok(vec![p.join("1.0")]));

        let repo = PackageRepository::new(&runtime, "/stow");
        assert!(!repo.prune_if_empty(&pkg("foo")).unwrap());
    }
}
