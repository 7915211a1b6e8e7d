use anyhow::{Context, Result, anyhow};
use log::info;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Default repository root: a system location when running privileged, a
/// per-user one otherwise.
#[tracing::instrument(skip(runtime))]
pub fn default_repo_root<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    if runtime.is_privileged() {
        Ok(system_repo_root())
    } else {
        let home_dir = runtime
            .home_dir()
            .context("Could not find home directory")?;
        Ok(home_dir.join(".local/stow"))
    }
}

/// Default stow target: the parent of the repository root, so
/// `/usr/local/stow` links into `/usr/local`.
pub fn default_target_dir(repo_root: &Path) -> Result<PathBuf> {
    repo_root
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            anyhow!(
                "repository root {:?} has no parent directory to stow into",
                repo_root
            )
        })
}

#[cfg(target_os = "macos")]
fn system_repo_root() -> PathBuf {
    PathBuf::from("/opt/stow")
}

#[cfg(target_os = "windows")]
fn system_repo_root() -> PathBuf {
    PathBuf::from(r"C:\ProgramData\stowage")
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn system_repo_root() -> PathBuf {
    PathBuf::from("/usr/local/stow")
}

/// Log the resolved locations once per invocation.
pub fn announce(repo_root: &Path, target_dir: &Path) {
    info!(
        "repository root {:?}, stow target {:?}",
        repo_root, target_dir
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;

    #[test]
    fn test_default_root_for_privileged_process() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_privileged().returning(|| true);

        let root = default_repo_root(&runtime).unwrap();
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        assert_eq!(root, PathBuf::from("/usr/local/stow"));
        #[cfg(target_os = "macos")]
        assert_eq!(root, PathBuf::from("/opt/stow"));
        #[cfg(target_os = "windows")]
        assert_eq!(root, PathBuf::from(r"C:\ProgramData\stowage"));
    }

    #[test]
    fn test_default_root_for_user_process() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_privileged().returning(|| false);
        runtime
            .expect_home_dir()
            .returning(|| Some(PathBuf::from("/home/user")));

        assert_eq!(
            default_repo_root(&runtime).unwrap(),
            PathBuf::from("/home/user/.local/stow")
        );
    }

    #[test]
    fn test_default_root_without_home_fails() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_privileged().returning(|| false);
        runtime.expect_home_dir().returning(|| None);

        assert!(default_repo_root(&runtime).is_err());
    }

    #[test]
    fn test_default_target_is_parent_of_root() {
        assert_eq!(
            default_target_dir(Path::new("/usr/local/stow")).unwrap(),
            PathBuf::from("/usr/local")
        );
    }

    #[test]
    fn test_default_target_rejects_rootless_paths() {
        assert!(default_target_dir(Path::new("/")).is_err());
        assert!(default_target_dir(Path::new("relative")).is_err());
    }
}
