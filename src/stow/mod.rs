//! Boundary to the external symlink farm manager.
//!
//! The orchestration layer depends only on the [`Linker`] trait, so the real
//! tool can be swapped for a mock when testing rollback behavior. The
//! production implementation shells out to GNU Stow:
//!
//! ```text
//! stow [--no-folding] [--verbose=N] -t <target> -d <package-dir> current
//! stow -t <target> -d <package-dir> -D current
//! ```

use anyhow::Result;
use log::debug;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::Error;
use crate::package::CURRENT_LINK;

/// Executable name of the default symlink farm manager.
pub const STOW_PROGRAM: &str = "stow";

#[cfg_attr(test, mockall::automock)]
pub trait Linker: Send + Sync {
    /// Fail fast with [`Error::LinkerNotFound`] when the external tool
    /// cannot be located. Mutating operations call this before touching the
    /// filesystem; read-only operations never do.
    fn ensure_available(&self) -> Result<()>;

    /// Link the package's `current` subtree into the target directory.
    /// A non-zero exit surfaces as [`Error::LinkerFailed`] and may leave
    /// partial links behind; the caller decides how to restore invariants.
    fn link(&self, package_dir: &Path) -> Result<()>;

    /// Delete the links previously created for the package's `current`
    /// subtree.
    fn unlink(&self, package_dir: &Path) -> Result<()>;
}

/// [`Linker`] implementation driving a stow-compatible executable as a child
/// process, blocking on its exit status.
#[derive(Debug, Clone)]
pub struct StowLinker {
    program: PathBuf,
    target: PathBuf,
    no_folding: bool,
    verbosity: u8,
}

impl StowLinker {
    pub fn new(target: impl Into<PathBuf>, no_folding: bool, verbosity: u8) -> Self {
        Self::with_program(STOW_PROGRAM, target, no_folding, verbosity)
    }

    /// Drive an alternative stow-compatible executable (e.g. `xstow`).
    pub fn with_program(
        program: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        no_folding: bool,
        verbosity: u8,
    ) -> Self {
        Self {
            program: program.into(),
            target: target.into(),
            no_folding,
            verbosity,
        }
    }

    fn link_args(&self, package_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        if self.no_folding {
            args.push("--no-folding".into());
        }
        if self.verbosity > 0 {
            args.push(format!("--verbose={}", self.verbosity).into());
        }
        args.push("-t".into());
        args.push(self.target.clone().into_os_string());
        args.push("-d".into());
        args.push(package_dir.as_os_str().to_os_string());
        args.push(CURRENT_LINK.into());
        args
    }

    fn unlink_args(&self, package_dir: &Path) -> Vec<OsString> {
        vec![
            "-t".into(),
            self.target.clone().into_os_string(),
            "-d".into(),
            package_dir.as_os_str().to_os_string(),
            "-D".into(),
            CURRENT_LINK.into(),
        ]
    }

    fn run(&self, args: Vec<OsString>) -> Result<()> {
        debug!("running {:?} with {:?}", self.program, args);
        // stdio is inherited so stow's --verbose output reaches the user.
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|err| self.spawn_error(err))?;
        if !status.success() {
            return Err(Error::LinkerFailed {
                status: status.code().unwrap_or(-1),
            }
            .into());
        }
        Ok(())
    }

    fn spawn_error(&self, err: io::Error) -> anyhow::Error {
        if err.kind() == io::ErrorKind::NotFound {
            Error::LinkerNotFound(self.program.display().to_string()).into()
        } else {
            anyhow::Error::new(err).context(format!("failed to run {:?}", self.program))
        }
    }
}

impl Linker for StowLinker {
    fn ensure_available(&self) -> Result<()> {
        // A version probe that spawns at all proves the tool can be located;
        // its exit status is irrelevant here.
        Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|err| self.spawn_error(err))?;
        Ok(())
    }

    fn link(&self, package_dir: &Path) -> Result<()> {
        self.run(self.link_args(package_dir))
    }

    fn unlink(&self, package_dir: &Path) -> Result<()> {
        self.run(self.unlink_args(package_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_to_strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.into_string().unwrap())
            .collect()
    }

    #[test]
    fn test_link_args_minimal() {
        let linker = StowLinker::new("/usr/local", false, 0);
        assert_eq!(
            args_to_strings(linker.link_args(Path::new("/usr/local/stow/foo"))),
            vec!["-t", "/usr/local", "-d", "/usr/local/stow/foo", "current"]
        );
    }

    #[test]
    fn test_link_args_with_options() {
        let linker = StowLinker::new("/usr/local", true, 2);
        assert_eq!(
            args_to_strings(linker.link_args(Path::new("/usr/local/stow/foo"))),
            vec![
                "--no-folding",
                "--verbose=2",
                "-t",
                "/usr/local",
                "-d",
                "/usr/local/stow/foo",
                "current"
            ]
        );
    }

    #[test]
    fn test_unlink_args() {
        let linker = StowLinker::new("/usr/local", true, 1);
        // Delete mode never forwards folding or verbosity options
        assert_eq!(
            args_to_strings(linker.unlink_args(Path::new("/usr/local/stow/foo"))),
            vec!["-t", "/usr/local", "-d", "/usr/local/stow/foo", "-D", "current"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_maps_to_linker_failed() {
        let linker = StowLinker::with_program("false", "/tmp", false, 0);
        let err = linker.link(Path::new("/tmp")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::LinkerFailed { status: 1 })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_zero_exit_is_ok() {
        let linker = StowLinker::with_program("true", "/tmp", false, 0);
        assert!(linker.link(Path::new("/tmp")).is_ok());
        assert!(linker.unlink(Path::new("/tmp")).is_ok());
    }

    #[test]
    fn test_missing_program_maps_to_linker_not_found() {
        let linker =
            StowLinker::with_program("/no/such/dir/definitely-not-stow", "/tmp", false, 0);

        let err = linker.ensure_available().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::LinkerNotFound(_))
        ));

        let err = linker.link(Path::new("/tmp")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::LinkerNotFound(_))
        ));
    }
}
