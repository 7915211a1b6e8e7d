//! Failure taxonomy for repository and orchestration operations.
//!
//! Commands propagate `anyhow::Error` internally; the variants here are the
//! failures callers are expected to react to, and the binary recovers them
//! with `downcast_ref` to pick its exit code. Anything else (permission
//! denied, disk full) stays an untyped fatal error.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A package or version name violates the naming rules.
    #[error("invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: NameKind,
        name: String,
        reason: &'static str,
    },

    /// The named package has no directory under the repository root.
    #[error("no such package '{0}'")]
    NoSuchPackage(String),

    /// The named version of a package is not installed.
    #[error("package '{package}/{version}' is not installed")]
    NotInstalled { package: String, version: String },

    /// A version directory already exists where a fresh install would land.
    #[error("package '{package}/{version}' is already installed")]
    AlreadyInstalled { package: String, version: String },

    /// The source tree given to `install` does not exist.
    #[error("source path '{}' does not exist", .0.display())]
    SourceNotFound(PathBuf),

    /// The package has no `current` link and the caller required one.
    #[error("package '{0}' is not stowed")]
    NotStowed(String),

    /// The external linker executable could not be located.
    #[error("'{0}' not found on PATH")]
    LinkerNotFound(String),

    /// The external linker ran and reported failure.
    #[error("stow returned code {status}")]
    LinkerFailed { status: i32 },

    /// An interactive confirmation was answered with anything but yes.
    #[error("aborted by user")]
    Declined,
}

impl Error {
    /// Process exit code for this failure: 2 for usage errors (matching
    /// clap's own convention), 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidName { .. } => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Package,
    Version,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Package => write!(f, "package"),
            NameKind::Version => write!(f, "version"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::NotInstalled {
            package: "foo".into(),
            version: "1.0".into(),
        };
        assert_eq!(err.to_string(), "package 'foo/1.0' is not installed");

        let err = Error::LinkerFailed { status: 2 };
        assert_eq!(err.to_string(), "stow returned code 2");

        let err = Error::SourceNotFound(PathBuf::from("/no/such/tree"));
        assert_eq!(err.to_string(), "source path '/no/such/tree' does not exist");
    }

    #[test]
    fn test_exit_codes() {
        let usage = Error::InvalidName {
            kind: NameKind::Version,
            name: "a/b".into(),
            reason: "must not contain path separators",
        };
        assert_eq!(usage.exit_code(), 2);

        assert_eq!(Error::Declined.exit_code(), 1);
        assert_eq!(Error::LinkerFailed { status: 7 }.exit_code(), 1);
        assert_eq!(Error::NoSuchPackage("foo".into()).exit_code(), 1);
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = Error::NotStowed("foo".into()).into();
        let err = err.context("while restowing");
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NotStowed(name)) if name == "foo"
        ));
    }
}
