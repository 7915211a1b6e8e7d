//! Validated package and version names.
//!
//! Both names become single path segments under the repository root, so they
//! are checked once, at the CLI boundary, before any path is composed.
//! Nothing downstream re-validates.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, NameKind};

/// Name of the symlink selecting a package's active version. Reserved: no
/// version may be called this.
pub const CURRENT_LINK: &str = "current";

/// A package name: one non-empty path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PackageName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        validate_segment(NameKind::Package, s)?;
        Ok(Self(s.to_string()))
    }
}

/// A version name: one non-empty path segment, and never the reserved
/// literal `current`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionName(String);

impl VersionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VersionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        validate_segment(NameKind::Version, s)?;
        if s == CURRENT_LINK {
            return Err(Error::InvalidName {
                kind: NameKind::Version,
                name: s.to_string(),
                reason: "'current' is reserved",
            });
        }
        Ok(Self(s.to_string()))
    }
}

fn validate_segment(kind: NameKind, name: &str) -> Result<(), Error> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.contains('/') || name.contains('\\') {
        Some("must not contain path separators")
    } else if name.contains('\0') {
        Some("must not contain null bytes")
    } else if name == "." || name == ".." {
        Some("must be a directory name")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidName {
            kind,
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
