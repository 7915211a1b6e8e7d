//! stowage - versioned package management on top of an external symlink
//! farm manager (GNU Stow).
//!
//! Packages live under a repository root as `<package>/<version>/`
//! directories; a `current` symlink per package selects the version that is
//! linked into the target directory. The symlink doubles as the only record
//! of linked state.
//!
//! Not safe against concurrent invocations on the same repository root: no
//! locking is performed, and two processes can race on the `current`
//! pointer or on a copy/delete.

pub mod application;
pub mod commands;
pub mod error;
pub mod package;
pub mod runtime;
pub mod stow;

pub use error::Error;
