use anyhow::Result;
use std::path::PathBuf;

use crate::runtime::{RealRuntime, Runtime};
use crate::stow::{Linker, StowLinker};

use super::paths::{announce, default_repo_root, default_target_dir};

/// Collaborators and resolved locations for one invocation.
pub struct Config<R: Runtime, L: Linker> {
    pub runtime: R,
    pub linker: L,
    pub repo_root: PathBuf,
}

impl Config<RealRuntime, StowLinker> {
    /// Resolve defaults and wire up the real runtime and linker. Flag and
    /// environment overrides arrive already merged by the CLI layer.
    pub fn new(
        runtime: RealRuntime,
        repo_root: Option<PathBuf>,
        target_dir: Option<PathBuf>,
        no_folding: bool,
        verbosity: u8,
    ) -> Result<Self> {
        let repo_root = match repo_root {
            Some(path) => path,
            None => default_repo_root(&runtime)?,
        };
        let target_dir = match target_dir {
            Some(path) => path,
            None => default_target_dir(&repo_root)?,
        };
        announce(&repo_root, &target_dir);

        let linker = StowLinker::new(target_dir, no_folding, verbosity);
        Ok(Self {
            runtime,
            linker,
            repo_root,
        })
    }
}
