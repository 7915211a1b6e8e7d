//! Command handlers: one function per CLI subcommand. Each resolves its
//! collaborators from [`Config`], calls into the application layer, and
//! prints the outcome.

mod config;
mod install;
mod list;
mod paths;
mod stow;
mod uninstall;

pub use config::Config;
pub use install::install;
pub use list::list;
pub use stow::{restow, stow, unstow};
pub use uninstall::uninstall;
