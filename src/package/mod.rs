//! Package bookkeeping: validated names and the on-disk repository of
//! package/version directories with their `current` pointers.

mod name;
mod repository;

pub use name::{CURRENT_LINK, PackageName, VersionName};
pub use repository::PackageRepository;
