//! Shared helpers: the filesystem collaborator and home directory lookup.

mod fs;

use std::path::PathBuf;

pub use fs::{LocalFs, MemoryFs, WorkspaceFs};

pub(crate) fn home_dir() -> Option<PathBuf> {
    directories::UserDirs::new().map(|d| d.home_dir().to_path_buf())
}
