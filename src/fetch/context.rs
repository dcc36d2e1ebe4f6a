//! Traversal root ownership

use std::path::{Path, PathBuf};

/// The directory (or file) a run traverses.
///
/// Remote repositories live in a temporary directory that is removed when the
/// context is dropped.
#[derive(Debug)]
pub struct RepoContext {
    pub root_path: PathBuf,
    temp_dir: Option<PathBuf>,
}

impl RepoContext {
    pub fn local(root_path: PathBuf) -> Self {
        Self { root_path, temp_dir: None }
    }

    /// A root somewhere inside `temp_dir`, which is owned by this context.
    pub fn temporary(root_path: PathBuf, temp_dir: PathBuf) -> Self {
        Self { root_path, temp_dir: Some(temp_dir) }
    }

    pub fn is_temp(&self) -> bool {
        self.temp_dir.is_some()
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }
}

impl Drop for RepoContext {
    fn drop(&mut self) {
        if let Some(dir) = &self.temp_dir {
            if let Err(e) = std::fs::remove_dir_all(dir) {
                tracing::debug!("Failed removing temp directory {}: {}", dir.display(), e);
            }
        }
    }
}
