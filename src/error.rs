//! Errors raised while filtering and rendering a tree.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Hard failures of a build or render pass.
///
/// A subtree that is simply excluded by policy is not an error: builders
/// report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("operation cancelled")]
    Cancelled,
}

impl FilterError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}
