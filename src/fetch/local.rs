//! Local path validation

use crate::fetch::RepoContext;
use anyhow::Result;
use std::path::Path;

/// Accept an existing file or directory as the traversal root.
///
/// The path is kept as given so that the tree listing shows the name the user
/// typed (`.` stays `.`).
pub fn validate_local_path(path: &Path) -> Result<RepoContext> {
    if !path.exists() {
        anyhow::bail!(
            "Failed to access input path '{}': no such file or directory",
            path.display()
        );
    }
    let shown = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    tracing::info!("Loaded local path \"{}\"", shown.display());
    Ok(RepoContext::local(path.to_path_buf()))
}
