//! Input resolution (local path or remote repository)

use anyhow::{Context, Result};
use std::path::Path;

pub mod context;
pub mod github;
pub mod local;

pub use context::RepoContext;
pub use github::RepoSpec;

/// Turn the INPUT argument into a traversal root.
///
/// Local when `force_local` is set, when the input is `.`, or when it exists
/// on disk; otherwise the input is parsed as a repository spec and cloned.
pub fn resolve_input(input: &str, force_local: bool) -> Result<RepoContext> {
    let path = Path::new(input);
    if force_local || input == "." || path.exists() {
        return local::validate_local_path(path);
    }

    let spec = RepoSpec::parse(input)
        .with_context(|| format!("invalid git repository URL[{}]", input))?;
    github::clone_repository(&spec).with_context(|| format!("Failed to load git repo {}", spec))
}
