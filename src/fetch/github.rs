//! Remote repository specs and cloning

use crate::fetch::RepoContext;
use anyhow::{Context, Result};
use git2::{FetchOptions, ObjectType, Repository};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// A parsed repository argument: clone URL plus optional branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub url: String,
    pub branch: Option<String>,
}

impl RepoSpec {
    /// Parse `owner/repo`, `github.com/owner/repo`, an HTTPS URL or a
    /// `git@host:owner/repo` SSH URL, each with an optional `@branch` suffix.
    ///
    /// Anything that is not an SSH URL is assumed to live on GitHub.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() || input == "." {
            anyhow::bail!("'{}' is not a valid repository name", input);
        }

        if input.starts_with("git@") {
            // The first '@' belongs to the SSH user.
            let (url, branch) = match (input.find('@'), input.rfind('@')) {
                (Some(first), Some(last)) if last > first => {
                    (input[..last].trim(), non_empty(input[last + 1..].trim()))
                }
                _ => (input, None),
            };
            return Ok(Self { url: url.to_string(), branch });
        }

        let (repo, branch) = match input.rsplit_once('@') {
            Some((repo, branch)) => (repo.trim(), non_empty(branch.trim())),
            None => (input, None),
        };

        if !repo.contains('/') {
            anyhow::bail!("invalid repository format: {}", repo);
        }

        let repo = repo.strip_prefix("https://").unwrap_or(repo);
        let repo = repo.strip_prefix("http://").unwrap_or(repo);
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        let url = if repo.starts_with("github.com/") {
            format!("https://{}.git", repo)
        } else {
            format!("https://github.com/{}.git", repo)
        };
        Ok(Self { url, branch })
    }

    /// Last path segment of the URL without `.git`.
    pub fn name(&self) -> &str {
        let trimmed = self.url.trim_end_matches('/');
        let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
        let name = last.strip_suffix(".git").unwrap_or(last);
        if name.is_empty() {
            "repo"
        } else {
            name
        }
    }
}

impl fmt::Display for RepoSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.branch {
            Some(branch) => write!(f, "{} (branch {})", self.url, branch),
            None => write!(f, "{}", self.url),
        }
    }
}

/// Clone `spec` into a fresh temporary directory.
///
/// The traversal root is a subdirectory named after the repository, so the
/// tree listing starts with the repository name.
pub fn clone_repository(spec: &RepoSpec) -> Result<RepoContext> {
    let temp_dir = build_temp_repo_dir();
    let dest = temp_dir.join(spec.name());
    std::fs::create_dir_all(&dest)
        .with_context(|| format!("Failed creating temp directory: {}", dest.display()))?;
    // From here on the context owns the directory and removes it on any error.
    let ctx = RepoContext::temporary(dest.clone(), temp_dir);

    let url = spec.url.as_str();
    tracing::info!("Cloning {}...", spec);

    match spec.branch.as_deref() {
        Some(branch) => {
            if let Err(e) = shallow_clone(url, &dest, Some(branch)) {
                tracing::debug!("Shallow clone failed, retrying with a full clone: {:#}", e);
                reset_dir(&dest)?;
                let repo = Repository::clone(url, &dest)
                    .with_context(|| format!("Failed cloning repository from {url}"))?;
                checkout_branch(&repo, branch)?;
            }
        }
        None => {
            if let Err(e) = shallow_clone(url, &dest, None) {
                tracing::debug!("Shallow clone failed, retrying with a full clone: {:#}", e);
                reset_dir(&dest)?;
                Repository::clone(url, &dest)
                    .with_context(|| format!("Failed cloning repository from {url}"))?;
            }
        }
    }

    tracing::info!("Cloned {}", spec);
    Ok(ctx)
}

/// Shallow clone (depth=1), restricted to `branch` when given.
fn shallow_clone(url: &str, dest: &Path, branch: Option<&str>) -> Result<Repository> {
    let mut fo = FetchOptions::new();
    fo.depth(1);

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fo);
    if let Some(branch) = branch {
        builder.branch(branch);
    }

    builder.clone(url, dest).with_context(|| format!("Shallow clone from {url} failed"))
}

fn checkout_branch(repo: &Repository, branch: &str) -> Result<()> {
    let object = repo
        .revparse_single(&format!("origin/{branch}"))
        .or_else(|_| repo.revparse_single(branch))
        .with_context(|| format!("Failed to resolve branch: {branch}"))?;

    repo.checkout_tree(&object, None)
        .with_context(|| format!("Failed to checkout tree for branch: {branch}"))?;

    if object.kind() == Some(ObjectType::Commit) {
        repo.set_head_detached(object.id())
            .with_context(|| format!("Failed to set detached HEAD for branch: {branch}"))?;
    }

    Ok(())
}

fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("Failed cleaning directory: {}", dir.display()))?;
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed creating directory: {}", dir.display()))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn build_temp_repo_dir() -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
    let pid = std::process::id();
    env::temp_dir().join(format!("aictx-{pid}-{nanos}"))
}
