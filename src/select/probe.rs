//! Reachability probing: does a subtree hold at least one allowed file?

use std::fs;
use std::path::{Path, PathBuf};

use super::policy::Policy;
use crate::cancel::CancellationToken;
use crate::domain::TreeMode;
use crate::error::FilterError;
use crate::utils::join_relative;

/// A directory entry, in the order the walk visits it.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// List a directory sorted by name.
///
/// A symbolic link to a regular file is listed as that file. Links to
/// directories and dangling links are left out, so the walk never loops.
pub(crate) fn list_dir(dir: &Path) -> Result<Vec<Entry>, FilterError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| FilterError::io(dir, e))? {
        let entry = entry.map_err(|e| FilterError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| FilterError::io(&path, e))?;
        let is_dir = if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(target) if target.is_file() => false,
                _ => {
                    tracing::debug!(path = %path.display(), "skipping symlink");
                    continue;
                }
            }
        } else {
            file_type.is_dir()
        };
        entries.push(Entry { name: entry.file_name().to_string_lossy().to_string(), path, is_dir });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Recursively searches for allowed files so empty branches can be skipped
/// before the builder descends into them.
#[derive(Debug, Clone, Copy)]
pub struct Prober<'a> {
    policy: &'a Policy,
    cancel: &'a CancellationToken,
}

impl<'a> Prober<'a> {
    pub fn new(policy: &'a Policy, cancel: &'a CancellationToken) -> Self {
        Self { policy, cancel }
    }

    /// `path` is the location on disk, `relative` the root-relative path used
    /// for policy matching.
    pub fn has_allowed(
        &self,
        path: &Path,
        relative: &str,
        mode: TreeMode,
    ) -> Result<bool, FilterError> {
        self.cancel.check()?;
        let metadata = fs::metadata(path).map_err(|e| FilterError::io(path, e))?;
        if !metadata.is_dir() {
            return Ok(self.policy.is_allowed(relative, mode));
        }
        self.dir_has_allowed(path, relative, mode)
    }

    pub(crate) fn dir_has_allowed(
        &self,
        dir: &Path,
        relative: &str,
        mode: TreeMode,
    ) -> Result<bool, FilterError> {
        self.cancel.check()?;
        for entry in list_dir(dir)? {
            let child = join_relative(relative, &entry.name);
            let allowed = if entry.is_dir {
                self.dir_has_allowed(&entry.path, &child, mode)?
            } else {
                self.policy.is_allowed(&child, mode)
            };
            if allowed {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_probe_finds_nested_allowed_file() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path();
        fs::create_dir_all(root.join("a/b/c")).expect("mkdir");
        fs::write(root.join("a/b/c/deep.go"), "package c").expect("write");

        let policy = Policy::new(&Config::default());
        let cancel = CancellationToken::new();
        let prober = Prober::new(&policy, &cancel);

        assert!(prober.has_allowed(&root.join("a"), "a", TreeMode::Tree).expect("probe"));
    }

    #[test]
    fn test_probe_reports_fully_ignored_subtree() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path();
        fs::create_dir_all(root.join("vendor/lib/empty")).expect("mkdir");
        fs::write(root.join("vendor/lib/x.go"), "package lib").expect("write");

        let policy = Policy::new(&Config::default());
        let cancel = CancellationToken::new();
        let prober = Prober::new(&policy, &cancel);

        let vendor = root.join("vendor");
        assert!(prober.has_allowed(&vendor, "vendor", TreeMode::Tree).expect("probe"));
        assert!(!prober.has_allowed(&vendor, "vendor", TreeMode::Source).expect("probe"));
    }

    #[test]
    fn test_probe_checks_file_directly() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".env"), "SECRET=1").expect("write");

        let policy = Policy::new(&Config::default());
        let cancel = CancellationToken::new();
        let prober = Prober::new(&policy, &cancel);

        let env = tmp.path().join(".env");
        assert!(!prober.has_allowed(&env, ".env", TreeMode::Tree).expect("probe"));
    }

    #[test]
    fn test_probe_stops_when_cancelled() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("a.txt"), "a").expect("write");

        let policy = Policy::new(&Config::default());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let prober = Prober::new(&policy, &cancel);

        let result = prober.has_allowed(tmp.path(), "", TreeMode::Tree);
        assert!(matches!(result, Err(FilterError::Cancelled)));
    }

    #[test]
    fn test_probe_missing_path_is_hard_error() {
        let tmp = TempDir::new().expect("tmp");
        let policy = Policy::new(&Config::default());
        let cancel = CancellationToken::new();
        let prober = Prober::new(&policy, &cancel);

        let result = prober.has_allowed(&tmp.path().join("missing"), "missing", TreeMode::Tree);
        assert!(matches!(result, Err(FilterError::Io { .. })));
    }

    #[test]
    fn test_list_dir_is_sorted() {
        let tmp = TempDir::new().expect("tmp");
        for name in ["b.txt", "a.txt", "c"] {
            fs::write(tmp.path().join(name), name).expect("write");
        }
        let names: Vec<String> =
            list_dir(tmp.path()).expect("list").into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c"]);
    }
}
