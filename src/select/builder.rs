//! Filtered tree construction for tree and source modes.

use std::fs;
use std::path::Path;

use super::policy::Policy;
use super::probe::{list_dir, Prober};
use crate::cancel::CancellationToken;
use crate::domain::{TreeMode, TreeNode};
use crate::error::FilterError;
use crate::utils::encoding::is_binary_file;
use crate::utils::{display_name, join_relative};

/// Builds the in-memory filtered tree.
///
/// Returns `Ok(None)` when nothing under the root survives filtering. Any I/O
/// failure or cancellation aborts the whole build.
pub struct TreeBuilder<'a> {
    policy: &'a Policy,
    cancel: &'a CancellationToken,
    prober: Prober<'a>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(policy: &'a Policy, cancel: &'a CancellationToken) -> Self {
        Self { policy, cancel, prober: Prober::new(policy, cancel) }
    }

    /// Tree-mode build. Every kept file is read once to flag binary content.
    pub fn filter_tree(&self, root: &Path) -> Result<Option<TreeNode>, FilterError> {
        self.build_root(root, TreeMode::Tree)
    }

    /// Source-mode build. Files above the size threshold are dropped; content
    /// is not read here, binary files are skipped at render time.
    pub fn filter_source_tree(&self, root: &Path) -> Result<Option<TreeNode>, FilterError> {
        self.build_root(root, TreeMode::Source)
    }

    fn build_root(&self, root: &Path, mode: TreeMode) -> Result<Option<TreeNode>, FilterError> {
        self.cancel.check()?;
        let metadata = fs::metadata(root).map_err(|e| FilterError::io(root, e))?;
        let name = display_name(root);

        if !metadata.is_dir() {
            // A single-file root is matched by its own name.
            return self.build_file(root, name.clone(), name, mode);
        }

        let node = self.build_dir(root, String::new(), name, mode)?;
        if node.is_none() {
            tracing::debug!(root = %root.display(), %mode, "nothing to include");
        }
        Ok(node)
    }

    fn build_dir(
        &self,
        dir: &Path,
        relative: String,
        name: String,
        mode: TreeMode,
    ) -> Result<Option<TreeNode>, FilterError> {
        self.cancel.check()?;

        let mut children = Vec::new();
        for entry in list_dir(dir)? {
            let child_relative = join_relative(&relative, &entry.name);
            let child = if entry.is_dir {
                if !self.prober.dir_has_allowed(&entry.path, &child_relative, mode)? {
                    tracing::trace!(path = %child_relative, %mode, "pruned directory");
                    continue;
                }
                self.build_dir(&entry.path, child_relative, entry.name, mode)?
            } else {
                self.build_file(&entry.path, child_relative, entry.name, mode)?
            };
            children.extend(child);
        }

        if children.is_empty() {
            return Ok(None);
        }
        Ok(Some(TreeNode::dir(name, dir.to_path_buf(), relative, children)))
    }

    fn build_file(
        &self,
        path: &Path,
        relative: String,
        name: String,
        mode: TreeMode,
    ) -> Result<Option<TreeNode>, FilterError> {
        if !self.policy.is_allowed(&relative, mode) {
            return Ok(None);
        }

        let size = fs::metadata(path).map_err(|e| FilterError::io(path, e))?.len();
        let is_binary = match mode {
            TreeMode::Tree => is_binary_file(path).map_err(|e| FilterError::io(path, e))?,
            TreeMode::Source => {
                if self.policy.exceeds_threshold(size) {
                    tracing::debug!(
                        path = %relative,
                        size,
                        threshold_mb = self.policy.size_threshold_mb(),
                        "skipping file above size threshold"
                    );
                    return Ok(None);
                }
                false
            }
        };

        Ok(Some(TreeNode::file(name, path.to_path_buf(), relative, size, is_binary)))
    }
}
