//! Core domain types shared by selection, rendering and configuration.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;

/// Default size threshold (MB) above which files are left out of source output.
pub const DEFAULT_THRESHOLD_MB: f64 = 0.1;

/// Which output a selection decision is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeMode {
    /// Pruned directory listing.
    Tree,
    /// Concatenated file contents.
    Source,
}

impl fmt::Display for TreeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeMode::Tree => write!(f, "tree"),
            TreeMode::Source => write!(f, "source"),
        }
    }
}

/// A node of the filtered tree.
///
/// Directories own their children directly. A directory node only exists if
/// at least one file below it survived filtering, so `children` is never empty
/// once the builder hands the tree out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    /// Location on disk.
    pub path: PathBuf,
    /// Slash-separated path relative to the traversal root, used for matching
    /// and in file headers.
    pub relative_path: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File {
        size: u64,
        /// Only probed by the tree-mode builder; source mode decides at render time.
        is_binary: bool,
    },
    Dir {
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    pub fn file(
        name: String,
        path: PathBuf,
        relative_path: String,
        size: u64,
        is_binary: bool,
    ) -> Self {
        Self { name, path, relative_path, kind: NodeKind::File { size, is_binary } }
    }

    pub fn dir(
        name: String,
        path: PathBuf,
        relative_path: String,
        children: Vec<TreeNode>,
    ) -> Self {
        Self { name, path, relative_path, kind: NodeKind::Dir { children } }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Dir { .. })
    }

    /// File size in bytes; zero for directories.
    pub fn size(&self) -> u64 {
        match self.kind {
            NodeKind::File { size, .. } => size,
            NodeKind::Dir { .. } => 0,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.kind, NodeKind::File { is_binary: true, .. })
    }

    pub fn children(&self) -> &[TreeNode] {
        match &self.kind {
            NodeKind::Dir { children } => children,
            NodeKind::File { .. } => &[],
        }
    }

    /// Fold the file leaves below this node into counts and sizes.
    pub fn summary(&self) -> Summary {
        match &self.kind {
            NodeKind::File { size, .. } => {
                Summary { file_count: 1, total_size: *size, max_size: *size }
            }
            NodeKind::Dir { children } => {
                children.iter().fold(Summary::default(), |acc, child| acc.merge(child.summary()))
            }
        }
    }
}

/// File count and size totals of a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub file_count: usize,
    pub total_size: u64,
    pub max_size: u64,
}

impl Summary {
    pub fn merge(self, other: Summary) -> Summary {
        Summary {
            file_count: self.file_count + other.file_count,
            total_size: self.total_size + other.total_size,
            max_size: self.max_size.max(other.max_size),
        }
    }
}

/// Resolved run configuration.
///
/// Pattern fields hold comma-separated glob lists. In config files they may
/// also be written as arrays, which are joined with commas on load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[serde(deserialize_with = "pattern_list")]
    pub include: String,
    #[serde(deserialize_with = "pattern_list")]
    pub exclude: String,
    pub tree: TreeSettings,
    pub source: SourceSettings,
    /// Apply the built-in core ignore tables.
    pub core_ignores: bool,
    /// Load `.gitignore` patterns in addition to `.aictxignore`.
    pub respect_gitignore: bool,
    /// Source output without summary and headers.
    pub raw: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: String::new(),
            exclude: String::new(),
            tree: TreeSettings::default(),
            source: SourceSettings::default(),
            core_ignores: true,
            respect_gitignore: true,
            raw: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeSettings {
    pub enabled: bool,
    #[serde(deserialize_with = "pattern_list")]
    pub include: String,
    #[serde(deserialize_with = "pattern_list")]
    pub exclude: String,
    pub show_hidden: bool,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self { enabled: true, include: String::new(), exclude: String::new(), show_hidden: false }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSettings {
    pub enabled: bool,
    #[serde(deserialize_with = "pattern_list")]
    pub include: String,
    #[serde(deserialize_with = "pattern_list")]
    pub exclude: String,
    pub show_hidden: bool,
    pub threshold_mb: f64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            include: String::new(),
            exclude: String::new(),
            show_hidden: false,
            threshold_mb: DEFAULT_THRESHOLD_MB,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternList {
    Csv(String),
    List(Vec<String>),
}

fn pattern_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PatternList::deserialize(deserializer)? {
        PatternList::Csv(csv) => csv,
        PatternList::List(items) => items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(","),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> TreeNode {
        TreeNode::file(name.to_string(), PathBuf::from(name), name.to_string(), size, false)
    }

    #[test]
    fn test_summary_folds_nested_files() {
        let tree = TreeNode::dir(
            "root".to_string(),
            PathBuf::from("root"),
            String::new(),
            vec![
                file("a.txt", 10),
                TreeNode::dir(
                    "src".to_string(),
                    PathBuf::from("root/src"),
                    "src".to_string(),
                    vec![file("main.rs", 250), file("lib.rs", 40)],
                ),
            ],
        );

        let summary = tree.summary();
        assert_eq!(summary.file_count, 3);
        assert_eq!(summary.total_size, 300);
        assert_eq!(summary.max_size, 250);
    }

    #[test]
    fn test_summary_of_single_file_and_empty_dir() {
        assert_eq!(
            file("a", 7).summary(),
            Summary { file_count: 1, total_size: 7, max_size: 7 }
        );
        let empty = TreeNode::dir("d".into(), PathBuf::from("d"), String::new(), Vec::new());
        assert_eq!(empty.summary(), Summary::default());
    }

    #[test]
    fn test_config_defaults() {
        let cfg = Config::default();
        assert!(cfg.tree.enabled && cfg.source.enabled);
        assert!(cfg.core_ignores && cfg.respect_gitignore);
        assert_eq!(cfg.source.threshold_mb, DEFAULT_THRESHOLD_MB);
    }

    #[test]
    fn test_config_pattern_lists_accept_arrays() {
        let cfg: Config = toml::from_str(
            "include = [\"*.rs\", \" *.toml \", \"\"]\n[source]\nexclude = \"tests/**\"\n",
        )
        .expect("config");
        assert_eq!(cfg.include, "*.rs,*.toml");
        assert_eq!(cfg.source.exclude, "tests/**");
        assert!(cfg.tree.enabled);
    }
}
