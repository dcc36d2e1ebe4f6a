//! Orchestration of one run: ignore files, policy, tree pass and source pass.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::cancel::CancellationToken;
use crate::domain::{Config, Summary};
use crate::render::{
    source_summary_line, tree_summary_line, write_source, write_source_raw, write_tree,
};
use crate::select::{load_user_patterns, Policy, TreeBuilder};
use crate::utils::format_size;

/// Per-pass totals of a finished run. A pass that was disabled or had nothing
/// to show is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackReport {
    pub tree: Option<Summary>,
    pub source: Option<Summary>,
}

impl PackReport {
    /// One line per pass that produced output, for verbose logging.
    pub fn messages(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(tree) = &self.tree {
            lines.push(format!(
                "Calculated tree {} files ({})",
                tree.file_count,
                format_size(tree.total_size)
            ));
        }
        if let Some(source) = &self.source {
            lines.push(format!(
                "Concatenated source of {} files ({})",
                source.file_count,
                format_size(source.total_size)
            ));
        }
        lines
    }
}

/// Write the tree listing and/or the source dump of `root` into `out`.
///
/// `output_name` is the destination file, if any; files with the same base
/// name are never selected.
pub fn write_pack(
    root: &Path,
    config: &Config,
    output_name: Option<&str>,
    out: &mut dyn Write,
    cancel: &CancellationToken,
) -> Result<PackReport> {
    let metadata = fs::metadata(root)
        .with_context(|| format!("Failed to access input path '{}'", root.display()))?;

    let user_patterns = if metadata.is_dir() {
        load_user_patterns(root, config.respect_gitignore).context("Error reading ignore files")?
    } else {
        Vec::new()
    };
    let policy =
        Policy::new(config).with_user_patterns(user_patterns).excluding_output(output_name);
    let builder = TreeBuilder::new(&policy, cancel);

    let mut report = PackReport::default();

    if config.tree.enabled {
        report.tree = tree_pass(root, &builder, out)?;
    }

    if config.source.enabled {
        if config.tree.enabled {
            writeln!(out)?;
        }
        report.source = source_pass(root, config.raw, &builder, out, cancel)?;
    }

    out.flush()?;
    Ok(report)
}

fn tree_pass(root: &Path, builder: &TreeBuilder, out: &mut dyn Write) -> Result<Option<Summary>> {
    let Some(tree) = builder.filter_tree(root).context("Error filtering tree")? else {
        return Ok(None);
    };

    if !tree.is_dir() {
        writeln!(out, "{}", tree.name)?;
        return Ok(Some(tree.summary()));
    }

    let summary = tree.summary();
    writeln!(out, "{}", tree_summary_line(&summary))?;
    write_tree(&tree, out)?;
    Ok(Some(summary))
}

fn source_pass(
    root: &Path,
    raw: bool,
    builder: &TreeBuilder,
    out: &mut dyn Write,
    cancel: &CancellationToken,
) -> Result<Option<Summary>> {
    let Some(tree) = builder.filter_source_tree(root).context("Error filtering source files")?
    else {
        return Ok(None);
    };

    let summary = tree.summary();
    if raw {
        write_source_raw(&tree, out, cancel)?;
    } else {
        writeln!(out, "{}", source_summary_line(&summary))?;
        write_source(&tree, summary.file_count, out, cancel)?;
    }
    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path().join("proj");
        fs::create_dir(&root).expect("mkdir");
        fs::write(root.join("a.txt"), "0123456789").expect("write a");
        fs::write(root.join("b.bin"), [0u8, 159, 146, 150]).expect("write b");
        fs::create_dir(root.join("vendor")).expect("mkdir vendor");
        fs::write(root.join("vendor/x.go"), "package x\n").expect("write x");
        tmp
    }

    fn pack(root: &Path, config: &Config, output_name: Option<&str>) -> (String, PackReport) {
        let mut out = Vec::new();
        let report = write_pack(root, config, output_name, &mut out, &CancellationToken::new())
            .expect("pack");
        (String::from_utf8(out).expect("utf8"), report)
    }

    #[test]
    fn test_full_pack_output() {
        let tmp = fixture();
        let (text, report) = pack(&tmp.path().join("proj"), &Config::default(), None);

        let block_header = crate::render::file_header("a.txt", 10, 1, 2);
        let expected = format!(
            "\
Project Tree [3 files, 24 B total, max 10 B] (* - for binary files)
proj
├── a.txt
├── b.bin *
└── vendor
    └── x.go

Project Source [2 files, 14 B total, max 10 B]
{block_header}0123456789
"
        );
        similar_asserts::assert_eq!(text, expected);
        assert_eq!(report.tree.map(|s| s.file_count), Some(3));
        assert_eq!(report.source.map(|s| s.file_count), Some(2));
        assert_eq!(
            report.messages(),
            vec!["Calculated tree 3 files (24 B)", "Concatenated source of 2 files (14 B)"]
        );
    }

    #[test]
    fn test_ignore_files_are_applied() {
        let tmp = fixture();
        let root = tmp.path().join("proj");
        fs::write(root.join(".aictxignore"), "# local\nvendor\n").expect("write");
        fs::write(root.join(".gitignore"), "*.bin\n").expect("write");

        let mut config = Config::default();
        config.source.enabled = false;
        let (text, _) = pack(&root, &config, None);
        assert!(text.starts_with("Project Tree [1 files"));
        assert!(!text.contains("vendor"));
        assert!(!text.contains("b.bin"));

        config.respect_gitignore = false;
        let (text, _) = pack(&root, &config, None);
        assert!(text.contains("b.bin *"));
        assert!(!text.contains("vendor"));
    }

    #[test]
    fn test_output_file_is_never_selected() {
        let tmp = fixture();
        let root = tmp.path().join("proj");
        fs::write(root.join("output.txt"), "previous dump").expect("write");

        let (text, _) = pack(&root, &Config::default(), Some("output.txt"));
        assert!(!text.contains("output.txt"));
        assert!(!text.contains("previous dump"));
    }

    #[test]
    fn test_raw_source_only() {
        let tmp = fixture();
        let mut config = Config { raw: true, ..Config::default() };
        config.tree.enabled = false;

        let (text, report) = pack(&tmp.path().join("proj"), &config, None);
        assert_eq!(text, "0123456789\n");
        assert!(report.tree.is_none());
    }

    #[test]
    fn test_single_file_root() {
        let tmp = fixture();
        let (text, _) = pack(&tmp.path().join("proj/a.txt"), &Config::default(), None);
        assert!(text.starts_with("a.txt\n\nProject Source [1 files, 10 B total, max 10 B]\n"));
        let tail = format!("File: a.txt\nSize: 10 B\n{}\n0123456789\n", "-".repeat(60));
        assert!(text.ends_with(&tail));
    }

    #[test]
    fn test_empty_selection_writes_only_separator() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".env"), "SECRET=1").expect("write");

        let (text, report) = pack(tmp.path(), &Config::default(), None);
        assert_eq!(text, "\n");
        assert_eq!(report, PackReport::default());
        assert!(report.messages().is_empty());
    }

    #[test]
    fn test_missing_root_fails() {
        let tmp = TempDir::new().expect("tmp");
        let mut out = Vec::new();
        let result = write_pack(
            &tmp.path().join("missing"),
            &Config::default(),
            None,
            &mut out,
            &CancellationToken::new(),
        );
        assert!(result.is_err());
    }
}
