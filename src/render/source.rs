//! Concatenated source output: annotated blocks or raw content.
//!
//! Binary detection happens here, on the content actually read, so a binary
//! file still counts toward the source summary but produces no block. A file
//! that cannot be read or written is logged and skipped; only cancellation
//! aborts the dump.

use std::fs;
use std::io::{self, Write};

use crate::cancel::CancellationToken;
use crate::domain::{Summary, TreeNode};
use crate::error::FilterError;
use crate::utils::{format_size, is_binary};

/// Width of the delimiter lines around each file header.
pub const HEADER_WIDTH: usize = 60;

pub fn source_summary_line(summary: &Summary) -> String {
    format!(
        "Project Source [{} files, {} total, max {}]",
        summary.file_count,
        format_size(summary.total_size),
        format_size(summary.max_size)
    )
}

/// Zero-padded `[index/total]` counter; the width is the digit count of `total`.
pub fn file_counter(index: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("[{:0width$}/{}]", index, total, width = width)
}

/// Header block written before each file's content.
pub fn file_header(relative_path: &str, size: u64, index: usize, total: usize) -> String {
    let counter = file_counter(index, total);
    let remaining = HEADER_WIDTH.saturating_sub(counter.len());
    let left = remaining / 2;
    let right = remaining - left;

    let mut header = format!("{}{}{}\n", "=".repeat(left), counter, "=".repeat(right));
    header.push_str(&format!("File: {}\n", relative_path));
    if size > 0 {
        header.push_str(&format!("Size: {}\n", format_size(size)));
    }
    header.push_str(&"-".repeat(HEADER_WIDTH));
    header.push('\n');
    header
}

/// Write every text file under `root` as a numbered block.
///
/// `total` is the file count of the source summary. The counter advances for
/// every file leaf, including binary and unreadable ones that get no block.
pub fn write_source<W: Write + ?Sized>(
    root: &TreeNode,
    total: usize,
    out: &mut W,
    cancel: &CancellationToken,
) -> Result<(), FilterError> {
    let mut counter = 0;
    write_annotated(root, total, &mut counter, out, cancel)
}

/// Write every text file under `root` followed by a blank line, without headers.
pub fn write_source_raw<W: Write + ?Sized>(
    root: &TreeNode,
    out: &mut W,
    cancel: &CancellationToken,
) -> Result<(), FilterError> {
    cancel.check()?;

    if root.is_dir() {
        for child in root.children() {
            write_source_raw(child, out, cancel)?;
        }
        return Ok(());
    }

    let Some(data) = read_text(root) else {
        return Ok(());
    };
    if let Err(e) = write_block(out, None, &data) {
        tracing::warn!("Error writing content from '{}': {}", root.relative_path, e);
    }
    Ok(())
}

fn write_annotated<W: Write + ?Sized>(
    node: &TreeNode,
    total: usize,
    counter: &mut usize,
    out: &mut W,
    cancel: &CancellationToken,
) -> Result<(), FilterError> {
    cancel.check()?;

    if node.is_dir() {
        for child in node.children() {
            write_annotated(child, total, counter, out, cancel)?;
        }
        return Ok(());
    }

    *counter += 1;
    let Some(data) = read_text(node) else {
        return Ok(());
    };
    let header = file_header(&node.relative_path, node.size(), *counter, total);
    if let Err(e) = write_block(out, Some(&header), &data) {
        tracing::warn!("Error writing content from '{}': {}", node.relative_path, e);
    }
    Ok(())
}

/// File content, or `None` when it is unreadable or binary.
fn read_text(node: &TreeNode) -> Option<Vec<u8>> {
    let data = match fs::read(&node.path) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("Error reading file '{}': {}", node.relative_path, e);
            return None;
        }
    };
    if is_binary(&data) {
        tracing::debug!(path = %node.relative_path, "skipping binary file");
        return None;
    }
    Some(data)
}

fn write_block<W: Write + ?Sized>(
    out: &mut W,
    header: Option<&str>,
    data: &[u8],
) -> io::Result<()> {
    if let Some(header) = header {
        out.write_all(header.as_bytes())?;
    }
    out.write_all(data)?;
    out.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn disk_file(root: &Path, rel: &str, content: &[u8]) -> TreeNode {
        let path = root.join(rel);
        fs::write(&path, content).expect("write");
        let name = rel.rsplit('/').next().expect("name").to_string();
        TreeNode::file(name, path, rel.to_string(), content.len() as u64, false)
    }

    #[test]
    fn test_file_counter_padding() {
        assert_eq!(file_counter(1, 6), "[1/6]");
        assert_eq!(file_counter(1, 12), "[01/12]");
        assert_eq!(file_counter(12, 12), "[12/12]");
        assert_eq!(file_counter(1, 150), "[001/150]");
    }

    #[test]
    fn test_file_header_layout() {
        let header = file_header("src/main.rs", 2048, 1, 12);
        let lines: Vec<&str> = header.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].len(), HEADER_WIDTH);
        assert_eq!(lines[0], format!("{}[01/12]{}", "=".repeat(26), "=".repeat(27)));
        assert_eq!(lines[1], "File: src/main.rs");
        assert_eq!(lines[2], "Size: 2.00 KB");
        assert_eq!(lines[3], "-".repeat(HEADER_WIDTH));
    }

    #[test]
    fn test_file_header_omits_zero_size() {
        let header = file_header("empty.txt", 0, 3, 3);
        assert!(!header.contains("Size:"));
        assert_eq!(header.lines().count(), 3);
    }

    #[test]
    fn test_source_summary_line() {
        let summary = Summary { file_count: 2, total_size: 14, max_size: 10 };
        assert_eq!(source_summary_line(&summary), "Project Source [2 files, 14 B total, max 10 B]");
    }

    #[test]
    fn test_write_source_skips_binary_but_keeps_numbering() {
        let tmp = TempDir::new().expect("tmp");
        let root = TreeNode::dir(
            "root".to_string(),
            tmp.path().to_path_buf(),
            String::new(),
            vec![
                disk_file(tmp.path(), "a.txt", b"alpha"),
                disk_file(tmp.path(), "b.bin", &[0, 1, 2]),
                disk_file(tmp.path(), "c.txt", b"gamma"),
            ],
        );

        let mut out = Vec::new();
        write_source(&root, 3, &mut out, &CancellationToken::new()).expect("render");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("[1/3]"));
        assert!(!text.contains("[2/3]"));
        assert!(text.contains("[3/3]"));
        assert!(!text.contains("b.bin"));
        assert!(text.contains("File: c.txt\nSize: 5 B\n"));
        assert!(text.ends_with("gamma\n"));
    }

    #[test]
    fn test_write_source_skips_unreadable_file() {
        let tmp = TempDir::new().expect("tmp");
        let missing = TreeNode::file(
            "gone.txt".to_string(),
            tmp.path().join("gone.txt"),
            "gone.txt".to_string(),
            4,
            false,
        );
        let root = TreeNode::dir(
            "root".to_string(),
            tmp.path().to_path_buf(),
            String::new(),
            vec![missing, disk_file(tmp.path(), "ok.txt", b"ok")],
        );

        let mut out = Vec::new();
        write_source(&root, 2, &mut out, &CancellationToken::new()).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(!text.contains("gone.txt"));
        assert!(text.contains("[2/2]"));
    }

    #[test]
    fn test_write_source_raw() {
        let tmp = TempDir::new().expect("tmp");
        let root = TreeNode::dir(
            "root".to_string(),
            tmp.path().to_path_buf(),
            String::new(),
            vec![
                disk_file(tmp.path(), "a.txt", b"one"),
                disk_file(tmp.path(), "b.bin", &[0xff, 0x00]),
                disk_file(tmp.path(), "c.txt", b"two\n"),
            ],
        );

        let mut out = Vec::new();
        write_source_raw(&root, &mut out, &CancellationToken::new()).expect("render");
        assert_eq!(String::from_utf8(out).expect("utf8"), "one\ntwo\n\n");
    }

    #[test]
    fn test_write_source_cancelled() {
        let tmp = TempDir::new().expect("tmp");
        let root = disk_file(tmp.path(), "a.txt", b"a");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut out = Vec::new();
        assert!(matches!(write_source(&root, 1, &mut out, &cancel), Err(FilterError::Cancelled)));
        assert!(out.is_empty());
    }
}
