//! Box-drawing tree listing.

use std::io::{self, Write};

use crate::domain::{Summary, TreeNode};
use crate::utils::format_size;

/// Suffix marking binary files in the listing.
pub const BINARY_MARKER: &str = " *";

pub fn tree_summary_line(summary: &Summary) -> String {
    format!(
        "Project Tree [{} files, {} total, max {}] (* - for binary files)",
        summary.file_count,
        format_size(summary.total_size),
        format_size(summary.max_size)
    )
}

/// Write the root name followed by its descendants.
pub fn write_tree<W: Write + ?Sized>(root: &TreeNode, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", root.name)?;
    write_children(root, "", out)
}

fn write_children<W: Write + ?Sized>(node: &TreeNode, prefix: &str, out: &mut W) -> io::Result<()> {
    let children = node.children();
    for (idx, child) in children.iter().enumerate() {
        let is_last = idx == children.len() - 1;
        let connector = if is_last { "└── " } else { "├── " };
        let marker = if child.is_binary() { BINARY_MARKER } else { "" };
        writeln!(out, "{}{}{}{}", prefix, connector, child.name, marker)?;

        if child.is_dir() {
            let extension = if is_last { "    " } else { "│   " };
            write_children(child, &format!("{}{}", prefix, extension), out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(rel: &str, size: u64, is_binary: bool) -> TreeNode {
        let name = rel.rsplit('/').next().expect("name").to_string();
        TreeNode::file(name, PathBuf::from(rel), rel.to_string(), size, is_binary)
    }

    fn dir(rel: &str, children: Vec<TreeNode>) -> TreeNode {
        let name = rel.rsplit('/').next().expect("name").to_string();
        TreeNode::dir(name, PathBuf::from(rel), rel.to_string(), children)
    }

    #[test]
    fn test_write_tree_connectors_and_markers() {
        let tree = TreeNode::dir(
            "project".to_string(),
            PathBuf::from("project"),
            String::new(),
            vec![
                dir("cmd", vec![dir("cmd/app", vec![file("cmd/app/main.go", 10, false)])]),
                dir(
                    "internal",
                    vec![file("internal/a.go", 5, false), file("internal/logo.png", 9, true)],
                ),
                file("go.mod", 3, false),
            ],
        );

        let mut out = Vec::new();
        write_tree(&tree, &mut out).expect("render");

        let expected = "\
project
├── cmd
│   └── app
│       └── main.go
├── internal
│   ├── a.go
│   └── logo.png *
└── go.mod
";
        similar_asserts::assert_eq!(String::from_utf8(out).expect("utf8"), expected);
    }

    #[test]
    fn test_single_file_root_prints_only_its_name() {
        let mut out = Vec::new();
        write_tree(&file("main.go", 12, true), &mut out).expect("render");
        assert_eq!(String::from_utf8(out).expect("utf8"), "main.go\n");
    }

    #[test]
    fn test_tree_summary_line() {
        let summary = Summary { file_count: 3, total_size: 2048, max_size: 1000 };
        assert_eq!(
            tree_summary_line(&summary),
            "Project Tree [3 files, 2.00 KB total, max 1000 B] (* - for binary files)"
        );
    }
}
