//! Output rendering (tree listing, annotated and raw source dumps)

pub mod source;
pub mod tree;

pub use source::{file_header, source_summary_line, write_source, write_source_raw};
pub use tree::{tree_summary_line, write_tree};
