//! aictx: dump a repository as an LLM-friendly context file
//!
//! The crate selects which files of a directory tree (local, or a freshly
//! cloned remote repository) are worth showing, then renders the result as an
//! annotated directory tree and/or the concatenated file contents.

pub mod cancel;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod pack;
pub mod render;
pub mod select;
pub mod utils;

pub use cancel::CancellationToken;
pub use domain::{Config, NodeKind, Summary, TreeMode, TreeNode};
pub use error::FilterError;
pub use pack::{write_pack, PackReport};
pub use select::{Pattern, Policy, TreeBuilder};
