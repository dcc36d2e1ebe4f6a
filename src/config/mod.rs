//! Configuration loading and merging
//!
//! Settings come from a config file in the traversal root (or `--config`) and
//! are overridden by CLI flags (CLI > File > Defaults).

pub mod loader;
pub mod merge;

pub use loader::load_config;
pub use merge::{merge_cli_with_config, CliOverrides};
