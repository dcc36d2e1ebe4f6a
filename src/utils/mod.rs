//! Shared helpers

pub mod encoding;
pub mod format;
pub mod paths;

pub use encoding::is_binary;
pub use format::{format_size, size_in_mb};
pub use paths::{base_name, display_name, join_relative, normalize_path};
