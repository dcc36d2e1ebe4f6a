//! Ignore-file loading (`.aictxignore`, `.gitignore`).
//!
//! One pattern per line. Blank lines and lines starting with `#` (after
//! trimming) are skipped; everything else is trimmed and kept in file order.

use std::fs;
use std::io;
use std::path::Path;

/// Tool-specific ignore file, always loaded.
pub const AICTX_IGNORE_FILE: &str = ".aictxignore";

/// Version-control ignore file, loaded unless disabled.
pub const GIT_IGNORE_FILE: &str = ".gitignore";

pub fn parse_ignore_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Load patterns from `root/file_name`. A missing file yields no patterns.
pub fn load_ignore_file(root: &Path, file_name: &str) -> io::Result<Vec<String>> {
    match fs::read_to_string(root.join(file_name)) {
        Ok(content) => Ok(parse_ignore_patterns(&content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Load the tool ignore file, then append the git ignore file when requested.
pub fn load_user_patterns(root: &Path, respect_gitignore: bool) -> io::Result<Vec<String>> {
    let mut patterns = load_ignore_file(root, AICTX_IGNORE_FILE)?;
    if respect_gitignore {
        patterns.extend(load_ignore_file(root, GIT_IGNORE_FILE)?);
    }
    Ok(patterns)
}
