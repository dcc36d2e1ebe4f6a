//! Built-in ignore tables.
//!
//! `CORE_IGNORES` applies to both modes; `CORE_SOURCE_IGNORES` only keeps
//! dependency trees, lock files and build output out of source dumps. Both
//! can be switched off with `--no-core-ignores`.

use once_cell::sync::Lazy;
use std::io::{self, Write};

use super::pattern::Pattern;

pub const CORE_IGNORES: &[&str] = &["Thumbs.db", "__pycache__"];

pub const CORE_SOURCE_IGNORES: &[&str] = &[
    "go.sum",
    "vendor",
    "node_modules",
    "package-lock.json",
    "yarn.lock",
    "npm-debug.log",
    "__pycache__",
    "*.pyc",
    "*.pyo",
    "*.pyd",
    "*.egg-info",
    "build",
    "dist",
    "*.class",
    "target",
    "*.jar",
    "*.war",
    "*.ear",
    "Gemfile.lock",
    ".bundle",
    "*.o",
    "*.obj",
    "*.exe",
    "*.so",
    "*.dSYM",
    "CMakeCache.txt",
    "CMakeFiles",
    "bin",
    "obj",
];

pub(crate) static CORE_PATTERNS: Lazy<Vec<Pattern>> =
    Lazy::new(|| CORE_IGNORES.iter().map(|p| Pattern::new(p)).collect());

pub(crate) static CORE_SOURCE_PATTERNS: Lazy<Vec<Pattern>> =
    Lazy::new(|| CORE_SOURCE_IGNORES.iter().map(|p| Pattern::new(p)).collect());

/// Write both core tables in a human-readable listing.
pub fn write_core_ignores<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Core Ignores (Both Tree and Source Modes):")?;
    for pattern in CORE_IGNORES {
        writeln!(out, "  {}", pattern)?;
    }
    writeln!(out, "\nCore Ignores (Only for Source Mode):")?;
    for pattern in CORE_SOURCE_IGNORES {
        writeln!(out, "  {}", pattern)?;
    }
    Ok(())
}
