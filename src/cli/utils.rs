//! Shared CLI utilities.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Where the dump is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// `stdout`, `std` and `-` select standard output; anything else is a file path.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "stdout" | "std" | "-" => OutputTarget::Stdout,
            path => OutputTarget::File(PathBuf::from(path)),
        }
    }

    /// File name that must never be selected into its own dump.
    pub fn excluded_name(&self) -> Option<String> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => {
                path.file_name().map(|name| name.to_string_lossy().to_string())
            }
        }
    }

    /// Create (or truncate) the destination.
    pub fn open(&self) -> Result<Box<dyn Write>> {
        Ok(match self {
            OutputTarget::Stdout => Box::new(BufWriter::new(io::stdout())),
            OutputTarget::File(path) => {
                let file = File::create(path).with_context(|| {
                    format!("Failed to create output file: {}", path.display())
                })?;
                Box::new(BufWriter::new(file))
            }
        })
    }
}
