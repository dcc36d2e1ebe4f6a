//! Binary vs text detection.
//!
//! A file counts as text when its whole content is valid UTF-8 without NUL
//! bytes. Empty content is text.

use std::fs;
use std::io;
use std::path::Path;

/// Detect if content is binary (not text).
///
/// Uses two heuristics:
/// 1. Null byte check (strong binary indicator)
/// 2. Strict UTF-8 validation of the full content
pub fn is_binary(data: &[u8]) -> bool {
    if data.is_empty() {
        return false;
    }

    if data.contains(&0) {
        return true;
    }

    std::str::from_utf8(data).is_err()
}

/// Read a whole file and classify it.
pub fn is_binary_file(path: &Path) -> io::Result<bool> {
    let data = fs::read(path)?;
    Ok(is_binary(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_is_text() {
        assert!(!is_binary(b""));
    }

    #[test]
    fn test_null_byte_is_binary() {
        assert!(is_binary(&[b'a', 0x00, b'b']));
    }

    #[test]
    fn test_invalid_utf8_is_binary() {
        assert!(is_binary(&[0xff, 0xfe, 0x41]));
    }

    #[test]
    fn test_utf8_text_is_not_binary() {
        assert!(!is_binary("Test content 🚀\n".as_bytes()));
    }

    #[test]
    fn test_is_binary_file() {
        let mut file = NamedTempFile::new().expect("tmp");
        file.write_all(&[0x00, 0x01, 0x02]).expect("write");
        file.flush().expect("flush");
        assert!(is_binary_file(file.path()).expect("read"));
    }
}
