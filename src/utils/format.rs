//! Human-readable sizes

const KB: u64 = 1024;
const MB: u64 = KB * 1024;

/// Format a byte count as `N B`, `X.XX KB` or `X.XX MB`.
pub fn format_size(bytes: u64) -> String {
    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Size of `bytes` in megabytes (MiB).
pub fn size_in_mb(bytes: u64) -> f64 {
    bytes as f64 / MB as f64
}
