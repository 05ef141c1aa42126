//! Utility functions

use std::path::PathBuf;

// ============================================================================
// Time & Path Utilities
// ============================================================================

/// Format seconds as `m:ss`
///
/// Non-finite or negative input (unknown duration) formats as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Get the base cache directory for glass-player
pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glass-player")
}
