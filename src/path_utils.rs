//! Path utilities for safe and robust file path handling.
//!
//! Provides filename sanitization for group keys, hidden-entry detection, and
//! lossy conversions used when paths end up in events or log lines.

use std::path::Path;

/// Gets the file name from a path with fallback to lossy conversion.
///
/// # Arguments
///
/// * `path` - The path to extract the file name from
///
/// # Returns
///
/// * `String` - The file name, using lossy conversion if necessary
pub fn get_file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Converts a path to a string with fallback to lossy conversion.
///
/// # Arguments
///
/// * `path` - The path to convert
///
/// # Returns
///
/// * `String` - The path as a string, using lossy conversion if necessary
pub fn path_to_string_lossy(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Checks if a directory entry is hidden (name starts with a dot).
///
/// # Arguments
///
/// * `path` - The path to check
///
/// # Returns
///
/// * `bool` - True if the entry is hidden
pub fn is_hidden_entry(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Sanitizes a name for use as a filename by replacing characters that are
/// invalid on common filesystems with underscores.
///
/// # Arguments
///
/// * `name` - The name to sanitize
///
/// # Returns
///
/// * `String` - The sanitized name
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
