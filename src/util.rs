//! Utility functions for path handling and unit conversion

use std::path::Path;

use crate::constants as C;

/// Display a path with forward slashes (cross-platform standard)
/// Converts Windows backslashes to forward slashes for consistent output
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Hidden entries start with a dot
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

/// Whether `path` has the given extension (case-sensitive, without the dot)
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().map(|e| e == extension).unwrap_or(false)
}

/// Convert a megabyte budget to bytes, rounding down
///
/// Returns `None` for values that are not finite or not positive.
pub fn megabytes_to_bytes(megabytes: f64) -> Option<u64> {
    if !megabytes.is_finite() || megabytes <= 0.0 {
        return None;
    }
    Some((megabytes * C::BYTES_PER_MB).floor() as u64)
}

/// Whether two paths point at the same existing location
///
/// Uses dunce::canonicalize to avoid UNC prefixes on Windows. Paths that do
/// not exist yet are never the same location as an existing one.
pub fn same_location(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
