//! Constants for emx-rank
//!
//! Format strings, file names and limits used across the codebase, kept in
//! one place to avoid duplication.

// === File and Directory Names ===

/// Default file extension for notes (without the dot)
pub const MARKDOWN_EXTENSION: &str = "md";

/// Directory under the platform config dir holding the config file
pub const CONFIG_DIR_NAME: &str = "emx-rank";

/// Config file name
pub const CONFIG_FILENAME: &str = "config.yaml";

// === Environment Variables ===

/// Explicit config file path
pub const ENV_CONFIG: &str = "EMX_RANK_CONFIG";

// === CSV Export ===

/// Default CSV field delimiter
pub const CSV_DELIMITER: char = ';';

/// CSV header, in column order
pub const CSV_HEADER: [&str; 5] = [
    "filename",
    "outgoing_links",
    "incoming_links",
    "total_links",
    "file_size",
];

// === Combined Note ===

/// Separator between notes in a combined document (one blank line)
pub const COMBINE_SEPARATOR: &str = "\n\n";

// === Units ===

/// Bytes per megabyte for `--copy-until-size`
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// === Logging ===

/// Log filter without `--verbose`
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Log filter with `--verbose`
pub const VERBOSE_LOG_FILTER: &str = "debug";
