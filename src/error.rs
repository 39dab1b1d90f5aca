//! Error types for emx-rank
//!
//! Only fatal conditions are represented here. Problems with a single note
//! (unreadable file, failed copy) are recorded as [`crate::FileIssue`]s in the
//! run context and never abort a run.

use std::path::PathBuf;

/// Fatal errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or contradictory settings, detected before any note is read
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure on a path the whole run depends on
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML config file
    #[error("invalid config file {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("json output failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    /// Whether this error was caused by bad user input rather than the environment
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Yaml { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
