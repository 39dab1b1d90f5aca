//! Per-run context
//!
//! Holds everything that lives for exactly one invocation: the dry-run
//! switch that gates filesystem writes, and the list of per-file problems
//! collected along the way.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::util;

/// What went wrong with a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// File or directory entry could not be read
    Read,
    /// File is not valid UTF-8
    Decode,
    /// Two notes share the same identity; the later one was dropped
    Collision,
    /// Copy into the destination directory failed
    Copy,
    /// Writing an output file (CSV, combined note) failed
    Write,
}

/// A recoverable problem tied to one path
#[derive(Debug, Clone, Serialize)]
pub struct FileIssue {
    pub kind: IssueKind,
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    pub message: String,
}

fn serialize_path<S: serde::Serializer>(path: &Path, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&util::display_path(path))
}

/// State scoped to a single run
#[derive(Debug, Default)]
pub struct RunContext {
    dry_run: bool,
    issues: Vec<FileIssue>,
}

impl RunContext {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            issues: Vec::new(),
        }
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Log a per-file problem and keep it for the run summary
    pub fn record(&mut self, kind: IssueKind, path: impl Into<PathBuf>, message: impl Into<String>) {
        let issue = FileIssue {
            kind,
            path: path.into(),
            message: message.into(),
        };
        match kind {
            IssueKind::Collision => {
                warn!("{}: {}", util::display_path(&issue.path), issue.message)
            }
            _ => error!("{}: {}", util::display_path(&issue.path), issue.message),
        }
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[FileIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<FileIssue> {
        self.issues
    }

    /// Run a filesystem-mutating effect unless this is a dry run
    ///
    /// Returns `Ok(true)` when the effect ran, `Ok(false)` when it was skipped.
    pub fn perform<F>(&self, description: &str, effect: F) -> io::Result<bool>
    where
        F: FnOnce() -> io::Result<()>,
    {
        if self.dry_run {
            info!("dry-run: skipped {}", description);
            return Ok(false);
        }
        effect()?;
        Ok(true)
    }
}
