//! Reporting and export
//!
//! Turns a selection into output: the CSV table, copies of the selected
//! source files, and the combined markdown document. Every write goes through
//! [`RunContext::perform`], so a dry run narrates the same steps without
//! touching the filesystem. Failures are recorded per file and never abort
//! the remaining work.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info};

use crate::constants as C;
use crate::context::{FileIssue, IssueKind, RunContext};
use crate::select::RankedNote;
use crate::util;

/// Quote a CSV field when it contains the delimiter, a quote or a line break
fn csv_field(value: &str, delimiter: char) -> String {
    if value.contains(delimiter) || value.contains(['"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render the CSV table: one header row, then one row per note in the given order
pub fn render_csv(rows: &[RankedNote<'_>], delimiter: char) -> String {
    let separator = delimiter.to_string();
    let mut out = C::CSV_HEADER.join(&separator);
    out.push('\n');

    for row in rows {
        let fields = [
            csv_field(&row.note.file_name, delimiter),
            row.stats.outgoing.to_string(),
            row.stats.incoming.to_string(),
            row.stats.total().to_string(),
            row.note.size_bytes.to_string(),
        ];
        out.push_str(&fields.join(&separator));
        out.push('\n');
    }

    out
}

/// Write the CSV table to `path`; returns whether the file was written
pub fn export_csv(path: &Path, rows: &[RankedNote<'_>], delimiter: char, ctx: &mut RunContext) -> bool {
    info!("Writing CSV output to {}", util::display_path(path));
    let content = render_csv(rows, delimiter);

    match ctx.perform("writing CSV", || fs::write(path, &content)) {
        Ok(written) => {
            if written {
                info!("CSV written successfully ({} rows).", rows.len());
            }
            written
        }
        Err(e) => {
            ctx.record(IssueKind::Write, path, format!("could not write CSV: {}", e));
            false
        }
    }
}

/// Copy each selected note into `dest`, keeping its file name
///
/// Returns the number of files copied.
pub fn copy_notes(notes: &[RankedNote<'_>], dest: &Path, ctx: &mut RunContext) -> usize {
    info!("Copying {} notes to {}", notes.len(), util::display_path(dest));

    if let Err(e) = ctx.perform("creating destination directory", || fs::create_dir_all(dest)) {
        ctx.record(IssueKind::Write, dest, format!("could not create directory: {}", e));
        return 0;
    }

    let mut copied = 0;
    for (i, ranked) in notes.iter().enumerate() {
        let note = ranked.note;
        let target = dest.join(&note.file_name);
        let description = format!("copying {}", note.file_name);

        match ctx.perform(&description, || fs::copy(&note.path, &target).map(|_| ())) {
            Ok(true) => {
                copied += 1;
                debug!("Copied {}/{}: {}", i + 1, notes.len(), note.file_name);
            }
            Ok(false) => {}
            Err(e) => ctx.record(
                IssueKind::Copy,
                &note.path,
                format!("could not copy to {}: {}", util::display_path(&target), e),
            ),
        }
    }

    copied
}

/// Concatenate note texts in order, separated by one blank line
pub fn render_combined(notes: &[RankedNote<'_>]) -> String {
    notes
        .iter()
        .map(|n| n.note.raw_text.as_str())
        .collect::<Vec<_>>()
        .join(C::COMBINE_SEPARATOR)
}

/// Write the combined document; returns whether the file was written
pub fn write_combined(path: &Path, notes: &[RankedNote<'_>], ctx: &mut RunContext) -> bool {
    if notes.is_empty() {
        info!("No notes to combine.");
        return false;
    }

    info!("Combining {} selected notes into {}", notes.len(), util::display_path(path));
    let content = render_combined(notes);

    match ctx.perform("writing combined note", || fs::write(path, &content)) {
        Ok(written) => {
            if written {
                info!("Combination done.");
            }
            written
        }
        Err(e) => {
            ctx.record(IssueKind::Write, path, format!("could not write combined note: {}", e));
            false
        }
    }
}

/// One selected note in the JSON summary
#[derive(Debug, Clone, Serialize)]
pub struct SelectedNote {
    pub identity: String,
    pub filename: String,
    pub outgoing: usize,
    pub incoming: usize,
    pub total: usize,
    pub size_bytes: u64,
}

impl From<&RankedNote<'_>> for SelectedNote {
    fn from(ranked: &RankedNote<'_>) -> Self {
        Self {
            identity: ranked.note.identity.clone(),
            filename: ranked.note.file_name.clone(),
            outgoing: ranked.stats.outgoing,
            incoming: ranked.stats.incoming,
            total: ranked.stats.total(),
            size_bytes: ranked.note.size_bytes,
        }
    }
}

/// Outcome of a run, printed with `--json`
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Local>,
    pub input_dir: String,
    pub dry_run: bool,
    pub scanned: usize,
    pub admissible: usize,
    pub dangling_links: usize,
    pub selected: Vec<SelectedNote>,
    pub copied: usize,
    pub csv_written: Option<PathBuf>,
    pub combined_written: Option<PathBuf>,
    pub issues: Vec<FileIssue>,
}
