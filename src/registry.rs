//! Note registry
//!
//! Builds the universe of notes for a run: enumerates markdown files under
//! the input directory, reads and normalizes each one, extracts its tags and
//! wiki-link targets, and indexes it by identity (the filename stem).
//!
//! Unreadable or undecodable files are recorded in the run context and
//! skipped. When two files share an identity the first one enumerated wins
//! and the later one is dropped.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::constants as C;
use crate::context::{IssueKind, RunContext};
use crate::error::{Error, Result};
use crate::markdown;
use crate::util;

/// One markdown file
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Filename without extension, the key wiki links resolve to
    pub identity: String,
    /// File name including extension, kept for export and copies
    pub file_name: String,
    /// Source path on disk
    pub path: PathBuf,
    /// Content with Unicode line separators normalized to `\n`
    pub raw_text: String,
    /// Size of the file as read
    pub size_bytes: u64,
    /// Tags found in prose, without `#`
    pub tags: BTreeSet<String>,
    /// Wiki-link targets in written order
    pub outgoing_targets: Vec<String>,
}

impl Note {
    /// Build a note from already-read content
    pub fn from_content(path: impl Into<PathBuf>, content: &str, size_bytes: u64) -> Self {
        let path = path.into();
        let identity = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| identity.clone());

        let raw_text = markdown::normalize_line_terminators(content);
        let tags = markdown::extract_tags(&raw_text);
        let outgoing_targets = markdown::extract_wiki_links(&raw_text);

        Self {
            identity,
            file_name,
            path,
            raw_text,
            size_bytes,
            tags,
            outgoing_targets,
        }
    }
}

/// How the input directory is enumerated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Descend into subdirectories (hidden ones are always skipped)
    pub recursive: bool,
    /// Note file extension, without the dot
    pub extension: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            extension: C::MARKDOWN_EXTENSION.to_string(),
        }
    }
}

/// Notes of one run, in enumeration order, indexed by identity
#[derive(Debug, Default)]
pub struct NoteRegistry {
    notes: Vec<Note>,
    index: HashMap<String, usize>,
}

impl NoteRegistry {
    /// Scan `root` for notes
    ///
    /// Entries are visited sorted by file name so repeated runs see the same
    /// order. Fails only when `root` itself cannot be listed.
    pub fn scan(root: &Path, options: &ScanOptions, ctx: &mut RunContext) -> Result<Self> {
        fs::read_dir(root).map_err(|e| Error::io(root, e))?;

        let max_depth = if options.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        let mut registry = Self::default();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    ctx.record(IssueKind::Read, path, format!("could not list entry: {}", e));
                    continue;
                }
            };

            if !entry.file_type().is_file() || !util::has_extension(entry.path(), &options.extension) {
                continue;
            }

            if let Some(note) = read_note(entry.path(), ctx) {
                registry.insert(note, ctx);
            }
        }

        Ok(registry)
    }

    /// Build a registry from notes already in memory
    pub fn from_notes(notes: impl IntoIterator<Item = Note>, ctx: &mut RunContext) -> Self {
        let mut registry = Self::default();
        for note in notes {
            registry.insert(note, ctx);
        }
        registry
    }

    /// Add a note unless its identity is taken (first-seen wins)
    fn insert(&mut self, note: Note, ctx: &mut RunContext) {
        if let Some(&existing) = self.index.get(&note.identity) {
            let kept = util::display_path(&self.notes[existing].path);
            let message = format!("duplicate identity '{}', keeping {}", note.identity, kept);
            ctx.record(IssueKind::Collision, note.path, message);
            return;
        }

        debug!(
            "registered {}: {} tag(s), {} link(s), {} bytes",
            note.file_name,
            note.tags.len(),
            note.outgoing_targets.len(),
            note.size_bytes
        );
        self.index.insert(note.identity.clone(), self.notes.len());
        self.notes.push(note);
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Position of the note with this identity (case-sensitive)
    pub fn position(&self, identity: &str) -> Option<usize> {
        self.index.get(identity).copied()
    }

    pub fn get(&self, identity: &str) -> Option<&Note> {
        self.position(identity).map(|i| &self.notes[i])
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(util::is_hidden_name)
        .unwrap_or(false)
}

/// Read one note, recording a problem and returning None on failure
fn read_note(path: &Path, ctx: &mut RunContext) -> Option<Note> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            ctx.record(IssueKind::Read, path, format!("could not read file: {}", e));
            return None;
        }
    };
    let size_bytes = bytes.len() as u64;

    match String::from_utf8(bytes) {
        Ok(content) => Some(Note::from_content(path, &content, size_bytes)),
        Err(e) => {
            ctx.record(IssueKind::Decode, path, format!("not valid UTF-8: {}", e));
            None
        }
    }
}
