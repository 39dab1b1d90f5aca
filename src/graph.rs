//! Link graph
//!
//! Counts, for every registered note, the wiki links it writes (outgoing)
//! and the links other notes point at it (incoming).
//!
//! Link targets resolve to identities by exact, case-sensitive comparison
//! with filename stems. A target that names a note verbatim (`C# basics`)
//! resolves as written; otherwise it is compared after dropping a `#heading`
//! suffix, any folder prefix and a trailing note extension. Targets naming no
//! registered note are dangling: they count as outgoing for their source and
//! as incoming for nobody.

use serde::Serialize;
use tracing::debug;

use crate::registry::NoteRegistry;

/// Connectivity counts of one note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    /// Links written in the note, duplicates and self-links included
    pub outgoing: usize,
    /// Links from any note (itself included) resolving to this note
    pub incoming: usize,
}

impl LinkStats {
    pub fn total(&self) -> usize {
        self.outgoing + self.incoming
    }
}

/// Map a raw wiki-link target to the identity it refers to
///
/// With `extension` set to `md`, `folder/Note.md#Heading` and `Note#^block`
/// both resolve to `Note`.
pub fn link_identity<'a>(target: &'a str, extension: &str) -> &'a str {
    let without_anchor = target.split_once('#').map_or(target, |(name, _)| name);
    let name = without_anchor
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(without_anchor);
    let name = name
        .strip_suffix(extension)
        .and_then(|n| n.strip_suffix('.'))
        .unwrap_or(name);
    name.trim()
}

/// Registry position of the note a raw target points at
fn resolve(registry: &NoteRegistry, target: &str, extension: &str) -> Option<usize> {
    registry
        .position(target)
        .or_else(|| registry.position(link_identity(target, extension)))
}

/// Link statistics for every note of a registry, in registry order
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    stats: Vec<LinkStats>,
    dangling: usize,
}

impl LinkGraph {
    /// Two passes: outgoing counts from each note's own targets, then
    /// incoming counts by resolving every edge
    ///
    /// `extension` is the note file extension, without the dot.
    pub fn build(registry: &NoteRegistry, extension: &str) -> Self {
        let notes = registry.notes();
        let mut stats: Vec<LinkStats> = notes
            .iter()
            .map(|note| LinkStats {
                outgoing: note.outgoing_targets.len(),
                incoming: 0,
            })
            .collect();

        let mut dangling = 0;
        for (i, note) in notes.iter().enumerate() {
            for target in &note.outgoing_targets {
                match resolve(registry, target, extension) {
                    Some(resolved) => stats[resolved].incoming += 1,
                    None => dangling += 1,
                }
            }
            debug!(
                "processed {}/{}: {} | outgoing links: {}",
                i + 1,
                notes.len(),
                note.file_name,
                stats[i].outgoing
            );
        }

        Self { stats, dangling }
    }

    /// Stats of the note at `index` in the registry
    pub fn stats(&self, index: usize) -> LinkStats {
        self.stats.get(index).copied().unwrap_or_default()
    }

    pub fn all(&self) -> &[LinkStats] {
        &self.stats
    }

    /// Number of edges whose target matched no note
    pub fn dangling_count(&self) -> usize {
        self.dangling
    }

    pub fn total_outgoing(&self) -> usize {
        self.stats.iter().map(|s| s.outgoing).sum()
    }

    pub fn total_incoming(&self) -> usize {
        self.stats.iter().map(|s| s.incoming).sum()
    }
}
