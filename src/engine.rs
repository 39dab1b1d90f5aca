//! RankEngine - one complete analysis run
//!
//! Wires the stages together in order:
//! scan → link graph → tag filter → rank/select → CSV, copy, combine.
//! Every stage runs sequentially in a single pass; the only fatal errors are
//! an unreadable input directory and a failed JSON write. Per-file problems
//! end up in the returned summary.

use chrono::Local;
use tracing::info;

use crate::config::Settings;
use crate::context::RunContext;
use crate::error::Result;
use crate::filter;
use crate::graph::LinkGraph;
use crate::registry::NoteRegistry;
use crate::report::{self, RunSummary, SelectedNote};
use crate::select::{self, RankedNote};
use crate::util;

/// Core engine for a ranking run
pub struct RankEngine<'a> {
    settings: &'a Settings,
}

impl<'a> RankEngine<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Execute the whole pipeline
    pub fn run(&self) -> Result<RunSummary> {
        let settings = self.settings;
        let mut ctx = RunContext::new(settings.dry_run);

        info!("Starting analysis...");
        info!("Input directory: {}", util::display_path(&settings.input_dir));
        match &settings.output_csv {
            Some(path) => info!("Output CSV: {}", util::display_path(path)),
            None => info!("--no-csv used, no CSV output will be generated."),
        }
        if settings.dry_run {
            info!("Dry-run mode: no changes will be made.");
        }

        // === Scan ===
        let registry = NoteRegistry::scan(&settings.input_dir, &settings.scan, &mut ctx)?;
        info!("Found {} markdown files.", registry.len());

        // === Link graph over every note ===
        let graph = LinkGraph::build(&registry, &settings.scan.extension);
        info!(
            "Counted {} links, {} dangling.",
            graph.total_outgoing(),
            graph.dangling_count()
        );

        // === Tag filter ===
        let ranked_notes = registry
            .notes()
            .iter()
            .enumerate()
            .map(|(i, note)| RankedNote { note, stats: graph.stats(i) });
        let admissible = filter::admissible(ranked_notes, &settings.filter);
        info!("After tag filtering, {} notes remain.", admissible.len());
        let admissible_count = admissible.len();

        // === Rank and select ===
        let selection = select::select(admissible, &settings.constraints);
        let selected = selection.selected();
        if selected.is_empty() {
            info!("No notes selected based on constraints.");
        } else {
            info!("Selected {} notes.", selected.len());
        }

        // === Report ===
        let mut csv_written = None;
        if let Some(path) = &settings.output_csv {
            if report::export_csv(path, selection.ranked(), settings.csv_delimiter, &mut ctx) {
                csv_written = Some(path.clone());
            }
        }

        if settings.dry_run && !selected.is_empty() {
            info!("The following notes would be selected:");
            for ranked in selected {
                info!(" - {} ({} bytes)", ranked.note.file_name, ranked.note.size_bytes);
            }
        }

        let copied = match &settings.copy_dest {
            Some(dest) if !selected.is_empty() => report::copy_notes(selected, dest, &mut ctx),
            _ => 0,
        };

        let mut combined_written = None;
        if let Some(path) = &settings.combine_path {
            if report::write_combined(path, selected, &mut ctx) {
                combined_written = Some(path.clone());
            }
        }

        info!("Processing complete.");

        Ok(RunSummary {
            generated_at: Local::now(),
            input_dir: util::display_path(&settings.input_dir),
            dry_run: settings.dry_run,
            scanned: registry.len(),
            admissible: admissible_count,
            dangling_links: graph.dangling_count(),
            selected: selected.iter().map(SelectedNote::from).collect(),
            copied,
            csv_written,
            combined_written,
            issues: ctx.into_issues(),
        })
    }
}

/// Run the pipeline for `settings`
pub fn run(settings: &Settings) -> Result<RunSummary> {
    RankEngine::new(settings).run()
}
