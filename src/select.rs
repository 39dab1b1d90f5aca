//! Ranking and constrained selection
//!
//! Admissible notes are ranked by total link count, highest first; equal
//! totals keep their enumeration order (the sort is stable). Each active
//! constraint then proposes a cut point into the ranked list on its own, and
//! the selection is the prefix up to the smallest of them.
//!
//! Everything here is pure: no I/O, no logging.

use crate::error::{Error, Result};
use crate::graph::LinkStats;
use crate::registry::Note;
use crate::filter::Tagged;

/// Limits on how many of the ranked notes are selected
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectionConstraints {
    /// Keep at most this many notes
    pub top_n: Option<usize>,
    /// Keep at most this percentage of the admissible notes, in (0, 100]
    pub top_percent: Option<f64>,
    /// Keep notes while their cumulative size stays within this many bytes
    pub max_bytes: Option<u64>,
}

impl SelectionConstraints {
    /// No constraint set: everything admissible is selected
    pub fn is_empty(&self) -> bool {
        self.top_n.is_none() && self.top_percent.is_none() && self.max_bytes.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == Some(0) {
            return Err(Error::config("--copy-top must be a positive integer"));
        }
        if let Some(percent) = self.top_percent {
            if !percent.is_finite() || percent <= 0.0 || percent > 100.0 {
                return Err(Error::config(format!(
                    "--copy-top-percent must be in (0, 100], got {}",
                    percent
                )));
            }
        }
        if self.max_bytes == Some(0) {
            return Err(Error::config("--copy-until-size must be a positive size"));
        }
        Ok(())
    }
}

/// What the selector needs to know about an item
pub trait Rankable {
    fn total_links(&self) -> usize;
    fn size_bytes(&self) -> u64;
}

/// A note together with its link statistics
#[derive(Debug, Clone, Copy)]
pub struct RankedNote<'a> {
    pub note: &'a Note,
    pub stats: LinkStats,
}

impl Rankable for RankedNote<'_> {
    fn total_links(&self) -> usize {
        self.stats.total()
    }

    fn size_bytes(&self) -> u64 {
        self.note.size_bytes
    }
}

impl Tagged for RankedNote<'_> {
    fn tags(&self) -> &std::collections::BTreeSet<String> {
        &self.note.tags
    }
}

/// Sort by total links descending, ties in input order
pub fn rank<T: Rankable>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by(|a, b| b.total_links().cmp(&a.total_links()));
    items
}

/// Cut point for `top_n`
pub fn count_cut(len: usize, top_n: usize) -> usize {
    top_n.min(len)
}

/// Cut point for `top_percent`: rounded down, at least one when non-empty
pub fn percent_cut(len: usize, percent: f64) -> usize {
    if len == 0 {
        return 0;
    }
    let count = (len as f64 * percent / 100.0).floor() as usize;
    count.clamp(1, len)
}

/// Cut point for `max_bytes`: the longest prefix whose sizes fit the budget
///
/// The first item that would overflow ends the prefix, even if later,
/// smaller items would still fit.
pub fn budget_cut<T: Rankable>(ranked: &[T], max_bytes: u64) -> usize {
    let mut used: u64 = 0;
    for (i, item) in ranked.iter().enumerate() {
        match used.checked_add(item.size_bytes()) {
            Some(next) if next <= max_bytes => used = next,
            _ => return i,
        }
    }
    ranked.len()
}

/// Number of ranked items selected: the smallest active cut point
pub fn selection_len<T: Rankable>(ranked: &[T], constraints: &SelectionConstraints) -> usize {
    let cuts = [
        constraints.top_n.map(|n| count_cut(ranked.len(), n)),
        constraints.top_percent.map(|p| percent_cut(ranked.len(), p)),
        constraints.max_bytes.map(|b| budget_cut(ranked, b)),
    ];
    cuts.into_iter().flatten().min().unwrap_or(ranked.len())
}

/// Ranked items and how many of them were selected
#[derive(Debug, Clone)]
pub struct Selection<T> {
    ranked: Vec<T>,
    selected: usize,
}

impl<T> Selection<T> {
    /// Every admissible item in rank order
    pub fn ranked(&self) -> &[T] {
        &self.ranked
    }

    /// The selected prefix
    pub fn selected(&self) -> &[T] {
        &self.ranked[..self.selected]
    }
}

/// Rank `items` and apply the constraints
pub fn select<T: Rankable>(items: Vec<T>, constraints: &SelectionConstraints) -> Selection<T> {
    let ranked = rank(items);
    let selected = selection_len(&ranked, constraints);
    Selection { ranked, selected }
}
