//! Markdown scanning utilities
//!
//! Provides the lazy scanners used to read a note's prose: fenced code
//! regions are split off first, then tags and wiki links are pulled from
//! whatever text is left.
//!
//! Fence rule: a fence opens at a triple-backtick marker and closes at the
//! next triple-backtick marker, anywhere in the text, without nesting. An
//! opening marker that is never closed does not start a fence.

use std::collections::BTreeSet;

/// Marker that opens and closes a fenced code region
pub const FENCE_MARKER: &str = "```";

/// Replace Unicode line/paragraph separators with `\n`
pub fn normalize_line_terminators(content: &str) -> String {
    content.replace(['\u{2028}', '\u{2029}'], "\n")
}

/// A piece of note text, either prose or a fenced code region (markers included)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Prose(&'a str),
    Fence(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceState {
    Prose,
    InFence,
}

/// Finite-state scanner splitting text into prose and fenced code segments
///
/// Concatenating every yielded segment gives back the input.
#[derive(Debug, Clone)]
pub struct FenceScanner<'a> {
    text: &'a str,
    pos: usize,
    state: FenceState,
}

impl<'a> FenceScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            state: FenceState::Prose,
        }
    }

    /// Advance to the next prose segment, skipping fenced regions
    pub fn next_prose(&mut self) -> Option<&'a str> {
        loop {
            match self.next()? {
                Segment::Prose(text) => return Some(text),
                Segment::Fence(_) => continue,
            }
        }
    }
}

impl<'a> Iterator for FenceScanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        loop {
            if self.pos >= self.text.len() {
                return None;
            }
            let rest = &self.text[self.pos..];

            match self.state {
                FenceState::Prose => {
                    let open = rest.find(FENCE_MARKER).filter(|&open| {
                        rest[open + FENCE_MARKER.len()..].contains(FENCE_MARKER)
                    });
                    match open {
                        Some(0) => self.state = FenceState::InFence,
                        Some(open) => {
                            self.pos += open;
                            self.state = FenceState::InFence;
                            return Some(Segment::Prose(&rest[..open]));
                        }
                        None => {
                            self.pos = self.text.len();
                            return Some(Segment::Prose(rest));
                        }
                    }
                }
                FenceState::InFence => {
                    // pos sits on the opening marker
                    let body = &rest[FENCE_MARKER.len()..];
                    let end = match body.find(FENCE_MARKER) {
                        Some(close) => FENCE_MARKER.len() + close + FENCE_MARKER.len(),
                        None => rest.len(),
                    };
                    self.pos += end;
                    self.state = FenceState::Prose;
                    return Some(Segment::Fence(&rest[..end]));
                }
            }
        }
    }
}

const LINK_OPEN: &str = "[[";
const LINK_CLOSE: &str = "]]";

/// Position of the first `]` at or after `inner_start`, or `text.len()`
///
/// `cached` holds the previous answer. Openers sitting before the same `]`
/// share it, so a run of openers is not rescanned to a distant bracket.
fn find_close(text: &str, inner_start: usize, cached: &mut Option<usize>) -> usize {
    match *cached {
        Some(close) if close >= inner_start => close,
        _ => {
            let close = text[inner_start..]
                .find(']')
                .map_or(text.len(), |i| inner_start + i);
            *cached = Some(close);
            close
        }
    }
}

/// Characters allowed in a tag body
pub fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Lazy scanner over `#tag` tokens in prose, yielding the tag without `#`
///
/// A `#` only starts a tag when it begins a prose segment or follows a
/// character that is none of: a tag character, `#`, `/` or `[`. The body of
/// a closed `[[...]]` link is skipped whole. This keeps headings
/// (`## Title`), heading links (`[[Note#Part]]`, `[[#Intro]]`), URL
/// fragments (`https://host/#part`) and words like `C#` out of the result.
pub struct TagTokens<'a> {
    segments: FenceScanner<'a>,
    current: &'a str,
    pos: usize,
    close: Option<usize>,
}

impl<'a> TagTokens<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            segments: FenceScanner::new(content),
            current: "",
            pos: 0,
            close: None,
        }
    }

    fn scan_current(&mut self) -> Option<&'a str> {
        let text = self.current;
        while let Some(offset) = text[self.pos..].find(['#', '[']) {
            let at = self.pos + offset;

            if text[at..].starts_with(LINK_OPEN) {
                let inner_start = at + LINK_OPEN.len();
                let close = find_close(text, inner_start, &mut self.close);
                self.pos = if text[close..].starts_with(LINK_CLOSE) {
                    close + LINK_CLOSE.len()
                } else {
                    inner_start
                };
                continue;
            }
            if !text[at..].starts_with('#') {
                self.pos = at + 1;
                continue;
            }

            let start = at + 1;
            let len: usize = text[start..]
                .chars()
                .take_while(|&c| is_tag_char(c))
                .map(char::len_utf8)
                .sum();
            self.pos = start + len;

            let at_boundary = text[..at]
                .chars()
                .next_back()
                .map_or(true, |prev| !is_tag_char(prev) && !matches!(prev, '#' | '/' | '['));
            if len > 0 && at_boundary {
                return Some(&text[start..start + len]);
            }
        }
        self.pos = text.len();
        None
    }
}

impl<'a> Iterator for TagTokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            if let Some(tag) = self.scan_current() {
                return Some(tag);
            }
            self.current = self.segments.next_prose()?;
            self.pos = 0;
            self.close = None;
        }
    }
}

/// Lazy scanner over `[[target]]` / `[[target|alias]]` wiki links in prose
///
/// Yields the trimmed target in written order; the alias is discarded and
/// empty targets are skipped.
pub struct WikiLinks<'a> {
    segments: FenceScanner<'a>,
    current: &'a str,
    pos: usize,
    close: Option<usize>,
}

impl<'a> WikiLinks<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            segments: FenceScanner::new(content),
            current: "",
            pos: 0,
            close: None,
        }
    }

    fn scan_current(&mut self) -> Option<&'a str> {
        let text = self.current;
        while let Some(offset) = text[self.pos..].find(LINK_OPEN) {
            let inner_start = self.pos + offset + LINK_OPEN.len();
            let close = find_close(text, inner_start, &mut self.close);

            if text[close..].starts_with(LINK_CLOSE) {
                self.pos = close + LINK_CLOSE.len();
                let body = &text[inner_start..close];
                let target = body.split_once('|').map_or(body, |(target, _)| target).trim();
                if !target.is_empty() {
                    return Some(target);
                }
            } else {
                // A lone `]` ends the candidate; look for the next opener
                self.pos = inner_start;
            }
        }
        self.pos = text.len();
        None
    }
}

impl<'a> Iterator for WikiLinks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            if let Some(target) = self.scan_current() {
                return Some(target);
            }
            self.current = self.segments.next_prose()?;
            self.pos = 0;
            self.close = None;
        }
    }
}

/// Extract the distinct tags found in prose (without the leading `#`)
pub fn extract_tags(content: &str) -> BTreeSet<String> {
    TagTokens::new(content).map(str::to_string).collect()
}

/// Extract wiki-link targets found in prose, duplicates kept in written order
pub fn extract_wiki_links(content: &str) -> Vec<String> {
    WikiLinks::new(content).map(str::to_string).collect()
}
