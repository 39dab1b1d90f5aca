//! Tag filter
//!
//! A note is admissible when it carries every selected tag and none of the
//! ignored ones. Tags compare case-sensitively; a leading `#` on either side
//! of the comparison is ignored.

use std::collections::BTreeSet;

use crate::registry::Note;

/// Strip one optional leading `#`
pub fn normalize_tag(tag: &str) -> &str {
    let tag = tag.trim();
    tag.strip_prefix('#').unwrap_or(tag)
}

/// Anything carrying a tag set
pub trait Tagged {
    fn tags(&self) -> &BTreeSet<String>;
}

impl Tagged for Note {
    fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
}

impl<T: Tagged + ?Sized> Tagged for &T {
    fn tags(&self) -> &BTreeSet<String> {
        (**self).tags()
    }
}

/// Required and excluded tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilterSpec {
    pub select: BTreeSet<String>,
    pub ignore: BTreeSet<String>,
}

impl TagFilterSpec {
    pub fn new<S, I>(select: S, ignore: I) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let normalize = |tag: &str| Some(normalize_tag(tag)).filter(|t| !t.is_empty()).map(str::to_string);
        Self {
            select: select.into_iter().filter_map(|t| normalize(t.as_ref())).collect(),
            ignore: ignore.into_iter().filter_map(|t| normalize(t.as_ref())).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.select.is_empty() && self.ignore.is_empty()
    }

    /// Whether a note with these tags passes the filter
    pub fn admits(&self, tags: &BTreeSet<String>) -> bool {
        self.select.is_subset(tags) && self.ignore.is_disjoint(tags)
    }
}

/// Keep the admissible items, preserving input order
pub fn admissible<T, I>(items: I, spec: &TagFilterSpec) -> Vec<T>
where
    T: Tagged,
    I: IntoIterator<Item = T>,
{
    items.into_iter().filter(|item| spec.admits(item.tags())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn note(name: &str, content: &str) -> Note {
        Note::from_content(format!("{}.md", name), content, 0)
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("#rust"), "rust");
        assert_eq!(normalize_tag("rust"), "rust");
        assert_eq!(normalize_tag(" #a "), "a");
        assert_eq!(normalize_tag("##a"), "#a");
    }

    #[test]
    fn test_spec_new_normalizes() {
        let spec = TagFilterSpec::new(["#a", "b", ""], vec!["#c".to_string()]);
        assert_eq!(spec.select, tag_set(&["a", "b"]));
        assert_eq!(spec.ignore, tag_set(&["c"]));
    }

    #[test]
    fn test_empty_spec_admits_everything() {
        let spec = TagFilterSpec::default();
        assert!(spec.is_empty());
        assert!(spec.admits(&tag_set(&[])));
        assert!(spec.admits(&tag_set(&["x"])));
    }

    #[test]
    fn test_select_requires_all() {
        let spec = TagFilterSpec::new(["a", "b"], Vec::<String>::new());
        assert!(spec.admits(&tag_set(&["a", "b", "c"])));
        assert!(!spec.admits(&tag_set(&["a"])));
    }

    #[test]
    fn test_ignore_dominates_select() {
        let spec = TagFilterSpec::new(["a"], ["b"]);
        assert!(!spec.admits(&tag_set(&["a", "b"])));
        assert!(spec.admits(&tag_set(&["a"])));
    }

    #[test]
    fn test_case_sensitive() {
        let spec = TagFilterSpec::new(["Rust"], Vec::<String>::new());
        assert!(!spec.admits(&tag_set(&["rust"])));
    }

    #[test]
    fn test_admissible_preserves_order() {
        let notes = vec![
            note("c", "#keep"),
            note("a", "#keep #drop"),
            note("b", "#keep"),
        ];
        let spec = TagFilterSpec::new(["keep"], ["drop"]);
        let kept: Vec<_> = admissible(&notes, &spec).into_iter().map(|n| n.identity.as_str()).collect();
        assert_eq!(kept, vec!["c", "b"]);
    }
}
