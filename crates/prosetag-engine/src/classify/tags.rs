use std::collections::BTreeMap;

use xi_rope::delta::Transformer;
use xi_rope::{Delta, RopeInfo};

/// A classification mark attached to a document offset.
///
/// Absence of a tag means the line is structured-expression content, the
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Marks the first non-blank offset of a line belonging to a prose
    /// (block-comment) paragraph.
    ParagraphStart,
    /// Marks a line-ending offset that must not, by itself, be treated as
    /// ending a prose region. Never placed on the document's final offset.
    NonTerminatingNewline,
}

/// Sparse mapping from byte offset to classification mark.
///
/// Written only by the classifier; read by every consumer. Offsets are kept
/// current across edits by transforming them through the edit's delta, the
/// same way anchors survive edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagStore {
    map: BTreeMap<usize, Tag>,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, offset: usize) -> Option<Tag> {
        self.map.get(&offset).copied()
    }

    pub fn is_paragraph_start(&self, offset: usize) -> bool {
        self.get(offset) == Some(Tag::ParagraphStart)
    }

    pub fn is_non_terminating_newline(&self, offset: usize) -> bool {
        self.get(offset) == Some(Tag::NonTerminatingNewline)
    }

    /// Iterates tags in `range` in offset order.
    pub fn in_range(
        &self,
        range: std::ops::Range<usize>,
    ) -> impl Iterator<Item = (usize, Tag)> + '_ {
        self.map.range(range).map(|(&off, &tag)| (off, tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Tag)> + '_ {
        self.map.iter().map(|(&off, &tag)| (off, tag))
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Replaces all tags within `range` with `desired`, returning whether
    /// anything changed. `desired` offsets must lie inside `range`.
    pub fn retag(&mut self, range: std::ops::Range<usize>, desired: &[(usize, Tag)]) -> bool {
        let existing: Vec<(usize, Tag)> = self.in_range(range.clone()).collect();
        if existing == desired {
            return false;
        }
        let keys: Vec<usize> = existing.into_iter().map(|(off, _)| off).collect();
        for key in keys {
            self.map.remove(&key);
        }
        for &(off, tag) in desired {
            debug_assert!(range.contains(&off));
            self.map.insert(off, tag);
        }
        true
    }

    /// Transforms every tag offset through an edit's delta so tags outside
    /// the changed range move with the text they mark. Tags pushed past the
    /// new document end are dropped; tags inside the changed range are
    /// recomputed by the classifier afterwards.
    pub fn transform(&mut self, delta: &Delta<RopeInfo>) {
        let mut transformer = Transformer::new(delta);
        let new_len = delta.new_document_len();
        let mut transformed = BTreeMap::new();
        for (&off, &tag) in &self.map {
            let new_off = transformer.transform(off, true);
            if new_off < new_len {
                transformed.insert(new_off, tag);
            }
        }
        self.map = transformed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xi_rope::Rope;
    use xi_rope::delta::Builder;

    #[test]
    fn retag_reports_change() {
        let mut tags = TagStore::new();
        assert!(tags.retag(0..10, &[(2, Tag::ParagraphStart)]));
        assert!(!tags.retag(0..10, &[(2, Tag::ParagraphStart)]));
        assert!(tags.retag(0..10, &[]));
        assert!(tags.is_empty());
    }

    #[test]
    fn retag_clears_stale_marks_in_range() {
        let mut tags = TagStore::new();
        tags.retag(0..10, &[(2, Tag::ParagraphStart), (9, Tag::NonTerminatingNewline)]);
        tags.retag(0..10, &[(0, Tag::ParagraphStart)]);
        assert!(tags.is_paragraph_start(0));
        assert!(!tags.is_paragraph_start(2));
        assert!(!tags.is_non_terminating_newline(9));
    }

    #[test]
    fn transform_shifts_tags_after_insertion() {
        let mut tags = TagStore::new();
        tags.retag(0..20, &[(7, Tag::ParagraphStart), (12, Tag::NonTerminatingNewline)]);

        // Insert 3 bytes at offset 5 into a 20-byte document.
        let mut builder = Builder::new(20);
        builder.replace(5..5, Rope::from("abc"));
        let delta = builder.build();

        tags.transform(&delta);
        assert!(tags.is_paragraph_start(10));
        assert!(tags.is_non_terminating_newline(15));
        assert!(!tags.is_paragraph_start(7));
    }

    #[test]
    fn transform_drops_tags_past_new_end() {
        let mut tags = TagStore::new();
        tags.retag(0..20, &[(18, Tag::ParagraphStart)]);

        let mut builder = Builder::new(20);
        builder.delete(10..20);
        let delta = builder.build();

        tags.transform(&delta);
        assert!(tags.is_empty());
    }
}
