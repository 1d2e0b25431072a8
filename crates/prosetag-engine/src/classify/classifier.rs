//! The incremental paragraph classifier.
//!
//! Given a byte range that has just changed, [`reclassify`] walks the
//! affected lines and rewrites tag store entries so that every paragraph
//! whose first line lies in the range is classified consistently, using only
//! local context: the previous line, whether the paragraph starts at column
//! zero, and the bracket-nesting depth at its first non-blank character.
//!
//! Classification is uniform within a paragraph: leading-character evidence
//! is consulted only on a paragraph's first line, and continuation lines
//! inherit regardless of what their own first characters look like.

use xi_rope::Rope;

use crate::classify::boundary::is_separator_line;
use crate::classify::oracle::DepthOracle;
use crate::classify::syntax::Syntax;
use crate::classify::tags::{Tag, TagStore};
use crate::rope::{first_nonblank, line_start, newline_offset, next_line_start, slice};

/// How a line's classification was decided before the character test.
enum Decision {
    /// Continuation of a prose paragraph: tag without a character test.
    Prose,
    /// Continuation of a code paragraph, or an indented start nested inside
    /// an open expression: leave untagged.
    Code,
    /// Candidate paragraph start: the leading characters decide.
    Test,
}

/// Re-derives classification for every paragraph whose first line lies in
/// `[start, end]`, updating `tags` and invalidating `oracle` from any
/// position whose classification changed.
///
/// Inverted ranges are treated as a no-op; positions are clamped to the
/// document bounds. Paragraphs that continue past `end` are re-tagged to
/// their full forward extent so classification stays uniform per paragraph.
pub fn reclassify(
    rope: &Rope,
    tags: &mut TagStore,
    oracle: &mut dyn DepthOracle,
    syntax: &Syntax,
    start: usize,
    end: usize,
) {
    let len = rope.len();
    let start = start.min(len);
    let end = end.min(len);
    if end < start {
        return;
    }

    // Normalization: a mid-line `start` is in scope only if the line's
    // paragraph-start offset is at or after it; otherwise the edit happened
    // strictly after where a tag would go and the next line is first.
    let mut pos = line_start(rope, start);
    if pos < start {
        match first_nonblank(rope, pos) {
            Some(first) if first >= start => {}
            Some(_) => pos = next_line_start(rope, pos),
            None => {}
        }
    }

    while pos <= end && pos < len {
        let next = next_line_start(rope, pos);
        if is_separator_line(rope, pos) {
            // an edit can move a stale mark onto a line that is now a
            // separator; separator lines carry no tags
            if tags.retag(pos..next, &[]) {
                oracle.invalidate_from(pos);
            }
            pos = next;
            continue;
        }
        let Some(first) = first_nonblank(rope, pos) else {
            pos = next;
            continue;
        };

        let decision = decide(rope, tags, oracle, pos, first);
        apply(rope, tags, oracle, syntax, pos, first, decision);
        pos = next;
    }

    // Forward propagation: the affected paragraphs can extend past `end`,
    // and an edit that introduced a separator re-cases the line after it.
    propagate(rope, tags, oracle, syntax, pos);
}

/// Classifies the line at `pos` by case. `first` is its first non-blank
/// offset.
fn decide(
    rope: &Rope,
    tags: &TagStore,
    oracle: &mut dyn DepthOracle,
    pos: usize,
    first: usize,
) -> Decision {
    if pos == 0 {
        // Case A: first line of the document.
        return Decision::Test;
    }
    let prev = line_start(rope, pos - 1);
    if !is_separator_line(rope, prev) {
        // Case B: continuation line, inherit the open paragraph's class.
        let inherited = first_nonblank(rope, prev)
            .is_some_and(|prev_first| tags.is_paragraph_start(prev_first));
        if inherited { Decision::Prose } else { Decision::Code }
    } else if first == pos {
        // Case C: unindented paragraph start after a separator.
        Decision::Test
    } else if oracle.depth_at(rope, tags, first) == 0 {
        // Case D, depth zero: indented start outside any open expression.
        Decision::Test
    } else {
        // Case D, nested: an indented start inside an open expression
        // cannot be a prose paragraph interleaved in its body.
        Decision::Code
    }
}

/// Writes the tags a single line should carry, clearing any stale marks on
/// it, and invalidates the oracle if anything changed. Returns whether the
/// line's tags changed.
fn apply(
    rope: &Rope,
    tags: &mut TagStore,
    oracle: &mut dyn DepthOracle,
    syntax: &Syntax,
    pos: usize,
    first: usize,
    decision: Decision,
) -> bool {
    let prose = match decision {
        Decision::Prose => true,
        Decision::Code => false,
        Decision::Test => !opens_expression(rope, syntax, first),
    };

    let next = next_line_start(rope, pos);
    let mut desired = Vec::new();
    if prose {
        desired.push((first, Tag::ParagraphStart));
        if let Some(nl) = newline_offset(rope, pos) {
            // the document's final offset never carries the mark
            if nl + 1 < rope.len() {
                desired.push((nl, Tag::NonTerminatingNewline));
            }
        }
    }

    let changed = tags.retag(pos..next, &desired);
    if changed {
        oracle.invalidate_from(first);
    }
    changed
}

/// True if the characters at `first` can open valid structured-expression
/// syntax: a standalone quote char at end of line, a quote char or nothing
/// followed by an open bracket, or a line-comment marker.
fn opens_expression(rope: &Rope, syntax: &Syntax, first: usize) -> bool {
    let end = newline_offset(rope, first).unwrap_or_else(|| next_line_start(rope, first));
    let text = slice(rope, first..end);
    let mut chars = text.chars();
    match chars.next() {
        None => false,
        Some(c) if c == syntax.comment_marker => true,
        Some(c) if syntax.is_open(c) => true,
        Some(c) if c == syntax.quote_char => match chars.next() {
            None => true,
            Some(c2) => syntax.is_open(c2),
        },
        Some(_) => false,
    }
}

/// Re-derives classification line by line from `pos` forward until a line's
/// stored tags already match a fresh derivation.
///
/// This covers the full forward extent of the affected paragraphs: Case B
/// inheritance ripples through continuation lines, and when the edit turned
/// a line into a separator, the line after it is re-cased from scratch
/// (Case C/D) instead of keeping its pre-edit inherited tag.
fn propagate(
    rope: &Rope,
    tags: &mut TagStore,
    oracle: &mut dyn DepthOracle,
    syntax: &Syntax,
    mut pos: usize,
) {
    let len = rope.len();
    while pos < len {
        let next = next_line_start(rope, pos);
        if is_separator_line(rope, pos) {
            pos = next;
            continue;
        }
        let Some(first) = first_nonblank(rope, pos) else {
            pos = next;
            continue;
        };
        let decision = decide(rope, tags, oracle, pos, first);
        if !apply(rope, tags, oracle, syntax, pos, first, decision) {
            break;
        }
        pos = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::oracle::ScanDepthOracle;
    use crate::classify::query::is_prose_line;

    fn classify_all(text: &str) -> (Rope, TagStore) {
        let rope = Rope::from(text);
        let mut tags = TagStore::new();
        let mut oracle = ScanDepthOracle::new(Syntax::default());
        let syntax = Syntax::default();
        reclassify(&rope, &mut tags, &mut oracle, &syntax, 0, rope.len());
        (rope, tags)
    }

    #[test]
    fn unindented_text_after_separator_is_prose() {
        let (rope, tags) = classify_all("(foo)\n\nPlain text here.\n");
        assert!(!is_prose_line(&rope, &tags, 0));
        assert!(is_prose_line(&rope, &tags, 7));
    }

    #[test]
    fn open_bracket_line_is_code() {
        let (rope, tags) = classify_all("(defun f ())\n");
        assert!(!is_prose_line(&rope, &tags, 0));
        assert!(tags.is_empty());
    }

    #[test]
    fn comment_marker_line_is_code() {
        let (rope, tags) = classify_all(";; a comment\n");
        assert!(!is_prose_line(&rope, &tags, 0));
    }

    #[test]
    fn standalone_quote_at_end_of_line_is_code() {
        let (rope, tags) = classify_all("`\n");
        assert!(!is_prose_line(&rope, &tags, 0));
    }

    #[test]
    fn quote_then_open_bracket_is_code() {
        let (rope, tags) = classify_all("`(a b c)\n");
        assert!(!is_prose_line(&rope, &tags, 0));
    }

    #[test]
    fn quote_then_word_is_prose() {
        let (rope, tags) = classify_all("`quoted word starts prose\n");
        assert!(is_prose_line(&rope, &tags, 0));
    }

    #[test]
    fn continuation_inherits_prose_despite_comment_marker() {
        let (rope, tags) = classify_all("First prose line\n;;; looks like code\n");
        assert!(is_prose_line(&rope, &tags, 0));
        assert!(is_prose_line(&rope, &tags, 17));
    }

    #[test]
    fn continuation_inherits_code() {
        let (rope, tags) = classify_all("(defun f ()\n  oddly worded line)\n");
        assert!(!is_prose_line(&rope, &tags, 0));
        assert!(!is_prose_line(&rope, &tags, 12));
    }

    #[test]
    fn indented_start_inside_expression_is_code() {
        // lines 2-3 sit at depth > 0 even after a separator
        let (rope, tags) = classify_all("(defun f (\n\n  \"doc\"\n");
        assert!(!is_prose_line(&rope, &tags, 12));
        assert!(tags.is_empty());
    }

    #[test]
    fn indented_start_at_depth_zero_is_eligible_for_prose() {
        let (rope, tags) = classify_all("(foo)\n\n  Indented paragraph.\n");
        assert!(is_prose_line(&rope, &tags, 7));
    }

    #[test]
    fn non_terminating_newline_marks_prose_line_ends() {
        let (_, tags) = classify_all("Prose one\nProse two\n\ntail\n");
        assert!(tags.is_non_terminating_newline(9));
        assert!(tags.is_non_terminating_newline(19));
    }

    #[test]
    fn final_newline_carries_no_mark() {
        let (rope, tags) = classify_all("Only prose\n");
        assert!(is_prose_line(&rope, &tags, 0));
        assert!(!tags.is_non_terminating_newline(10));
    }

    #[test]
    fn missing_trailing_newline_carries_no_mark() {
        let (rope, tags) = classify_all("Only prose");
        assert!(is_prose_line(&rope, &tags, 0));
        assert_eq!(tags.iter().count(), 1);
    }

    #[test]
    fn idempotent_over_repeat_runs() {
        let text = "(foo)\n\nPlain text here.\n\nNot quite ) balanced.\n";
        let rope = Rope::from(text);
        let mut tags = TagStore::new();
        let mut oracle = ScanDepthOracle::new(Syntax::default());
        let syntax = Syntax::default();
        reclassify(&rope, &mut tags, &mut oracle, &syntax, 0, rope.len());
        let first_pass: Vec<_> = tags.iter().collect();
        reclassify(&rope, &mut tags, &mut oracle, &syntax, 0, rope.len());
        let second_pass: Vec<_> = tags.iter().collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn inverted_range_is_a_no_op() {
        let rope = Rope::from("Plain text here.\n");
        let mut tags = TagStore::new();
        let mut oracle = ScanDepthOracle::new(Syntax::default());
        reclassify(&rope, &mut tags, &mut oracle, &Syntax::default(), 10, 2);
        assert!(tags.is_empty());
    }

    #[test]
    fn out_of_bounds_range_is_clamped() {
        let rope = Rope::from("Plain text here.\n");
        let mut tags = TagStore::new();
        let mut oracle = ScanDepthOracle::new(Syntax::default());
        reclassify(&rope, &mut tags, &mut oracle, &Syntax::default(), 0, 10_000);
        assert!(is_prose_line(&rope, &tags, 0));
    }

    #[test]
    fn normalization_skips_line_when_edit_is_past_its_start() {
        // Edit lands after line 1's first non-blank offset, so only line 2
        // is in scope; line 1 keeps whatever tags it had.
        let rope = Rope::from("word tail\n(code)\n");
        let mut tags = TagStore::new();
        let mut oracle = ScanDepthOracle::new(Syntax::default());
        reclassify(&rope, &mut tags, &mut oracle, &Syntax::default(), 5, 12);
        assert!(!is_prose_line(&rope, &tags, 0));
    }

    #[test]
    fn propagation_recases_a_paragraph_after_a_new_separator() {
        // Stale inherited tag on the tail line, as left behind when an edit
        // turns the line before it into a separator.
        let rope = Rope::from("Prose\n\n(x)\n");
        let mut tags = TagStore::new();
        tags.retag(7..11, &[(7, Tag::ParagraphStart)]);
        let mut oracle = ScanDepthOracle::new(Syntax::default());
        reclassify(&rope, &mut tags, &mut oracle, &Syntax::default(), 0, 6);
        assert!(is_prose_line(&rope, &tags, 0));
        assert!(!is_prose_line(&rope, &tags, 7));
    }

    #[test]
    fn propagation_retags_paragraph_past_range_end() {
        // Classify only the first line of a three-line paragraph; the
        // continuation lines past `end` must still end up uniform.
        let rope = Rope::from("Prose start\n;; second\n;; third\n");
        let mut tags = TagStore::new();
        let mut oracle = ScanDepthOracle::new(Syntax::default());
        reclassify(&rope, &mut tags, &mut oracle, &Syntax::default(), 0, 0);
        assert!(is_prose_line(&rope, &tags, 0));
        assert!(is_prose_line(&rope, &tags, 12));
        assert!(is_prose_line(&rope, &tags, 22));
    }
}
