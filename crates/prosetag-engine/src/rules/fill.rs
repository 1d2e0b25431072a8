use xi_rope::Rope;

use crate::classify::{TagStore, boundary::is_separator_line, is_prose_line};
use crate::editing::Cmd;
use crate::rope::{
    leading_indent, line_start, line_text, newline_offset, next_line_start, prev_line_start,
    slice,
};
use crate::rules::RuleOutcome;

/// Fill rule for prose paragraphs.
///
/// Rewraps the paragraph containing `pos` to `fill_column`, preserving the
/// paragraph's left indentation. Code paragraphs defer to the external
/// structured-expression fill behavior.
///
/// `bypass_override` skips the prose-aware routing entirely and wraps
/// unconditionally; the rule's own re-entry into a host's generic fill call
/// passes `true` so an overridden fill hook cannot bounce back into this
/// rule.
pub fn fill_paragraph(
    rope: &Rope,
    tags: &TagStore,
    fill_column: usize,
    pos: usize,
    bypass_override: bool,
) -> RuleOutcome {
    if !bypass_override && !is_prose_line(rope, tags, pos) {
        return RuleOutcome::Defer;
    }

    let (para_start, para_end) = paragraph_bounds(rope, pos);
    if para_start >= para_end {
        return RuleOutcome::Unchanged;
    }

    let indent = leading_indent(rope, para_start);
    let words: Vec<String> = collect_words(rope, para_start, para_end);
    if words.is_empty() {
        return RuleOutcome::Unchanged;
    }

    let wrapped = wrap(&words, &indent, fill_column);
    if wrapped == slice(rope, para_start..para_end) {
        RuleOutcome::Unchanged
    } else {
        RuleOutcome::Edit(Cmd::ReplaceRange {
            range: para_start..para_end,
            text: wrapped,
        })
    }
}

/// The byte range of the paragraph containing `pos`: from the start of its
/// first line to the end of its last line, excluding the trailing newline.
fn paragraph_bounds(rope: &Rope, pos: usize) -> (usize, usize) {
    let mut first = line_start(rope, pos);
    while let Some(prev) = prev_line_start(rope, first) {
        if is_separator_line(rope, prev) {
            break;
        }
        first = prev;
    }

    let mut last = line_start(rope, pos);
    loop {
        let next = next_line_start(rope, last);
        if next >= rope.len() || is_separator_line(rope, next) {
            break;
        }
        last = next;
    }

    let end = newline_offset(rope, last).unwrap_or_else(|| next_line_start(rope, last));
    (first, end)
}

fn collect_words(rope: &Rope, para_start: usize, para_end: usize) -> Vec<String> {
    let mut words = Vec::new();
    let mut pos = para_start;
    while pos < para_end {
        let text = line_text(rope, pos);
        words.extend(text.split_whitespace().map(str::to_string));
        pos = next_line_start(rope, pos);
    }
    words
}

/// Greedy wrap: pack words onto lines of at most `fill_column` columns,
/// always placing at least one word per line.
fn wrap(words: &[String], indent: &str, fill_column: usize) -> String {
    let indent_width = indent.chars().count();
    let mut out = String::new();
    let mut column = 0;
    for word in words {
        let width = word.chars().count();
        if column == 0 {
            out.push_str(indent);
            out.push_str(word);
            column = indent_width + width;
        } else if column + 1 + width <= fill_column {
            out.push(' ');
            out.push_str(word);
            column += 1 + width;
        } else {
            out.push('\n');
            out.push_str(indent);
            out.push_str(word);
            column = indent_width + width;
        }
    }
    out
}
