use xi_rope::Rope;

use crate::classify::{TagStore, boundary::is_separator_line, is_prose_line};
use crate::editing::Cmd;
use crate::rope::{leading_indent, line_start, prev_line_start};
use crate::rules::RuleOutcome;

/// Indentation rule for prose lines.
///
/// A line that begins a prose paragraph (line one of the document, or
/// preceded by a separator) keeps its indentation unchanged; a continuation
/// line copies the preceding line's indentation exactly. Code lines defer to
/// the external default.
pub fn indent_line(rope: &Rope, tags: &TagStore, pos: usize) -> RuleOutcome {
    if !is_prose_line(rope, tags, pos) {
        return RuleOutcome::Defer;
    }

    let start = line_start(rope, pos);
    let Some(prev) = prev_line_start(rope, start) else {
        return RuleOutcome::Unchanged;
    };
    if is_separator_line(rope, prev) {
        return RuleOutcome::Unchanged;
    }

    let target = leading_indent(rope, prev);
    let current = leading_indent(rope, start);
    if current == target {
        RuleOutcome::Unchanged
    } else {
        RuleOutcome::Edit(Cmd::ReplaceRange {
            range: start..start + current.len(),
            text: target,
        })
    }
}
