use xi_rope::Rope;

use crate::classify::{TagStore, is_prose_line};
use crate::editing::Cmd;
use crate::rope::{leading_indent, line_start, newline_offset, next_line_start, slice};
use crate::rules::RuleOutcome;

/// Whether a break is a hard paragraph-shaping break or a soft one a later
/// refill may remove. Both produce the same text edit; the kind is the
/// caller's bookkeeping, since classification is recomputed from content
/// alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    Soft,
    Hard,
}

/// Line-break rule for prose lines.
///
/// Inserts a line terminator at `pos`, stripping horizontal whitespace
/// immediately before and after the insertion point, and indents the new
/// line to match the line the break occurred on. Code lines defer to the
/// external structured-expression behavior.
pub fn break_line(rope: &Rope, tags: &TagStore, pos: usize, _kind: BreakKind) -> RuleOutcome {
    if !is_prose_line(rope, tags, pos) {
        return RuleOutcome::Defer;
    }

    let start = line_start(rope, pos);
    let end = newline_offset(rope, pos).unwrap_or_else(|| next_line_start(rope, pos));
    let pos = pos.clamp(start, end);

    let before = slice(rope, start..pos);
    let after = slice(rope, pos..end);
    let ws_start = pos - trailing_hspace(&before);
    let ws_end = pos + leading_hspace(&after);

    let indent = leading_indent(rope, start);
    RuleOutcome::Edit(Cmd::ReplaceRange {
        range: ws_start..ws_end,
        text: format!("\n{indent}"),
    })
}

fn leading_hspace(text: &str) -> usize {
    text.chars()
        .take_while(|&c| c == ' ' || c == '\t')
        .map(char::len_utf8)
        .sum()
}

fn trailing_hspace(text: &str) -> usize {
    text.chars()
        .rev()
        .take_while(|&c| c == ' ' || c == '\t')
        .map(char::len_utf8)
        .sum()
}
