use xi_rope::Rope;

use crate::rope::line_text;

/// Returns true if the line containing `pos` is a paragraph separator: a
/// blank (whitespace-only) line or a page-break line.
///
/// Pure function of document content.
pub fn is_separator_line(rope: &Rope, pos: usize) -> bool {
    let text = line_text(rope, pos);
    text.trim().is_empty() || text.starts_with('\u{000C}')
}
