//! Line-granularity helpers over the rope buffer.
//!
//! All classification work happens at line granularity, so every component
//! needs the same handful of primitives: where a line starts and ends, where
//! its first non-blank character sits, and what its leading indentation is.
//! Offsets are byte offsets into the rope.

use std::borrow::Cow;

use xi_rope::Rope;

/// Returns the start offset of the line containing `pos`.
///
/// `pos` is clamped to the rope length; `line_start(rope.len())` is the start
/// of the (possibly empty) final line.
pub fn line_start(rope: &Rope, pos: usize) -> usize {
    let pos = pos.min(rope.len());
    rope.offset_of_line(rope.line_of_offset(pos))
}

/// Returns the start offset of the line after the one containing `pos`, or
/// `rope.len()` if there is none.
pub fn next_line_start(rope: &Rope, pos: usize) -> usize {
    let pos = pos.min(rope.len());
    rope.offset_of_line(rope.line_of_offset(pos) + 1)
}

/// Returns the start offset of the line before the one containing `pos`.
pub fn prev_line_start(rope: &Rope, pos: usize) -> Option<usize> {
    let start = line_start(rope, pos);
    if start == 0 {
        None
    } else {
        Some(line_start(rope, start - 1))
    }
}

/// Returns the offset of the newline ending the line containing `pos`, or
/// `None` when the line is the last one and the document has no trailing
/// newline.
pub fn newline_offset(rope: &Rope, pos: usize) -> Option<usize> {
    let next = next_line_start(rope, pos);
    if next > line_start(rope, pos) && slice(rope, next - 1..next) == "\n" {
        Some(next - 1)
    } else {
        None
    }
}

/// The text of the line containing `pos`, without its trailing newline.
pub fn line_text(rope: &Rope, pos: usize) -> Cow<'_, str> {
    let start = line_start(rope, pos);
    let end = newline_offset(rope, pos).unwrap_or_else(|| next_line_start(rope, pos));
    slice(rope, start..end)
}

/// Returns the offset of the first character on the line containing `pos`
/// that is not a space or tab, or `None` if the line is blank.
pub fn first_nonblank(rope: &Rope, pos: usize) -> Option<usize> {
    let start = line_start(rope, pos);
    let text = line_text(rope, pos);
    text.char_indices()
        .find(|&(_, c)| c != ' ' && c != '\t')
        .map(|(i, _)| start + i)
}

/// The leading horizontal whitespace of the line containing `pos`.
pub fn leading_indent(rope: &Rope, pos: usize) -> String {
    let text = line_text(rope, pos);
    text.chars().take_while(|&c| c == ' ' || c == '\t').collect()
}

/// Slices the rope to a cow string, clamping the range to rope bounds the
/// way stale ranges must be tolerated after edits.
pub fn slice(rope: &Rope, range: std::ops::Range<usize>) -> Cow<'_, str> {
    let len = rope.len();
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);
    rope.slice_to_cow(start..end)
}
