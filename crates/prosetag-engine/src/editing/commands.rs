use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::Document;

/// Commands that can be applied to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText {
        at: usize,
        text: String,
    },
    DeleteRange {
        range: std::ops::Range<usize>,
    },
    ReplaceRange {
        range: std::ops::Range<usize>,
        text: String,
    },
}

/// Compile a command into a delta
pub(crate) fn compile_command(doc: &Document, cmd: &Cmd) -> Delta<RopeInfo> {
    match cmd {
        Cmd::InsertText { at, text } => {
            let mut builder = Builder::new(doc.len());
            let insert_rope = Rope::from(text);
            builder.replace(*at..*at, insert_rope);
            builder.build()
        }
        Cmd::DeleteRange { range } => {
            let mut builder = Builder::new(doc.len());
            builder.delete(range.clone());
            builder.build()
        }
        Cmd::ReplaceRange { range, text } => {
            let mut builder = Builder::new(doc.len());
            let replace_rope = Rope::from(text);
            builder.replace(range.clone(), replace_rope);
            builder.build()
        }
    }
}

/// Transform selection based on the command being applied
pub(crate) fn transform_selection_for_command(
    range: &std::ops::Range<usize>,
    cmd: &Cmd,
) -> std::ops::Range<usize> {
    match cmd {
        Cmd::InsertText { at, text } => {
            // If insertion point is before or at selection start, shift selection right
            let text_len = text.len();
            if *at <= range.start {
                (range.start + text_len)..(range.end + text_len)
            } else if *at < range.end {
                // Insertion is within selection - grow the end
                range.start..(range.end + text_len)
            } else {
                // Insertion is after selection - no change
                range.clone()
            }
        }
        Cmd::DeleteRange { range: del_range } => {
            let del_len = del_range.len();
            if del_range.end <= range.start {
                // Deletion is completely before selection - shift left
                (range.start - del_len)..(range.end - del_len)
            } else if del_range.start >= range.end {
                // Deletion is completely after selection - no change
                range.clone()
            } else {
                // Deletion overlaps with selection - collapse to deletion point
                let collapse_point = del_range.start;
                collapse_point..collapse_point
            }
        }
        Cmd::ReplaceRange {
            range: replace_range,
            text,
        } => {
            // Replace is essentially delete + insert at the same position
            let del_len = replace_range.len();
            let insert_len = text.len();

            if replace_range.end <= range.start {
                // Replacement is before selection - shift by net change
                let net_change = insert_len as i64 - del_len as i64;
                if net_change >= 0 {
                    let shift = net_change as usize;
                    (range.start + shift)..(range.end + shift)
                } else {
                    let shift = (-net_change) as usize;
                    (range.start.saturating_sub(shift))..(range.end.saturating_sub(shift))
                }
            } else if replace_range.start >= range.end {
                // Replacement is after selection - no change
                range.clone()
            } else {
                // Replacement overlaps selection - keep selection unchanged
                range.clone()
            }
        }
    }
}
