use xi_rope::Rope;

use crate::classify::tags::TagStore;
use crate::rope::first_nonblank;

/// Returns true if the line containing `pos` is currently classified as
/// prose. Blank lines are never prose.
///
/// This is the single predicate every downstream rule consults: O(1) given
/// the tag lookup at the line's first non-blank offset.
pub fn is_prose_line(rope: &Rope, tags: &TagStore, pos: usize) -> bool {
    first_nonblank(rope, pos).is_some_and(|first| tags.is_paragraph_start(first))
}
