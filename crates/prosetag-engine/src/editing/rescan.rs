use xi_rope::Rope;

use crate::classify::TagStore;

/// Host tokenizer re-scan, invoked after every tag update so
/// structured-expression syntax is re-tokenized consistently with the
/// current tags. Opaque to the engine.
pub trait Rescan {
    fn rescan(&mut self, buffer: &Rope, tags: &TagStore, range: std::ops::Range<usize>);
}
