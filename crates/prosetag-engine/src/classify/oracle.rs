use std::collections::BTreeMap;

use xi_rope::Rope;

use crate::classify::query::is_prose_line;
use crate::classify::syntax::Syntax;
use crate::classify::tags::TagStore;
use crate::rope::{next_line_start, slice};

/// Reports the bracket-nesting depth of the structured-expression syntax
/// enclosing a position.
///
/// Classification changes can change what an oracle would report for later
/// positions, so the classifier calls `invalidate_from` on every tag change.
/// Caching is the oracle's own responsibility.
pub trait DepthOracle {
    /// Nesting depth at `pos`, derived from content strictly before `pos`.
    fn depth_at(&mut self, rope: &Rope, tags: &TagStore, pos: usize) -> u32;

    /// Drops any cached state derived from content at or after `pos`.
    fn invalidate_from(&mut self, pos: usize);
}

/// Default oracle: counts open and close brackets in a forward scan,
/// ignoring string literals, line comments, and prose-tagged lines.
///
/// Depth is checkpointed at line starts so repeated queries over the same
/// document prefix stay cheap.
pub struct ScanDepthOracle {
    syntax: Syntax,
    checkpoints: BTreeMap<usize, u32>,
}

impl ScanDepthOracle {
    pub fn new(syntax: Syntax) -> Self {
        Self {
            syntax,
            checkpoints: BTreeMap::new(),
        }
    }
}

impl DepthOracle for ScanDepthOracle {
    fn depth_at(&mut self, rope: &Rope, tags: &TagStore, pos: usize) -> u32 {
        let pos = pos.min(rope.len());
        let (mut off, mut depth) = self
            .checkpoints
            .range(..=pos)
            .next_back()
            .map(|(&o, &d)| (o, d))
            .unwrap_or((0, 0));
        let mut in_string = false;

        while off < pos {
            let next = next_line_start(rope, off);
            let stop = next.min(pos);
            if in_string || !is_prose_line(rope, tags, off) {
                let text = slice(rope, off..stop);
                let mut escaped = false;
                for c in text.chars() {
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == self.syntax.string_delim {
                        in_string = !in_string;
                    } else if in_string {
                        // string content never nests
                    } else if c == self.syntax.comment_marker {
                        break;
                    } else if self.syntax.is_open(c) {
                        depth += 1;
                    } else if self.syntax.is_close(c) {
                        depth = depth.saturating_sub(1);
                    }
                }
            }
            off = stop;
            // checkpoints only at line starts with clean scan state
            if off == next && !in_string {
                self.checkpoints.insert(off, depth);
            }
        }

        depth
    }

    fn invalidate_from(&mut self, pos: usize) {
        // depth at an offset depends only on content before it, so a
        // checkpoint exactly at `pos` stays valid
        self.checkpoints.split_off(&pos.saturating_add(1));
    }
}
