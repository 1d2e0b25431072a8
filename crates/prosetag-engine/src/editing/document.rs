use xi_rope::delta::DeltaElement;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::classify::{self, ScanDepthOracle, Syntax, TagStore};
use crate::editing::{Cmd, Patch, Rescan, commands};
use crate::rope;

/// A plain-text document with per-paragraph prose/code classification kept
/// current across edits.
///
/// The buffer is the single source of truth; classification is derived
/// state, recomputed for the affected range on every edit. `apply` runs the
/// full pipeline: compile the command to a delta, apply it to the buffer,
/// transform tags and selection through the delta, reclassify the changed
/// range, and finally hand the range to the host's re-scan hook. The
/// classifier runs to completion before any other consumer can observe the
/// tag store; nothing here suspends or retries.
pub struct Document {
    /// xi-rope buffer containing the entire document as UTF-8 bytes
    pub(crate) buffer: Rope,
    /// Current selection/cursor position as byte offsets in buffer
    selection: std::ops::Range<usize>,
    /// Version counter incremented on each edit (enables change detection)
    version: u64,
    /// Classification marks, keyed by byte offset
    tags: TagStore,
    /// Nesting-depth oracle, invalidated by the classifier on tag changes
    oracle: ScanDepthOracle,
    /// Surface syntax the classification heuristics consult
    syntax: Syntax,
    /// Host tokenizer re-scan, invoked after tag updates
    rescan: Option<Box<dyn Rescan>>,
}

impl Document {
    /// Create a new document from raw bytes, classifying every paragraph.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        Self::with_syntax(bytes, Syntax::default())
    }

    /// Create a new document with a specific surface syntax.
    pub fn with_syntax(bytes: &[u8], syntax: Syntax) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        let buffer = Rope::from(text);
        let len = buffer.len();

        let mut doc = Self {
            buffer,
            selection: len..len, // Start with cursor at end
            version: 0,
            tags: TagStore::new(),
            oracle: ScanDepthOracle::new(syntax.clone()),
            syntax,
            rescan: None,
        };
        doc.reclassify_range(0, len);
        Ok(doc)
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Apply a command to the document.
    ///
    /// Pipeline order matters: tags are transformed through the delta before
    /// reclassification so marks outside the changed range stay attached to
    /// the text they describe, and the re-scan hook only ever observes a tag
    /// store that is already consistent.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let delta = commands::compile_command(self, &cmd);
        let changed = changed_ranges(&delta);

        self.buffer = delta.apply(&self.buffer);
        self.tags.transform(&delta);

        if let (Some(first), Some(last)) = (changed.first(), changed.last()) {
            self.reclassify_range(first.start, last.end);
        }

        let new_selection = commands::transform_selection_for_command(&self.selection, &cmd);
        let len = self.buffer.len();
        self.selection = new_selection.start.min(len)..new_selection.end.min(len);

        self.version += 1;

        Patch {
            changed,
            new_selection: self.selection.clone(),
            version: self.version,
        }
    }

    /// Edit notification: reclassify the paragraphs touched by `[start,
    /// end]` and hand the range to the re-scan hook.
    ///
    /// Context is widened by one line of look-back because a line's
    /// classification (and the mark on the previous line's newline) can
    /// depend on the line before the edit. Inverted ranges are a no-op;
    /// positions are clamped to the document bounds.
    pub fn reclassify_range(&mut self, start: usize, end: usize) {
        let len = self.buffer.len();
        let start = start.min(len);
        let end = end.min(len);
        if end < start {
            return;
        }

        let look_back = rope::prev_line_start(&self.buffer, start)
            .unwrap_or_else(|| rope::line_start(&self.buffer, start));
        classify::reclassify(
            &self.buffer,
            &mut self.tags,
            &mut self.oracle,
            &self.syntax,
            look_back,
            end,
        );

        if let Some(hook) = self.rescan.as_mut() {
            hook.rescan(&self.buffer, &self.tags, start..end);
        }
    }

    /// Is the line at `pos` currently classified as prose?
    pub fn is_prose_line(&self, pos: usize) -> bool {
        classify::is_prose_line(&self.buffer, &self.tags, pos)
    }

    /// Register the host tokenizer re-scan, invoked after every tag update.
    pub fn set_rescan_hook(&mut self, hook: Box<dyn Rescan>) {
        self.rescan = Some(hook);
    }

    /// Get the current selection range
    pub fn selection(&self) -> std::ops::Range<usize> {
        self.selection.clone()
    }

    /// Set the selection range
    pub fn set_selection(&mut self, selection: std::ops::Range<usize>) {
        let len = self.buffer.len();
        self.selection = selection.start.min(len)..selection.end.min(len);
    }

    pub fn tags(&self) -> &TagStore {
        &self.tags
    }

    /// Read access to the underlying rope, for rule consumers.
    pub fn buffer(&self) -> &Rope {
        &self.buffer
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Get the buffer length
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Slice the buffer to a cow string, clamping stale ranges to bounds
    pub fn slice_to_cow(&self, range: std::ops::Range<usize>) -> std::borrow::Cow<'_, str> {
        rope::slice(&self.buffer, range)
    }
}

/// Extract the changed byte ranges (in post-edit coordinates) from a delta.
/// Deletions show up as empty ranges at their join point so the classifier
/// still visits the surviving line.
fn changed_ranges(delta: &Delta<RopeInfo>) -> Vec<std::ops::Range<usize>> {
    let mut changed = Vec::new();
    let mut old_pos = 0;
    let mut new_pos = 0;
    for el in delta.els.iter() {
        match el {
            DeltaElement::Copy(from, to) => {
                if old_pos < *from {
                    changed.push(new_pos..new_pos);
                }
                new_pos += to - from;
                old_pos = *to;
            }
            DeltaElement::Insert(inserted) => {
                changed.push(new_pos..new_pos + inserted.len());
                new_pos += inserted.len();
            }
        }
    }
    if old_pos < delta.base_len {
        changed.push(new_pos..new_pos);
    }
    changed
}
