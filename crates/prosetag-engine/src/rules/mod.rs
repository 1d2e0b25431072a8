//! Thin consumers of the classification query: indentation, paragraph
//! filling, and line breaking.
//!
//! Each rule is pure: it inspects the document and returns a [`RuleOutcome`]
//! instead of mutating anything, leaving the host to apply the edit or fall
//! back to its structured-expression default.

pub mod break_line;
pub mod fill;
pub mod indent;

pub use break_line::{BreakKind, break_line};
pub use fill::fill_paragraph;
pub use indent::indent_line;

use crate::editing::Cmd;

/// What a rule decided for the position it was asked about.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// Not a prose line: the external structured-expression default applies.
    Defer,
    /// Prose line already in the desired shape.
    Unchanged,
    /// Prose-specific behavior, expressed as a command for the host to apply.
    Edit(Cmd),
}
