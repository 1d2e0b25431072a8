pub mod classify;
pub mod editing;
pub mod io;
pub mod rope;
pub mod rules;

// Re-export key types for easier usage
pub use classify::{DepthOracle, ScanDepthOracle, Syntax, Tag, TagStore, is_prose_line, reclassify};
pub use editing::{Cmd, Document, Patch, Rescan};
pub use rules::{BreakKind, RuleOutcome, break_line, fill_paragraph, indent_line};
