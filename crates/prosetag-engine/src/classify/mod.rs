//! Paragraph classification: the tag store, the incremental classifier, and
//! the collaborators it consults.
//!
//! The flow on every edit: the host reports the changed range, the
//! classifier rewrites tag store entries for the affected paragraphs and
//! invalidates the depth oracle wherever a tag changed, and only then does
//! the host's tokenizer re-scan run over the same range. Every downstream
//! consumer reads classification through [`query::is_prose_line`].

pub mod boundary;
pub mod classifier;
pub mod oracle;
pub mod query;
pub mod syntax;
pub mod tags;

pub use classifier::reclassify;
pub use oracle::{DepthOracle, ScanDepthOracle};
pub use query::is_prose_line;
pub use syntax::Syntax;
pub use tags::{Tag, TagStore};
