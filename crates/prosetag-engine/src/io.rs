use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::Document;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Not valid UTF-8 text: {0}")]
    NotText(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a text file and build a classified document from it.
pub fn read_document(path: &Path) -> Result<Document, IoError> {
    read_document_with_syntax(path, crate::classify::Syntax::default())
}

/// Read a text file and build a classified document with a specific syntax.
pub fn read_document_with_syntax(
    path: &Path,
    syntax: crate::classify::Syntax,
) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(IoError::Io)?;
    Document::with_syntax(&bytes, syntax).map_err(|_| IoError::NotText(path.to_path_buf()))
}

/// Write a document's content back to a file.
pub fn write_document(path: &Path, doc: &Document) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }
    fs::write(path, doc.to_bytes()).map_err(IoError::Io)
}
