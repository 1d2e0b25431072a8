use serde::{Deserialize, Serialize};

/// Surface syntax the classification heuristics consult.
///
/// Threaded explicitly into every operation rather than living in
/// process-wide state, so two documents with different syntaxes can coexist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Syntax {
    /// Characters that open a nested expression.
    pub open_brackets: Vec<char>,
    /// Characters that close a nested expression. The first entry is the
    /// primary close bracket; the rest are treated identically.
    pub close_brackets: Vec<char>,
    /// Quoting prefix that can precede an open bracket or stand alone at
    /// end of line.
    pub quote_char: char,
    /// First character of a line comment.
    pub comment_marker: char,
    /// String literal delimiter, skipped when counting nesting depth.
    pub string_delim: char,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            open_brackets: vec!['(', '['],
            close_brackets: vec![')', ']'],
            quote_char: '`',
            comment_marker: ';',
            string_delim: '"',
        }
    }
}

impl Syntax {
    pub fn is_open(&self, c: char) -> bool {
        self.open_brackets.contains(&c)
    }

    pub fn is_close(&self, c: char) -> bool {
        self.close_brackets.contains(&c)
    }
}
