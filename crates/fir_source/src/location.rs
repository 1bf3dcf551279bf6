//! Structured `file line:col` locations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location resolved to a file name and 1-indexed line/column.
///
/// This is the structured form of the conventional info string
/// `Top.scala 12:4`. The parser produces one for every syntax error and
/// [`Info::at`](crate::Info::at) uses it to build info strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileLocation {
    /// The file name or path.
    pub file: String,
    /// The line number (1-indexed).
    pub line: u32,
    /// The column number (1-indexed).
    pub col: u32,
}

impl FileLocation {
    /// Creates a new location.
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Self {
            file: file.into(),
            line,
            col,
        }
    }

    /// Parses `file line:col`. The file part may itself contain spaces; the
    /// coordinates are taken from the last whitespace-separated word.
    pub fn parse(text: &str) -> Option<Self> {
        let (file, coords) = text.trim().rsplit_once(' ')?;
        let (line, col) = coords.split_once(':')?;
        let file = file.trim();
        if file.is_empty() {
            return None;
        }
        Some(Self {
            file: file.to_string(),
            line: line.parse().ok()?,
            col: col.parse().ok()?,
        })
    }

    /// Formats this location the way terminal diagnostics print it: `file:line:col`.
    pub fn to_diagnostic_string(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.col)
    }
}

impl fmt::Display for FileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.file, self.line, self.col)
    }
}
