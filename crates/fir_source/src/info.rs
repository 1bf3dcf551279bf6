//! The optional provenance tag carried by IR nodes.

use crate::location::FileLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an IR node came from, if known.
///
/// The text form is an optional `@[...]` suffix on the line that declares the
/// node. The content is opaque; by convention it reads `file line:col`, which
/// [`Info::location`] can parse.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Info {
    /// No location is known.
    #[default]
    NoInfo,
    /// An opaque location string.
    FileInfo(String),
}

impl Info {
    /// Creates an info from an opaque location string.
    ///
    /// An empty string yields [`Info::NoInfo`].
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            Info::NoInfo
        } else {
            Info::FileInfo(text)
        }
    }

    /// Creates an info in the `file line:col` convention.
    pub fn at(file: &str, line: u32, col: u32) -> Self {
        Info::FileInfo(FileLocation::new(file, line, col).to_string())
    }

    /// Returns `true` if no location is known.
    pub fn is_none(&self) -> bool {
        matches!(self, Info::NoInfo)
    }

    /// Returns the raw location text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Info::NoInfo => None,
            Info::FileInfo(text) => Some(text),
        }
    }

    /// Parses the location text as `file line:col`.
    pub fn location(&self) -> Option<FileLocation> {
        self.text().and_then(FileLocation::parse)
    }

    /// Returns the text suffix for this info: `" @[...]"`, or `""` when absent.
    ///
    /// `]` and `\` inside the location are escaped with a backslash so the
    /// suffix can be read back unambiguously.
    pub fn suffix(&self) -> String {
        match self {
            Info::NoInfo => String::new(),
            Info::FileInfo(text) => format!(" @[{}]", escape(text)),
        }
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Info::NoInfo => Ok(()),
            Info::FileInfo(text) => write!(f, "@[{}]", escape(text)),
        }
    }
}

/// Escapes `]` and `\`, and spells line breaks as `\n` and `\r` so the
/// suffix stays on one line.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ']' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Reverses the escaping applied by [`Info::suffix`] to the bracket content.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_info_has_empty_suffix() {
        assert_eq!(Info::NoInfo.suffix(), "");
        assert!(Info::NoInfo.is_none());
        assert_eq!(Info::default(), Info::NoInfo);
    }

    #[test]
    fn empty_text_is_no_info() {
        assert_eq!(Info::new(""), Info::NoInfo);
    }

    #[test]
    fn suffix_format() {
        let info = Info::new("Top.scala 12:4");
        assert_eq!(info.suffix(), " @[Top.scala 12:4]");
        assert_eq!(format!("{info}"), "@[Top.scala 12:4]");
    }

    #[test]
    fn brackets_are_escaped() {
        let info = Info::new(r"a]b\c");
        assert_eq!(info.suffix(), r" @[a\]b\\c]");
        assert_eq!(unescape(r"a\]b\\c"), r"a]b\c");
    }

    #[test]
    fn line_breaks_stay_on_one_line() {
        let info = Info::new("a]b\\c\nd\r");
        let suffix = info.suffix();
        assert_eq!(suffix, r" @[a\]b\\c\nd\r]");
        assert!(!suffix.contains('\n'));
        let content = &suffix[3..suffix.len() - 1];
        assert_eq!(Info::new(unescape(content)), info);
    }

    #[test]
    fn location_parses_convention() {
        let info = Info::at("Top.scala", 3, 9);
        let loc = info.location().unwrap();
        assert_eq!(loc.file, "Top.scala");
        assert_eq!(loc.line, 3);
        assert_eq!(loc.col, 9);
    }

    #[test]
    fn opaque_text_has_no_location() {
        assert!(Info::new("generated").location().is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let info = Info::new("x.fir 1:2");
        let json = serde_json::to_string(&info).unwrap();
        let back: Info = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }
}
