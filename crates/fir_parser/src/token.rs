//! Token types for the FIR lexer.
//!
//! FIR keywords are contextual: `reset` or `depth` are ordinary signal names
//! outside the construct that gives them meaning. The lexer therefore emits
//! every word as [`FirToken::Identifier`], and the parser asks
//! [`lookup_keyword`] when a position admits a keyword.

use serde::{Deserialize, Serialize};

/// A FIR token kind.
///
/// Token text is not stored; it is sliced from the source with the token's
/// byte range.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum FirToken {
    /// A word: letters, digits, `_`, `$`, and `-` between letters.
    Identifier,
    /// A decimal integer, optionally negative.
    IntLiteral,
    /// A double-quoted string with backslash escapes.
    StringLiteral,
    /// A location suffix `@[...]`.
    Info,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `=`
    Equals,
    /// `=>`
    FatArrow,
    /// `<=`
    Connect,
    /// `<-`
    PartialConnect,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `?`, the unknown type.
    Question,
    /// End of a non-blank line.
    Newline,
    /// A line indented deeper than the previous one.
    Indent,
    /// Return to an enclosing indentation level.
    Dedent,
    /// End of file.
    Eof,
    /// Unrecognized or malformed input.
    Error,
}

/// A word with meaning in some syntactic position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[allow(missing_docs)]
pub enum Keyword {
    Circuit,
    Module,
    Extmodule,
    Input,
    Output,
    Flip,
    UInt,
    SInt,
    Clock,
    Wire,
    Reg,
    With,
    Reset,
    Inst,
    Of,
    Mem,
    Node,
    When,
    Else,
    Skip,
    Is,
    Invalid,
    Stop,
    Printf,
    Mux,
    Validif,
}

/// Looks up a keyword. Keywords are case-sensitive.
pub fn lookup_keyword(s: &str) -> Option<Keyword> {
    match s {
        "circuit" => Some(Keyword::Circuit),
        "module" => Some(Keyword::Module),
        "extmodule" => Some(Keyword::Extmodule),
        "input" => Some(Keyword::Input),
        "output" => Some(Keyword::Output),
        "flip" => Some(Keyword::Flip),
        "UInt" => Some(Keyword::UInt),
        "SInt" => Some(Keyword::SInt),
        "Clock" => Some(Keyword::Clock),
        "wire" => Some(Keyword::Wire),
        "reg" => Some(Keyword::Reg),
        "with" => Some(Keyword::With),
        "reset" => Some(Keyword::Reset),
        "inst" => Some(Keyword::Inst),
        "of" => Some(Keyword::Of),
        "mem" => Some(Keyword::Mem),
        "node" => Some(Keyword::Node),
        "when" => Some(Keyword::When),
        "else" => Some(Keyword::Else),
        "skip" => Some(Keyword::Skip),
        "is" => Some(Keyword::Is),
        "invalid" => Some(Keyword::Invalid),
        "stop" => Some(Keyword::Stop),
        "printf" => Some(Keyword::Printf),
        "mux" => Some(Keyword::Mux),
        "validif" => Some(Keyword::Validif),
        _ => None,
    }
}

impl Keyword {
    /// Returns `true` for keywords that may begin a statement.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            Keyword::Wire
                | Keyword::Reg
                | Keyword::Inst
                | Keyword::Mem
                | Keyword::Node
                | Keyword::When
                | Keyword::Skip
                | Keyword::Stop
                | Keyword::Printf
        )
    }
}

/// A lexed token with its kind and position.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The kind of this token.
    pub kind: FirToken,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub col: u32,
}
