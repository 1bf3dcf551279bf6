//! Lexical analyzer for FIR text.
//!
//! Converts source text into a sequence of [`Token`]s. FIR is layout
//! sensitive, so besides words, numbers, strings and punctuation the lexer
//! emits [`FirToken::Newline`] at the end of every non-blank line and
//! [`FirToken::Indent`] / [`FirToken::Dedent`] when the leading whitespace
//! grows or shrinks. Blank lines and `;` comments produce nothing. Errors are
//! reported to the [`DiagnosticSink`] with code E001 and produce
//! [`FirToken::Error`] tokens.

use crate::token::{FirToken, Token};
use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use fir_source::Info;

/// The code of every lexical error.
pub const LEX_ERROR: DiagnosticCode = DiagnosticCode::error(1);

/// Lexes FIR source text into a vector of tokens.
///
/// The returned vector is balanced (every `Indent` has a matching `Dedent`)
/// and always ends with [`FirToken::Eof`]. `file` is only used to locate
/// diagnostics.
pub fn lex(source: &str, file: &str, sink: &DiagnosticSink) -> Vec<Token> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        line: 1,
        line_start: 0,
        file,
        sink,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: u32,
    line_start: usize,
    file: &'a str,
    sink: &'a DiagnosticSink,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut indents = vec![0usize];
        let mut at_line_start = true;

        loop {
            if at_line_start {
                let width = self.measure_indent();
                match self.peek() {
                    0 if self.at_end() => break,
                    b'\n' | b'\r' | b';' => {
                        self.skip_line();
                        continue;
                    }
                    _ => {}
                }
                at_line_start = false;
                self.layout(width, &mut indents, &mut tokens);
            }

            self.skip_inline_whitespace();
            if self.at_end() {
                break;
            }
            match self.peek() {
                b';' => self.skip_comment(),
                b'\n' => {
                    tokens.push(self.token(FirToken::Newline, self.pos));
                    self.newline();
                    at_line_start = true;
                }
                _ => tokens.push(self.next_token()),
            }
        }

        if !at_line_start {
            tokens.push(self.token(FirToken::Newline, self.pos));
        }
        while indents.len() > 1 {
            indents.pop();
            tokens.push(self.token(FirToken::Dedent, self.pos));
        }
        tokens.push(self.token(FirToken::Eof, self.pos));
        tokens
    }

    /// Emits the `Indent`/`Dedent` tokens for a line starting at `width`.
    fn layout(&mut self, width: usize, indents: &mut Vec<usize>, tokens: &mut Vec<Token>) {
        let current = indents.last().copied().unwrap_or(0);
        if width > current {
            indents.push(width);
            tokens.push(self.token(FirToken::Indent, self.pos));
            return;
        }
        while indents.len() > 1 && indents.last().is_some_and(|&w| w > width) {
            indents.pop();
            tokens.push(self.token(FirToken::Dedent, self.pos));
        }
        if indents.last().copied().unwrap_or(0) != width {
            self.error("indentation does not match any enclosing level", self.pos);
            indents.push(width);
            tokens.push(self.token(FirToken::Indent, self.pos));
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn col(&self, pos: usize) -> u32 {
        (pos - self.line_start + 1) as u32
    }

    fn token(&self, kind: FirToken, start: usize) -> Token {
        Token {
            kind,
            start,
            end: self.pos,
            line: self.line,
            col: self.col(start),
        }
    }

    fn error(&self, msg: &str, at: usize) {
        self.sink.emit(Diagnostic::error(
            LEX_ERROR,
            msg,
            Info::at(self.file, self.line, self.col(at)),
        ));
    }

    fn newline(&mut self) {
        self.pos += 1;
        self.line += 1;
        self.line_start = self.pos;
    }

    fn measure_indent(&mut self) -> usize {
        let start = self.pos;
        while self.peek() == b' ' || self.peek() == b'\t' {
            if self.peek() == b'\t' {
                self.error("tab in indentation; use spaces", self.pos);
            }
            self.pos += 1;
        }
        self.pos - start
    }

    fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek(), b' ' | b'\t' | b'\r') {
            self.pos += 1;
        }
    }

    fn skip_comment(&mut self) {
        while !self.at_end() && self.peek() != b'\n' {
            self.pos += 1;
        }
    }

    /// Skips a blank or comment-only line, including its newline.
    fn skip_line(&mut self) {
        self.skip_comment();
        if !self.at_end() {
            self.newline();
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();

        if is_ident_start(b) {
            return self.lex_identifier(start);
        }
        if b.is_ascii_digit() || (b == b'-' && self.peek_at(1).is_ascii_digit()) {
            return self.lex_number(start);
        }
        if b == b'"' {
            return self.lex_string(start);
        }
        if b == b'@' && self.peek_at(1) == b'[' {
            return self.lex_info(start);
        }
        self.lex_punct(start)
    }

    fn lex_identifier(&mut self, start: usize) -> Token {
        loop {
            let b = self.peek();
            if is_ident_char(b) {
                self.pos += 1;
            } else if b == b'-' && self.peek_at(1).is_ascii_alphabetic() {
                // memory field names such as `data-type`
                self.pos += 1;
            } else {
                break;
            }
        }
        self.token(FirToken::Identifier, start)
    }

    fn lex_number(&mut self, start: usize) -> Token {
        if self.peek() == b'-' {
            self.pos += 1;
        }
        while self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        if is_ident_start(self.peek()) {
            while is_ident_char(self.peek()) {
                self.pos += 1;
            }
            self.error("malformed number", start);
            return self.token(FirToken::Error, start);
        }
        self.token(FirToken::IntLiteral, start)
    }

    fn lex_string(&mut self, start: usize) -> Token {
        self.pos += 1;
        loop {
            match self.peek() {
                b'\n' => {
                    self.error("unterminated string literal", start);
                    return self.token(FirToken::Error, start);
                }
                0 if self.at_end() => {
                    self.error("unterminated string literal", start);
                    return self.token(FirToken::Error, start);
                }
                b'\\' => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    return self.token(FirToken::StringLiteral, start);
                }
                _ => self.pos += 1,
            }
        }
    }

    fn lex_info(&mut self, start: usize) -> Token {
        self.pos += 2;
        loop {
            match self.peek() {
                b'\n' => {
                    self.error("unterminated location `@[`", start);
                    return self.token(FirToken::Error, start);
                }
                0 if self.at_end() => {
                    self.error("unterminated location `@[`", start);
                    return self.token(FirToken::Error, start);
                }
                b'\\' if self.peek_at(1) != b'\n' => self.pos += 2,
                b']' => {
                    self.pos += 1;
                    return self.token(FirToken::Info, start);
                }
                _ => self.pos += 1,
            }
        }
    }

    fn lex_punct(&mut self, start: usize) -> Token {
        let b = self.peek();
        self.pos += 1;
        let kind = match b {
            b':' => FirToken::Colon,
            b',' => FirToken::Comma,
            b'.' => FirToken::Dot,
            b'(' => FirToken::LeftParen,
            b')' => FirToken::RightParen,
            b'[' => FirToken::LeftBracket,
            b']' => FirToken::RightBracket,
            b'{' => FirToken::LeftBrace,
            b'}' => FirToken::RightBrace,
            b'?' => FirToken::Question,
            b'>' => FirToken::Greater,
            b'=' => {
                if self.peek() == b'>' {
                    self.pos += 1;
                    FirToken::FatArrow
                } else {
                    FirToken::Equals
                }
            }
            b'<' => match self.peek() {
                b'=' => {
                    self.pos += 1;
                    FirToken::Connect
                }
                b'-' => {
                    self.pos += 1;
                    FirToken::PartialConnect
                }
                _ => FirToken::Less,
            },
            _ => {
                // step over the whole UTF-8 sequence
                while !self.at_end() && (self.peek() & 0xC0) == 0x80 {
                    self.pos += 1;
                }
                self.error("unexpected character", start);
                FirToken::Error
            }
        };
        self.token(kind, start)
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Decodes the escapes of a string literal's content (quotes excluded).
pub fn unescape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
