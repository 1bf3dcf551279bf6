//! Core parser infrastructure and the circuit, module, port and type rules.
//!
//! The [`FirParser`] struct provides the primitive operations (advance,
//! expect, eat) and line-based error recovery. Statements and expressions are
//! parsed in sibling modules that extend the same struct.

use crate::token::{lookup_keyword, FirToken, Keyword, Token};
use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label};
use fir_ir::{Circuit, DefModule, Direction, Field, Orientation, Port, Statement, Type, Width};
use fir_source::Info;
use std::str::FromStr;

/// The code of every syntax error.
pub const SYNTAX_ERROR: DiagnosticCode = DiagnosticCode::error(2);

/// Marker for a rule that has reported an error and gave up on its line.
#[derive(Debug)]
pub(crate) struct Abort;

pub(crate) type PResult<T> = Result<T, Abort>;

/// A recursive descent parser for FIR text.
///
/// The parser consumes the token stream produced by the lexer. Errors are
/// reported to the diagnostic sink; the offending line (and any block nested
/// under it) is skipped and parsing continues, so one pass reports every
/// independent error.
pub struct FirParser<'src> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) source: &'src str,
    file: &'src str,
    pub(crate) sink: &'src DiagnosticSink,
}

impl<'src> FirParser<'src> {
    /// Creates a parser over `tokens`, which must have been lexed from `source`.
    ///
    /// `file` names the source in diagnostics.
    pub fn new(
        tokens: Vec<Token>,
        source: &'src str,
        file: &'src str,
        sink: &'src DiagnosticSink,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
            file,
            sink,
        }
    }

    // ========================================================================
    // Primitive operations
    // ========================================================================

    pub(crate) fn current(&self) -> FirToken {
        self.peek_kind(0)
    }

    fn current_token(&self) -> Token {
        let idx = self.pos.min(self.tokens.len().saturating_sub(1));
        self.tokens[idx]
    }

    pub(crate) fn current_text(&self) -> &'src str {
        let tok = self.current_token();
        &self.source[tok.start..tok.end]
    }

    /// Returns `true` if the token `offset` places ahead spells `word`.
    pub(crate) fn word_at(&self, offset: usize, word: &str) -> bool {
        self.tokens
            .get(self.pos + offset)
            .is_some_and(|t| &self.source[t.start..t.end] == word)
    }

    /// Returns `true` if the current word is the subject of `is invalid`.
    pub(crate) fn at_invalidation(&self) -> bool {
        self.word_at(1, "is") && self.word_at(2, "invalid")
    }

    pub(crate) fn peek_kind(&self, offset: usize) -> FirToken {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(FirToken::Eof)
    }

    pub(crate) fn at(&self, kind: FirToken) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.at(FirToken::Eof)
    }

    pub(crate) fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    pub(crate) fn eat(&mut self, kind: FirToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: FirToken, what: &str) -> PResult<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.expected(what))
        }
    }

    /// The keyword spelled by the current token, if it is a word.
    pub(crate) fn keyword(&self) -> Option<Keyword> {
        if self.at(FirToken::Identifier) {
            lookup_keyword(self.current_text())
        } else {
            None
        }
    }

    pub(crate) fn at_keyword(&self, kw: Keyword) -> bool {
        self.keyword() == Some(kw)
    }

    pub(crate) fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.at_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_keyword(&mut self, kw: Keyword, what: &str) -> PResult<()> {
        if self.eat_keyword(kw) {
            Ok(())
        } else {
            Err(self.expected(what))
        }
    }

    pub(crate) fn expect_ident(&mut self, what: &str) -> PResult<String> {
        if self.at(FirToken::Identifier) {
            let name = self.current_text().to_string();
            self.advance();
            Ok(name)
        } else {
            Err(self.expected(what))
        }
    }

    /// An identifier, or a run of decimal digits, naming a bundle field.
    pub(crate) fn expect_field_name(&mut self) -> PResult<String> {
        let text = self.current_text();
        if self.at(FirToken::IntLiteral) && text.bytes().all(|b| b.is_ascii_digit()) {
            let name = text.to_string();
            self.advance();
            Ok(name)
        } else {
            self.expect_ident("field name")
        }
    }

    /// Parses an integer token into any integer type, reporting overflow.
    pub(crate) fn expect_int<T: FromStr>(&mut self, what: &str) -> PResult<T> {
        if !self.at(FirToken::IntLiteral) {
            return Err(self.expected(what));
        }
        match self.current_text().parse::<T>() {
            Ok(value) => {
                self.advance();
                Ok(value)
            }
            Err(_) => Err(self.error(&format!(
                "{what} `{}` is out of range",
                self.current_text()
            ))),
        }
    }

    /// Parses an optional `@[...]` location.
    pub(crate) fn parse_info(&mut self) -> Info {
        if !self.at(FirToken::Info) {
            return Info::NoInfo;
        }
        let text = self.current_text();
        let inner = &text[2..text.len() - 1];
        self.advance();
        Info::new(fir_source::info::unescape(inner))
    }

    /// Expects the end of the current line.
    pub(crate) fn end_of_line(&mut self) -> PResult<()> {
        self.expect(FirToken::Newline, "end of line")
    }

    // ========================================================================
    // Error handling and recovery
    // ========================================================================

    /// The position of the current token, for diagnostics.
    pub(crate) fn here(&self) -> Info {
        let tok = self.current_token();
        Info::at(self.file, tok.line, tok.col)
    }

    /// Emits an error at the current position.
    pub(crate) fn error(&self, msg: &str) -> Abort {
        let info = self.here();
        self.sink.emit(
            Diagnostic::error(SYNTAX_ERROR, msg, info.clone()).with_label(Label::primary(info, "here")),
        );
        Abort
    }

    /// Emits an "expected X" error at the current position.
    pub(crate) fn expected(&self, what: &str) -> Abort {
        let found = match self.current() {
            FirToken::Newline => "end of line".to_string(),
            FirToken::Indent => "an indented block".to_string(),
            FirToken::Dedent => "end of block".to_string(),
            FirToken::Eof => "end of file".to_string(),
            _ => format!("`{}`", self.current_text()),
        };
        self.error(&format!("expected {what}, found {found}"))
    }

    /// Skips the rest of the current line and any block nested under it.
    pub(crate) fn recover_line(&mut self) {
        while !matches!(
            self.current(),
            FirToken::Newline | FirToken::Dedent | FirToken::Eof
        ) {
            self.advance();
        }
        self.eat(FirToken::Newline);
        if self.at(FirToken::Indent) {
            self.skip_block();
            // the `else` of a skipped `when` belongs to it
            if self.at_keyword(Keyword::Else) {
                self.recover_line();
            }
        }
    }

    fn skip_block(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.current() {
                FirToken::Indent => depth += 1,
                FirToken::Dedent => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                FirToken::Eof => return,
                _ => {}
            }
            self.advance();
        }
    }

    // ========================================================================
    // Top-level parsing
    // ========================================================================

    /// Parses a complete circuit.
    ///
    /// Returns `None` if any error was reported while parsing.
    pub fn parse_circuit(&mut self) -> Option<Circuit> {
        let errors_before = self.sink.error_count();
        let circuit = self.parse_circuit_inner();
        if self.sink.error_count() > errors_before {
            None
        } else {
            circuit.ok()
        }
    }

    fn parse_circuit_inner(&mut self) -> PResult<Circuit> {
        self.expect_keyword(Keyword::Circuit, "`circuit`")?;
        let main = self.expect_ident("circuit name")?;
        self.expect(FirToken::Colon, "`:`")?;
        let info = self.parse_info();
        self.end_of_line()?;

        let mut modules = Vec::new();
        if self.eat(FirToken::Indent) {
            while !self.at(FirToken::Dedent) && !self.at_eof() {
                match self.parse_module() {
                    Ok(module) => modules.push(module),
                    Err(Abort) => self.recover_line(),
                }
            }
            self.eat(FirToken::Dedent);
        }
        if !self.at_eof() {
            return Err(self.expected("end of file"));
        }

        Ok(Circuit {
            info,
            modules,
            main,
        })
    }

    /// Parses a `module` or `extmodule` with its indented contents.
    fn parse_module(&mut self) -> PResult<DefModule> {
        let external = if self.eat_keyword(Keyword::Module) {
            false
        } else if self.eat_keyword(Keyword::Extmodule) {
            true
        } else {
            return Err(self.expected("`module` or `extmodule`"));
        };
        let name = self.expect_ident("module name")?;
        self.expect(FirToken::Colon, "`:`")?;
        let info = self.parse_info();
        self.end_of_line()?;

        let mut ports = Vec::new();
        let mut body = Vec::new();
        if self.eat(FirToken::Indent) {
            while !self.at(FirToken::Dedent) && !self.at_eof() {
                if self.at_port() {
                    match self.parse_port() {
                        Ok(port) => ports.push(port),
                        Err(Abort) => self.recover_line(),
                    }
                } else if external {
                    self.error("external modules have ports only");
                    self.recover_line();
                } else {
                    self.parse_statement_into(&mut body);
                }
            }
            self.eat(FirToken::Dedent);
        }

        Ok(if external {
            DefModule::ExtModule { info, name, ports }
        } else {
            DefModule::Module {
                info,
                name,
                ports,
                body: Statement::Block(body),
            }
        })
    }

    fn at_port(&self) -> bool {
        matches!(self.keyword(), Some(Keyword::Input | Keyword::Output))
            && self.peek_kind(1) == FirToken::Identifier
            && !self.at_invalidation()
    }

    /// Parses `input|output name : type`.
    fn parse_port(&mut self) -> PResult<Port> {
        let direction = if self.eat_keyword(Keyword::Input) {
            Direction::Input
        } else {
            self.expect_keyword(Keyword::Output, "`input` or `output`")?;
            Direction::Output
        };
        let name = self.expect_ident("port name")?;
        self.expect(FirToken::Colon, "`:`")?;
        let tpe = self.parse_type()?;
        let info = self.parse_info();
        self.end_of_line()?;
        Ok(Port {
            info,
            name,
            direction,
            tpe,
        })
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Parses a type, including any trailing vector sizes.
    pub(crate) fn parse_type(&mut self) -> PResult<Type> {
        let mut tpe = match self.keyword() {
            Some(Keyword::UInt) => {
                self.advance();
                Type::UInt(self.parse_optional_width()?)
            }
            Some(Keyword::SInt) => {
                self.advance();
                Type::SInt(self.parse_optional_width()?)
            }
            Some(Keyword::Clock) => {
                self.advance();
                Type::Clock
            }
            _ if self.eat(FirToken::Question) => Type::Unknown,
            _ if self.at(FirToken::LeftBrace) => self.parse_bundle()?,
            _ => return Err(self.expected("type")),
        };
        while self.eat(FirToken::LeftBracket) {
            let size = self.expect_int::<usize>("vector size")?;
            self.expect(FirToken::RightBracket, "`]`")?;
            tpe = Type::vector(tpe, size);
        }
        Ok(tpe)
    }

    fn parse_bundle(&mut self) -> PResult<Type> {
        self.expect(FirToken::LeftBrace, "`{`")?;
        let mut fields = Vec::new();
        if !self.at(FirToken::RightBrace) {
            loop {
                // `flip : T` is a field named flip
                let flip = if self.at_keyword(Keyword::Flip) && self.peek_kind(1) != FirToken::Colon {
                    self.advance();
                    Orientation::Flip
                } else {
                    Orientation::Default
                };
                let name = self.expect_field_name()?;
                self.expect(FirToken::Colon, "`:`")?;
                let tpe = self.parse_type()?;
                fields.push(Field { name, flip, tpe });
                if !self.eat(FirToken::Comma) {
                    break;
                }
            }
        }
        self.expect(FirToken::RightBrace, "`}`")?;
        Ok(Type::Bundle(fields))
    }

    /// Parses `<n>` if present. `<-n>` lexes as `<-` and yields a negative width.
    pub(crate) fn parse_optional_width(&mut self) -> PResult<Width> {
        let negative = if self.eat(FirToken::Less) {
            false
        } else if self.eat(FirToken::PartialConnect) {
            true
        } else {
            return Ok(Width::Unknown);
        };
        let value = self.expect_int::<fir_ir::BigInt>("width")?;
        self.expect(FirToken::Greater, "`>`")?;
        Ok(Width::Known(if negative { -value } else { value }))
    }
}
