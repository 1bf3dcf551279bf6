//! Statement parsing.

use crate::lexer::unescape_string;
use crate::parser::{Abort, FirParser, PResult, SYNTAX_ERROR};
use crate::token::{FirToken, Keyword};
use fir_diagnostics::Diagnostic;
use fir_ir::{Expression, Statement, Type, Width};
use fir_source::Info;

impl FirParser<'_> {
    /// Parses one statement and appends it to `out`.
    ///
    /// `skip` adds nothing. On error the line is skipped.
    pub(crate) fn parse_statement_into(&mut self, out: &mut Vec<Statement>) {
        match self.parse_statement() {
            Ok(Statement::Empty) => {}
            Ok(stmt) => out.push(stmt),
            Err(Abort) => self.recover_line(),
        }
    }

    /// Parses an indented block following a header line.
    pub(crate) fn parse_block(&mut self) -> PResult<Vec<Statement>> {
        if !self.eat(FirToken::Indent) {
            return Err(self.expected("an indented block"));
        }
        let mut stmts = Vec::new();
        while !self.at(FirToken::Dedent) && !self.at_eof() {
            self.parse_statement_into(&mut stmts);
        }
        self.eat(FirToken::Dedent);
        Ok(stmts)
    }

    /// The statement keyword at the current position, if the word is used as one.
    ///
    /// A keyword followed by a connect operator, an accessor or `is invalid`
    /// is a reference to a component that happens to share its name.
    fn statement_keyword(&self) -> Option<Keyword> {
        let kw = self.keyword().filter(|kw| kw.starts_statement())?;
        match self.peek_kind(1) {
            FirToken::Connect
            | FirToken::PartialConnect
            | FirToken::Dot
            | FirToken::LeftBracket => None,
            FirToken::Identifier if self.at_invalidation() => None,
            _ => Some(kw),
        }
    }

    pub(crate) fn parse_statement(&mut self) -> PResult<Statement> {
        let Some(kw) = self.statement_keyword() else {
            return self.parse_connect_like();
        };
        match kw {
            Keyword::Wire => {
                self.advance();
                let name = self.expect_ident("wire name")?;
                self.expect(FirToken::Colon, "`:`")?;
                let tpe = self.parse_type()?;
                let info = self.finish_line()?;
                Ok(Statement::DefWire { info, name, tpe })
            }
            Keyword::Reg => self.parse_register(),
            Keyword::Inst => {
                self.advance();
                let name = self.expect_ident("instance name")?;
                self.expect_keyword(Keyword::Of, "`of`")?;
                let module = self.expect_ident("module name")?;
                let info = self.finish_line()?;
                Ok(Statement::DefInstance { info, name, module })
            }
            Keyword::Mem => self.parse_memory(),
            Keyword::Node => {
                self.advance();
                let name = self.expect_ident("node name")?;
                self.expect(FirToken::Equals, "`=`")?;
                let value = self.parse_expr()?;
                let info = self.finish_line()?;
                Ok(Statement::DefNode { info, name, value })
            }
            Keyword::When => self.parse_when(),
            Keyword::Skip => {
                self.advance();
                self.finish_line()?;
                Ok(Statement::Empty)
            }
            Keyword::Stop => {
                self.advance();
                self.expect(FirToken::LeftParen, "`(`")?;
                let clk = self.parse_expr()?;
                self.expect(FirToken::Comma, "`,`")?;
                let en = self.parse_expr()?;
                self.expect(FirToken::Comma, "`,`")?;
                let ret = self.expect_int::<i32>("return code")?;
                self.expect(FirToken::RightParen, "`)`")?;
                let info = self.finish_line()?;
                Ok(Statement::Stop { info, ret, clk, en })
            }
            Keyword::Printf => {
                self.advance();
                self.expect(FirToken::LeftParen, "`(`")?;
                let clk = self.parse_expr()?;
                self.expect(FirToken::Comma, "`,`")?;
                let en = self.parse_expr()?;
                self.expect(FirToken::Comma, "`,`")?;
                if !self.at(FirToken::StringLiteral) {
                    return Err(self.expected("format string"));
                }
                let quoted = self.current_text();
                let string = unescape_string(&quoted[1..quoted.len() - 1]);
                self.advance();
                let mut args = Vec::new();
                while self.eat(FirToken::Comma) {
                    args.push(self.parse_expr()?);
                }
                self.expect(FirToken::RightParen, "`)`")?;
                let info = self.finish_line()?;
                Ok(Statement::Print {
                    info,
                    string,
                    args,
                    clk,
                    en,
                })
            }
            _ => Err(self.expected("statement")),
        }
    }

    /// Parses an optional location and the end of the line.
    fn finish_line(&mut self) -> PResult<Info> {
        let info = self.parse_info();
        self.end_of_line()?;
        Ok(info)
    }

    /// `loc <= expr`, `loc <- expr` or `expr is invalid`.
    fn parse_connect_like(&mut self) -> PResult<Statement> {
        let loc = self.parse_expr()?;
        if self.eat(FirToken::Connect) {
            let expr = self.parse_expr()?;
            let info = self.finish_line()?;
            Ok(Statement::Connect { info, loc, expr })
        } else if self.eat(FirToken::PartialConnect) {
            let expr = self.parse_expr()?;
            let info = self.finish_line()?;
            Ok(Statement::PartialConnect { info, loc, expr })
        } else if self.eat_keyword(Keyword::Is) {
            self.expect_keyword(Keyword::Invalid, "`invalid`")?;
            let info = self.finish_line()?;
            Ok(Statement::IsInvalid { info, expr: loc })
        } else {
            Err(self.expected("`<=`, `<-` or `is invalid`"))
        }
    }

    /// `reg name : type, clock [with : (reset => (reset, init))]`.
    ///
    /// Without a reset clause the register never resets: its reset is a
    /// constant zero and its init value is itself.
    fn parse_register(&mut self) -> PResult<Statement> {
        self.advance();
        let name = self.expect_ident("register name")?;
        self.expect(FirToken::Colon, "`:`")?;
        let tpe = self.parse_type()?;
        self.expect(FirToken::Comma, "`,`")?;
        let clock = self.parse_expr()?;
        let (reset, init) = if self.eat_keyword(Keyword::With) {
            self.expect(FirToken::Colon, "`:`")?;
            self.expect(FirToken::LeftParen, "`(`")?;
            self.expect_keyword(Keyword::Reset, "`reset`")?;
            self.expect(FirToken::FatArrow, "`=>`")?;
            self.expect(FirToken::LeftParen, "`(`")?;
            let reset = self.parse_expr()?;
            self.expect(FirToken::Comma, "`,`")?;
            let init = self.parse_expr()?;
            self.expect(FirToken::RightParen, "`)`")?;
            self.expect(FirToken::RightParen, "`)`")?;
            (reset, init)
        } else {
            (
                Expression::uint(0, Width::known(1)),
                Expression::untyped(name.clone()),
            )
        };
        let info = self.finish_line()?;
        Ok(Statement::DefRegister {
            info,
            name,
            tpe,
            clock,
            reset,
            init,
        })
    }

    /// `when pred :` block, then an optional `else :` block or `else when` chain.
    fn parse_when(&mut self) -> PResult<Statement> {
        self.expect_keyword(Keyword::When, "`when`")?;
        let pred = self.parse_expr()?;
        self.expect(FirToken::Colon, "`:`")?;
        let info = self.finish_line()?;
        let conseq = Statement::Block(self.parse_block()?);

        let alt = if self.eat_keyword(Keyword::Else) {
            if self.at_keyword(Keyword::When) {
                self.parse_when()?
            } else {
                self.expect(FirToken::Colon, "`:`")?;
                self.finish_line()?;
                let stmts = self.parse_block()?;
                if stmts.is_empty() {
                    Statement::Empty
                } else {
                    Statement::Block(stmts)
                }
            }
        } else {
            Statement::Empty
        };

        Ok(Statement::Conditionally {
            info,
            pred,
            conseq: Box::new(conseq),
            alt: Box::new(alt),
        })
    }

    /// `mem name :` followed by an indented list of `field => value` lines.
    fn parse_memory(&mut self) -> PResult<Statement> {
        self.advance();
        let header = self.here();
        let name = self.expect_ident("memory name")?;
        self.expect(FirToken::Colon, "`:`")?;
        let info = self.finish_line()?;
        if !self.eat(FirToken::Indent) {
            return Err(self.expected("memory fields"));
        }

        let mut fields = MemoryFields::default();
        while !self.at(FirToken::Dedent) && !self.at_eof() {
            if let Err(Abort) = self.parse_memory_field(&mut fields) {
                self.recover_line();
            }
        }
        self.eat(FirToken::Dedent);

        let missing: Vec<&str> = [
            ("data-type", fields.data_type.is_none()),
            ("depth", fields.depth.is_none()),
            ("read-latency", fields.read_latency.is_none()),
            ("write-latency", fields.write_latency.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();
        if !missing.is_empty() {
            // the block is already consumed, so report without aborting the line
            self.sink.emit(Diagnostic::error(
                SYNTAX_ERROR,
                format!("memory `{name}` is missing {}", missing.join(", ")),
                header,
            ));
        }

        Ok(Statement::DefMemory {
            info,
            name,
            data_type: fields.data_type.unwrap_or(Type::Unknown),
            depth: fields.depth.unwrap_or(0),
            write_latency: fields.write_latency.unwrap_or(0),
            read_latency: fields.read_latency.unwrap_or(0),
            readers: fields.readers,
            writers: fields.writers,
            readwriters: fields.readwriters,
        })
    }

    fn parse_memory_field(&mut self, fields: &mut MemoryFields) -> PResult<()> {
        let field = self.expect_ident("memory field")?;
        self.expect(FirToken::FatArrow, "`=>`")?;
        match field.as_str() {
            "data-type" => fields.data_type = Some(self.parse_type()?),
            "depth" => fields.depth = Some(self.expect_int::<u64>("depth")?),
            "read-latency" => fields.read_latency = Some(self.expect_int::<u64>("latency")?),
            "write-latency" => fields.write_latency = Some(self.expect_int::<u64>("latency")?),
            "reader" | "writer" | "readwriter" => {
                let list = match field.as_str() {
                    "reader" => &mut fields.readers,
                    "writer" => &mut fields.writers,
                    _ => &mut fields.readwriters,
                };
                list.push(self.expect_ident("port name")?);
                while self.at(FirToken::Identifier) {
                    list.push(self.current_text().to_string());
                    self.advance();
                }
            }
            other => return Err(self.error(&format!("unknown memory field `{other}`"))),
        }
        self.end_of_line()
    }
}

#[derive(Default)]
struct MemoryFields {
    data_type: Option<Type>,
    depth: Option<u64>,
    read_latency: Option<u64>,
    write_latency: Option<u64>,
    readers: Vec<String>,
    writers: Vec<String>,
    readwriters: Vec<String>,
}
