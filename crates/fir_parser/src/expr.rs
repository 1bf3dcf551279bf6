//! Expression parsing.
//!
//! Every parsed expression other than a literal has type `Unknown`; the
//! text carries no expression types.

use crate::parser::{FirParser, PResult};
use crate::token::{FirToken, Keyword};
use fir_ir::{BigInt, Expression, PrimOp, Type};
use num_traits::Num;

impl FirParser<'_> {
    /// Parses an expression with any trailing `.field` and `[index]` accessors.
    pub(crate) fn parse_expr(&mut self) -> PResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(FirToken::Dot) {
                let name = self.expect_field_name()?;
                expr = Expression::SubField {
                    expr: Box::new(expr),
                    name,
                    tpe: Type::Unknown,
                };
            } else if self.eat(FirToken::LeftBracket) {
                expr = if self.at(FirToken::IntLiteral)
                    && self.peek_kind(1) == FirToken::RightBracket
                {
                    let value = self.expect_int::<usize>("index")?;
                    Expression::SubIndex {
                        expr: Box::new(expr),
                        value,
                        tpe: Type::Unknown,
                    }
                } else {
                    let index = self.parse_expr()?;
                    Expression::SubAccess {
                        expr: Box::new(expr),
                        index: Box::new(index),
                        tpe: Type::Unknown,
                    }
                };
                self.expect(FirToken::RightBracket, "`]`")?;
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> PResult<Expression> {
        if !self.at(FirToken::Identifier) {
            return Err(self.expected("expression"));
        }
        let next = self.peek_kind(1);
        let call = next == FirToken::LeftParen;
        match self.keyword() {
            Some(Keyword::UInt | Keyword::SInt)
                if call || matches!(next, FirToken::Less | FirToken::PartialConnect) =>
            {
                return self.parse_literal();
            }
            Some(Keyword::Mux) if call => {
                self.advance();
                self.advance();
                let cond = self.parse_expr()?;
                self.expect(FirToken::Comma, "`,`")?;
                let tval = self.parse_expr()?;
                self.expect(FirToken::Comma, "`,`")?;
                let fval = self.parse_expr()?;
                self.expect(FirToken::RightParen, "`)`")?;
                return Ok(Expression::mux(cond, tval, fval));
            }
            Some(Keyword::Validif) if call => {
                self.advance();
                self.advance();
                let cond = self.parse_expr()?;
                self.expect(FirToken::Comma, "`,`")?;
                let value = self.parse_expr()?;
                self.expect(FirToken::RightParen, "`)`")?;
                return Ok(Expression::valid_if(cond, value));
            }
            _ => {}
        }
        let name = self.current_text();
        if call {
            return match PrimOp::from_name(name) {
                Some(op) => self.parse_prim(op),
                None => Err(self.error(&format!("unknown primitive operation `{name}`"))),
            };
        }
        self.advance();
        Ok(Expression::untyped(name))
    }

    /// `UInt<w>(value)` or `SInt<w>(value)`; the value is decimal or a
    /// quoted radix literal such as `"h2a"`.
    fn parse_literal(&mut self) -> PResult<Expression> {
        let signed = self.at_keyword(Keyword::SInt);
        self.advance();
        let width = self.parse_optional_width()?;
        self.expect(FirToken::LeftParen, "`(`")?;
        let value = match self.current() {
            FirToken::IntLiteral => self.expect_int::<BigInt>("literal value")?,
            FirToken::StringLiteral => {
                let quoted = self.current_text();
                let value = parse_radix_literal(&quoted[1..quoted.len() - 1])
                    .ok_or_else(|| self.error(&format!("malformed literal {quoted}")))?;
                self.advance();
                value
            }
            _ => return Err(self.expected("literal value")),
        };
        self.expect(FirToken::RightParen, "`)`")?;
        Ok(if signed {
            Expression::SIntLiteral { value, width }
        } else {
            Expression::UIntLiteral { value, width }
        })
    }

    /// `op(args..., consts...)`: expression arguments first, then integers.
    fn parse_prim(&mut self, op: PrimOp) -> PResult<Expression> {
        self.advance();
        self.expect(FirToken::LeftParen, "`(`")?;
        let mut args = Vec::new();
        let mut consts = Vec::new();
        if !self.at(FirToken::RightParen) {
            loop {
                if self.at(FirToken::IntLiteral) {
                    consts.push(self.expect_int::<BigInt>("constant")?);
                } else if !consts.is_empty() {
                    return Err(self.error(&format!(
                        "`{op}` takes its expression arguments before its constants"
                    )));
                } else {
                    args.push(self.parse_expr()?);
                }
                if !self.eat(FirToken::Comma) {
                    break;
                }
            }
        }
        self.expect(FirToken::RightParen, "`)`")?;
        Ok(Expression::prim(op, args, consts))
    }
}

/// Parses the content of a quoted literal: a radix letter (`b`, `o`, `d`,
/// `h`) followed by an optionally negative digit string.
fn parse_radix_literal(text: &str) -> Option<BigInt> {
    let mut chars = text.chars();
    let radix = match chars.next()? {
        'b' => 2,
        'o' => 8,
        'd' => 10,
        'h' => 16,
        _ => return None,
    };
    let digits = chars.as_str();
    let (negative, digits) = match digits.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, digits.strip_prefix('+').unwrap_or(digits)),
    };
    if digits.is_empty() {
        return None;
    }
    let value = BigInt::from_str_radix(digits, radix).ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radix_literals() {
        assert_eq!(parse_radix_literal("h2a"), Some(BigInt::from(42)));
        assert_eq!(parse_radix_literal("b1010"), Some(BigInt::from(10)));
        assert_eq!(parse_radix_literal("o17"), Some(BigInt::from(15)));
        assert_eq!(parse_radix_literal("d-42"), Some(BigInt::from(-42)));
        assert_eq!(parse_radix_literal("hFF"), Some(BigInt::from(255)));
        assert_eq!(parse_radix_literal("x12"), None);
        assert_eq!(parse_radix_literal("h"), None);
        assert_eq!(parse_radix_literal("b102"), None);
    }
}
