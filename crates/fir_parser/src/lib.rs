//! Hand-rolled recursive descent parser for FIR text.
//!
//! Reads the canonical text produced by [`fir_ir::serialize`] back into a
//! [`Circuit`]. For every circuit `c`, parsing `serialize_circuit(&c)` yields
//! `c.canonical()`.
//!
//! # Architecture
//!
//! - **Lexer** ([`lexer`]): Converts source text to tokens, including the
//!   `Indent`/`Dedent`/`Newline` tokens that carry the block structure.
//! - **Parser** ([`parser`]): Recursive descent with line-based recovery, so
//!   one run reports every independent error.
//!
//! Errors are [`Diagnostic`]s with code E001 (lexical) or E002 (syntax),
//! located with an [`Info`](fir_source::Info) in the `file line:col` form.

#![warn(missing_docs)]

mod expr;
/// Lexical analyzer for FIR text.
pub mod lexer;
/// Recursive descent parser for FIR text.
pub mod parser;
mod stmt;
/// Token types for the FIR lexer.
pub mod token;

pub use lexer::LEX_ERROR;
pub use parser::{FirParser, SYNTAX_ERROR};
pub use token::{FirToken, Token};

use fir_diagnostics::{Diagnostic, DiagnosticSink};
use fir_ir::Circuit;

/// Parses FIR text into a circuit.
///
/// Errors are reported to `sink`; `None` is returned if there were any.
/// `file` names the source in diagnostics.
pub fn parse_circuit(source: &str, file: &str, sink: &DiagnosticSink) -> Option<Circuit> {
    let tokens = lexer::lex(source, file, sink);
    let mut parser = FirParser::new(tokens, source, file, sink);
    parser.parse_circuit()
}

/// The diagnostics of a failed [`parse_str`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", summary(.diagnostics))]
pub struct ParseError {
    /// Every error reported, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

fn summary(diagnostics: &[Diagnostic]) -> String {
    match diagnostics.first() {
        None => "parse failed".to_string(),
        Some(first) => {
            let at = first
                .info
                .location()
                .map(|l| format!(" at {}", l.to_diagnostic_string()))
                .unwrap_or_default();
            let more = match diagnostics.len() {
                1 => String::new(),
                n => format!(" (and {} more)", n - 1),
            };
            format!("{}{at}{more}", first.message)
        }
    }
}

/// Parses FIR text held in memory, collecting diagnostics into the error.
pub fn parse_str(source: &str) -> Result<Circuit, ParseError> {
    let sink = DiagnosticSink::new();
    match parse_circuit(source, "<string>", &sink) {
        Some(circuit) => Ok(circuit),
        None => Err(ParseError {
            diagnostics: sink.take_all(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fir_ir::{
        serialize_circuit, DefModule, Direction, Expression, Port, PrimOp, Statement, Type,
        Width,
    };
    use fir_source::Info;

    fn parse_ok(source: &str) -> Circuit {
        match parse_str(source) {
            Ok(c) => c,
            Err(e) => panic!(
                "unexpected errors: {:?}",
                e.diagnostics.iter().map(|d| &d.message).collect::<Vec<_>>()
            ),
        }
    }

    fn body(c: &Circuit) -> &[Statement] {
        match c.modules[0].body() {
            Some(Statement::Block(stmts)) => stmts,
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn minimal_circuit() {
        let c = parse_ok("circuit Top :\n  module Top :\n    skip\n");
        assert_eq!(c.main, "Top");
        assert_eq!(c.modules.len(), 1);
        assert!(body(&c).is_empty());
    }

    #[test]
    fn ports_and_connect() {
        let src = "circuit Top :\n  module Top :\n    input a : UInt<8>\n    output b : UInt<8>\n\n    b <= a\n";
        let c = parse_ok(src);
        let ports = c.modules[0].ports();
        assert_eq!(ports[0], Port::new("a", Direction::Input, Type::uint(8)));
        assert_eq!(ports[1].direction, Direction::Output);
        assert_eq!(
            body(&c),
            &[Statement::connect(Expression::untyped("b"), Expression::untyped("a"))]
        );
    }

    #[test]
    fn infos_are_kept() {
        let src = "circuit Top : @[top.scala 1:1]\n  module Top : @[top.scala 2:3]\n    wire w : Clock @[odd \\] text]\n";
        let c = parse_ok(src);
        assert_eq!(c.info, Info::new("top.scala 1:1"));
        assert_eq!(c.modules[0].info(), &Info::new("top.scala 2:3"));
        assert_eq!(body(&c)[0].info(), &Info::new("odd ] text"));
    }

    #[test]
    fn keywords_as_component_names() {
        let src = "circuit T :\n  module T :\n    input reset : UInt<1>\n    wire stop : UInt<1>\n    stop <= reset\n    node is = stop\n";
        let c = parse_ok(src);
        let stmts = body(&c);
        assert_eq!(stmts[0].name(), Some("stop"));
        assert!(matches!(stmts[1], Statement::Connect { .. }));
        assert_eq!(stmts[2].name(), Some("is"));
    }

    #[test]
    fn invalidated_keyword_names() {
        let src = "circuit T :\n  module T :\n    input input : UInt<1>\n    output output : UInt<1>\n    wire is : UInt<1>\n    input is invalid\n    output is invalid\n    is is invalid\n    wire is invalid\n";
        let c = parse_ok(src);
        assert_eq!(c.modules[0].ports().len(), 2);
        let stmts = body(&c);
        assert_eq!(stmts[0], Statement::wire("is", Type::uint(1)));
        let invalidated: Vec<String> = stmts[1..]
            .iter()
            .map(|s| match s {
                Statement::IsInvalid { expr, .. } => expr.to_string(),
                other => panic!("not an invalidation: {other:?}"),
            })
            .collect();
        assert_eq!(invalidated, vec!["input", "output", "is", "wire"]);
    }

    #[test]
    fn expressions() {
        let src = "circuit T :\n  module T :\n    node n = bits(mux(c, a.b[3], v[i]), 7, 0)\n    node m = validif(c, SInt<4>(-8))\n    node h = UInt<8>(\"hff\")\n";
        let c = parse_ok(src);
        let stmts = body(&c);
        let Statement::DefNode { value, .. } = &stmts[0] else {
            panic!("not a node");
        };
        assert_eq!(value.to_string(), "bits(mux(c, a.b[3], v[i]), 7, 0)");
        let Statement::DefNode { value: Expression::DoPrim { op, consts, .. }, .. } = &stmts[0] else {
            panic!("not a primop");
        };
        assert_eq!(*op, PrimOp::Bits);
        assert_eq!(consts.len(), 2);
        let Statement::DefNode { value, .. } = &stmts[2] else {
            panic!("not a node");
        };
        assert_eq!(value, &Expression::uint(255, Width::known(8)));
    }

    #[test]
    fn when_else_chain() {
        let src = "circuit T :\n  module T :\n    when a :\n      o <= x\n    else when b :\n      o <= y\n    else :\n      skip\n";
        let c = parse_ok(src);
        let Statement::Conditionally { alt, conseq, .. } = &body(&c)[0] else {
            panic!("not a conditional");
        };
        assert_eq!(conseq.as_ref(), &Statement::Block(vec![Statement::connect(
            Expression::untyped("o"),
            Expression::untyped("x")
        )]));
        let Statement::Conditionally { alt: inner_alt, .. } = alt.as_ref() else {
            panic!("else when lost");
        };
        assert_eq!(inner_alt.as_ref(), &Statement::Empty);
    }

    #[test]
    fn memory_and_register() {
        let src = "circuit T :\n  module T :\n    reg r : UInt<8>, clock with : (reset => (rst, UInt<8>(0)))\n    reg q : UInt<8>, clock\n    mem m :\n      data-type => UInt<8>\n      depth => 16\n      read-latency => 0\n      write-latency => 1\n      reader => r0 r1\n      writer => w0\n";
        let c = parse_ok(src);
        let stmts = body(&c);
        let Statement::DefRegister { init, .. } = &stmts[1] else {
            panic!("not a register");
        };
        assert_eq!(init, &Expression::untyped("q"));
        let Statement::DefMemory { depth, readers, writers, .. } = &stmts[2] else {
            panic!("not a memory");
        };
        assert_eq!(*depth, 16);
        assert_eq!(readers, &vec!["r0".to_string(), "r1".to_string()]);
        assert_eq!(writers, &vec!["w0".to_string()]);
    }

    #[test]
    fn ext_module_with_body_is_rejected() {
        let err = parse_str("circuit T :\n  extmodule T :\n    input a : Clock\n    wire w : Clock\n").unwrap_err();
        assert_eq!(err.diagnostics.len(), 1);
        assert!(err.diagnostics[0].message.contains("ports only"));
    }

    #[test]
    fn errors_are_located_and_recovered() {
        let src = "circuit T :\n  module T :\n    wire a UInt\n    node b = \n    a <= b\n";
        let err = parse_str(src).unwrap_err();
        assert_eq!(err.diagnostics.len(), 2);
        assert_eq!(err.diagnostics[0].code, SYNTAX_ERROR);
        assert_eq!(err.diagnostics[0].info, Info::at("<string>", 3, 12));
        assert!(err.diagnostics[0].message.starts_with("expected `:`"));
        assert_eq!(err.diagnostics[1].info.location().map(|l| l.line), Some(4));
        assert!(err.to_string().contains("(and 1 more)"));
    }

    #[test]
    fn missing_memory_fields() {
        let src = "circuit T :\n  module T :\n    mem m :\n      depth => 4\n";
        let err = parse_str(src).unwrap_err();
        assert!(err.diagnostics[0].message.contains("data-type"));
    }

    #[test]
    fn unknown_primop() {
        let err = parse_str("circuit T :\n  module T :\n    node n = frob(a)\n").unwrap_err();
        assert!(err.diagnostics[0].message.contains("frob"));
    }

    #[test]
    fn round_trip_of_canonical_module() {
        let c = Circuit::new(
            "T",
            vec![DefModule::module(
                "T",
                vec![Port::input("a", Type::uint(8))],
                Statement::Block(vec![
                    Statement::wire("w", Type::Unknown),
                    Statement::connect(Expression::untyped("w"), Expression::untyped("a")),
                ]),
            )],
        );
        assert_eq!(parse_ok(&serialize_circuit(&c)), c);
    }
}
