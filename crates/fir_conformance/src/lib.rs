//! Conformance test helpers for the FIR toolkit.
//!
//! Provides shared pipeline functions that run circuit text through the
//! whole pipeline (parse → validate → wire) and return structured results
//! for assertion in integration tests, plus a corpus of circuits built
//! directly from IR constructors that exercises every node variant.

#![warn(missing_docs)]

use fir_config::CheckConfig;
use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use fir_ir::{
    Annotation, Circuit, CircuitState, DefModule, Expression, Field, Info, Port, PrimOp,
    Statement, Transform, Type, Width,
};
use fir_wiring::{WiringError, WiringTransform};

/// Result of running parse and validation over circuit text.
pub struct PipelineResult {
    /// The parsed circuit, if parsing succeeded.
    pub circuit: Option<Circuit>,
    /// All diagnostics emitted during the pipeline.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    /// Returns `true` if some diagnostic carries `code`.
    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    /// The diagnostics carrying `code`.
    pub fn with_code(&self, code: DiagnosticCode) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.code == code).collect()
    }
}

/// Creates a `CheckConfig` with deny/allow overrides.
pub fn make_config(deny: &[&str], allow: &[&str]) -> CheckConfig {
    CheckConfig {
        deny: deny.iter().map(|s| s.to_string()).collect(),
        allow: allow.iter().map(|s| s.to_string()).collect(),
    }
}

/// Parses and validates `source` with default rule settings.
pub fn full_pipeline(source: &str) -> PipelineResult {
    full_pipeline_with_config(source, &CheckConfig::default())
}

/// Parses and validates `source` with the given rule overrides.
///
/// Validation runs only if parsing reported no errors.
pub fn full_pipeline_with_config(source: &str, config: &CheckConfig) -> PipelineResult {
    let sink = DiagnosticSink::new();
    let circuit = fir_parser::parse_circuit(source, "test.fir", &sink);
    if let Some(ref c) = circuit {
        if !sink.has_errors() {
            fir_check::CheckEngine::new(config).run(c, &sink);
        }
    }
    let diagnostics = sink.take_all();
    let count = |s: Severity| diagnostics.iter().filter(|d| d.severity == s).count();
    PipelineResult {
        circuit,
        has_errors: count(Severity::Error) > 0,
        error_count: count(Severity::Error),
        warning_count: count(Severity::Warning),
        diagnostics,
    }
}

/// Serializes `circuit` and parses the text back.
///
/// # Panics
///
/// Panics with the serialized text if it does not parse.
pub fn reparse(circuit: &Circuit) -> Circuit {
    let text = circuit.to_string();
    match fir_parser::parse_str(&text) {
        Ok(c) => c,
        Err(e) => panic!("serialized circuit does not parse: {e}\n{text}"),
    }
}

/// Parses `source`, checks it validates, and runs the wiring pass.
///
/// # Panics
///
/// Panics if the text does not parse or does not validate.
pub fn wire(source: &str, annotations: Vec<Annotation>) -> Result<CircuitState, WiringError> {
    let circuit = match fir_parser::parse_str(source) {
        Ok(c) => c,
        Err(e) => panic!("wiring input does not parse: {e}"),
    };
    if let Err(diags) = fir_check::validate(&circuit) {
        panic!("wiring input does not validate: {diags:?}");
    }
    WiringTransform::new().execute(&CircuitState::new(circuit, annotations))
}

fn r(name: &str) -> Expression {
    Expression::untyped(name)
}

fn connect(loc: Expression, expr: Expression) -> Statement {
    Statement::connect(loc, expr)
}

/// A module with one input `a: UInt<8>`, one output `b: UInt<8>` and `b <= a`.
pub fn passthrough() -> Circuit {
    Circuit::new(
        "Top",
        vec![DefModule::module(
            "Top",
            vec![
                Port::input("a", Type::uint(8)),
                Port::output("b", Type::uint(8)),
            ],
            Statement::Block(vec![connect(r("b"), r("a"))]),
        )],
    )
}

fn every_primop() -> Vec<Statement> {
    let a = || r("a");
    let b = || r("b");
    let ops: Vec<(PrimOp, Vec<Expression>, Vec<i64>)> = vec![
        (PrimOp::Add, vec![a(), b()], vec![]),
        (PrimOp::Sub, vec![a(), b()], vec![]),
        (PrimOp::Mul, vec![a(), b()], vec![]),
        (PrimOp::Div, vec![a(), b()], vec![]),
        (PrimOp::Rem, vec![a(), b()], vec![]),
        (PrimOp::Lt, vec![a(), b()], vec![]),
        (PrimOp::Leq, vec![a(), b()], vec![]),
        (PrimOp::Gt, vec![a(), b()], vec![]),
        (PrimOp::Geq, vec![a(), b()], vec![]),
        (PrimOp::Eq, vec![a(), b()], vec![]),
        (PrimOp::Neq, vec![a(), b()], vec![]),
        (PrimOp::Pad, vec![a()], vec![16]),
        (PrimOp::AsUInt, vec![a()], vec![]),
        (PrimOp::AsSInt, vec![a()], vec![]),
        (PrimOp::AsClock, vec![a()], vec![]),
        (PrimOp::Shl, vec![a()], vec![2]),
        (PrimOp::Shr, vec![a()], vec![2]),
        (PrimOp::Dshl, vec![a(), b()], vec![]),
        (PrimOp::Dshr, vec![a(), b()], vec![]),
        (PrimOp::Cvt, vec![a()], vec![]),
        (PrimOp::Neg, vec![a()], vec![]),
        (PrimOp::Not, vec![a()], vec![]),
        (PrimOp::And, vec![a(), b()], vec![]),
        (PrimOp::Or, vec![a(), b()], vec![]),
        (PrimOp::Xor, vec![a(), b()], vec![]),
        (PrimOp::Andr, vec![a()], vec![]),
        (PrimOp::Orr, vec![a()], vec![]),
        (PrimOp::Xorr, vec![a()], vec![]),
        (PrimOp::Cat, vec![a(), b()], vec![]),
        (PrimOp::Bits, vec![a()], vec![7, 4]),
        (PrimOp::Head, vec![a()], vec![3]),
        (PrimOp::Tail, vec![a()], vec![3]),
    ];
    ops.into_iter()
        .enumerate()
        .map(|(i, (op, args, consts))| {
            Statement::node(
                format!("n{i}"),
                Expression::prim(op, args, consts.into_iter().map(Into::into).collect()),
            )
        })
        .collect()
}

/// A module whose components are named after words of the text syntax.
fn keyword_names() -> DefModule {
    let words = [
        "is", "invalid", "wire", "reg", "inst", "of", "node", "mem", "when", "else", "skip",
        "stop", "printf", "with", "reset", "module", "UInt",
    ];
    let mut stmts = Vec::new();
    for word in words {
        stmts.push(Statement::wire(word, Type::uint(1)));
        stmts.push(connect(r(word), r("input")));
        stmts.push(Statement::IsInvalid {
            info: Info::NoInfo,
            expr: r(word),
        });
    }
    for port in ["input", "output"] {
        stmts.push(Statement::IsInvalid {
            info: Info::NoInfo,
            expr: r(port),
        });
    }
    DefModule::module(
        "Keywords",
        vec![
            Port::input("input", Type::uint(1)),
            Port::output("output", Type::uint(1)),
        ],
        Statement::Block(stmts),
    )
}

/// Circuits built from IR constructors, covering every statement,
/// expression, type and primitive operator variant.
///
/// Each entry is named for failure messages. Some carry resolved types on
/// expressions, which the text syntax does not record.
pub fn corpus() -> Vec<(&'static str, Circuit)> {
    let bus = Type::Bundle(vec![
        Field::new("data", Type::vector(Type::uint(8), 4)),
        Field::flipped("ready", Type::uint(1)),
        Field::new("tag", Type::SInt(Width::Unknown)),
        Field::new("0", Type::uint(1)),
    ]);
    let ports = vec![
        Port::input("clock", Type::Clock),
        Port::input("reset", Type::uint(1)),
        Port::input("a", Type::uint(8)),
        Port::input("b", Type::UInt(Width::Unknown)),
        Port::output("io", bus.clone()).with_info(Info::at("Top.scala", 3, 7)),
    ];

    let declarations = DefModule::module(
        "Top",
        ports.clone(),
        Statement::Block(vec![
            Statement::wire("w", bus.clone()),
            Statement::DefRegister {
                info: Info::at("Top.scala", 10, 2),
                name: "r".into(),
                tpe: Type::sint(4),
                clock: r("clock"),
                reset: r("reset"),
                init: Expression::sint(-3, Width::known(4)),
            },
            Statement::instance("sub", "Leaf"),
            Statement::DefMemory {
                info: Info::NoInfo,
                name: "m".into(),
                data_type: Type::vector(Type::uint(8), 2),
                depth: 256,
                write_latency: 1,
                read_latency: 0,
                readers: vec!["r0".into(), "r1".into()],
                writers: vec!["w0".into()],
                readwriters: vec!["rw".into()],
            },
            Statement::node(
                "sel",
                Expression::mux(
                    Expression::reference("reset", Type::uint(1)),
                    Expression::uint(5, Width::known(8)),
                    Expression::reference("a", Type::uint(8)),
                ),
            ),
            Statement::node(
                "guarded",
                Expression::valid_if(r("reset"), r("w").field("data").index(2)),
            ),
            Statement::node("dyn", r("w").field("data").access(r("a"))),
            Statement::node("big", Expression::uint(0xdead_beef_u32, Width::Unknown)),
            Statement::wire("$tmp", Type::Clock),
            connect(r("w").field("0"), r("reset")),
            connect(r("io"), r("w")),
            Statement::PartialConnect {
                info: Info::at("Top.scala", 20, 4),
                loc: r("w"),
                expr: r("io"),
            },
            Statement::IsInvalid {
                info: Info::NoInfo,
                expr: r("sub").field("in"),
            },
        ]),
    );

    let control = DefModule::module(
        "Top",
        ports.clone(),
        Statement::Block(vec![
            Statement::when(
                r("reset"),
                Statement::Block(vec![
                    Statement::Stop {
                        info: Info::NoInfo,
                        ret: 1,
                        clk: r("clock"),
                        en: Expression::uint(1, Width::known(1)),
                    },
                    Statement::Empty,
                ]),
                Statement::when(
                    r("a"),
                    Statement::Print {
                        info: Info::at("Top.scala", 30, 6),
                        string: "a=%d b=%x\n\"quoted\"\t\\".into(),
                        args: vec![r("a"), r("b")],
                        clk: r("clock"),
                        en: r("reset"),
                    },
                    Statement::Block(vec![connect(r("io").field("ready"), r("reset"))]),
                ),
            ),
            Statement::when(
                r("reset"),
                Statement::Block(vec![Statement::Block(vec![Statement::wire(
                    "inner",
                    Type::Clock,
                )])]),
                Statement::Empty,
            ),
        ]),
    );

    let leaf = DefModule::ext_module(
        "Leaf",
        vec![
            Port::input("in", Type::uint(4)),
            Port::output("out", Type::vector(Type::Bundle(vec![]), 0)),
        ],
    );

    let ops = DefModule::module(
        "Ops",
        vec![Port::input("a", Type::uint(8)), Port::input("b", Type::uint(8))],
        Statement::Block(every_primop()),
    );

    vec![
        ("passthrough", passthrough()),
        ("declarations", Circuit::new("Top", vec![declarations, leaf.clone()])),
        ("control", Circuit::new("Top", vec![control, leaf.clone()])),
        ("primops", Circuit::new("Ops", vec![ops])),
        ("keyword-names", Circuit::new("Keywords", vec![keyword_names()])),
        (
            "empty-bodies",
            Circuit {
                info: Info::new("generated"),
                main: "Top".into(),
                modules: vec![
                    DefModule::module("Top", vec![], Statement::Empty),
                    DefModule::module(
                        "Other",
                        vec![Port::input("x", Type::Clock)],
                        Statement::Block(vec![]),
                    ),
                    leaf,
                ],
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_pipeline_is_clean() {
        let result = full_pipeline(&passthrough().to_string());
        assert!(!result.has_errors, "{:?}", result.diagnostics);
        assert_eq!(result.warning_count, 0);
        assert_eq!(result.circuit, Some(passthrough()));
    }

    #[test]
    fn corpus_names_are_unique() {
        let names: Vec<&str> = corpus().iter().map(|(n, _)| *n).collect();
        assert!(fir_check::duplicates(names).is_empty());
    }

    #[test]
    fn make_config_copies_lists() {
        let c = make_config(&["unknown-type"], &["W102", "E110"]);
        assert_eq!(c.deny, vec!["unknown-type"]);
        assert_eq!(c.allow.len(), 2);
    }
}
