//! Serialize-then-parse properties over constructed and parsed circuits.

use fir_conformance::{corpus, passthrough, reparse};
use fir_ir::{DefModule, Expression, Info, Port, Statement, Type};

#[test]
fn corpus_roundtrips_to_canonical_form() {
    for (name, circuit) in corpus() {
        assert_eq!(reparse(&circuit), circuit.canonical(), "corpus entry `{name}`");
    }
}

#[test]
fn canonical_text_is_a_fixed_point() {
    for (name, circuit) in corpus() {
        let once = reparse(&circuit);
        let twice = reparse(&once);
        assert_eq!(once, twice, "corpus entry `{name}`");
        assert_eq!(once.to_string(), twice.to_string(), "corpus entry `{name}`");
    }
}

#[test]
fn untyped_circuits_roundtrip_exactly() {
    let circuit = passthrough();
    assert_eq!(circuit.canonical(), circuit);
    assert_eq!(reparse(&circuit), circuit);
}

#[test]
fn passthrough_end_to_end() {
    let circuit = passthrough();
    let text = circuit.to_string();
    assert_eq!(
        text,
        "circuit Top :\n  module Top :\n    input a : UInt<8>\n    output b : UInt<8>\n\n    b <= a\n"
    );
    let parsed = fir_parser::parse_str(&text).unwrap();
    assert_eq!(parsed.module("Top"), circuit.module("Top"));
}

#[test]
fn infos_survive_the_roundtrip() {
    let circuit = fir_ir::Circuit::new(
        "Top",
        vec![DefModule::module(
            "Top",
            vec![Port::input("a", Type::uint(1)).with_info(Info::at("a.scala", 1, 2))],
            Statement::Block(vec![Statement::DefNode {
                info: Info::new("b.scala 3:4"),
                name: "n".into(),
                value: Expression::untyped("a"),
            }]),
        )],
    );
    let parsed = reparse(&circuit);
    assert_eq!(parsed, circuit);
    let port = &parsed.module("Top").unwrap().ports()[0];
    assert_eq!(port.info, Info::at("a.scala", 1, 2));
}

#[test]
fn infos_with_escapes_and_line_breaks() {
    let info = Info::new("a]b\\c\nd\r\ne");
    let circuit = fir_ir::Circuit {
        info: info.clone(),
        main: "Top".into(),
        modules: vec![DefModule::module(
            "Top",
            vec![],
            Statement::Block(vec![
                Statement::DefWire {
                    info: info.clone(),
                    name: "w".into(),
                    tpe: Type::uint(1),
                },
                Statement::wire("after", Type::uint(1)),
            ]),
        )],
    };
    let text = circuit.to_string();
    assert_eq!(text.lines().count(), 4, "{text}");
    let parsed = reparse(&circuit);
    assert_eq!(parsed, circuit);
    assert_eq!(parsed.info, info);
}

#[test]
fn typed_expressions_lose_their_types() {
    let circuit = fir_ir::Circuit::new(
        "Top",
        vec![DefModule::module(
            "Top",
            vec![
                Port::input("a", Type::uint(8)),
                Port::output("b", Type::uint(8)),
            ],
            Statement::Block(vec![Statement::connect(
                Expression::reference("b", Type::uint(8)),
                Expression::reference("a", Type::uint(8)),
            )]),
        )],
    );
    assert_ne!(reparse(&circuit), circuit);
    assert_eq!(reparse(&circuit), passthrough());
}
