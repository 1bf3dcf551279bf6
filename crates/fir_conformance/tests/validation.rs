//! Validation through the full parse → check pipeline.
//!
//! Each test runs circuit text through the parser and the check engine and
//! asserts which diagnostics are (or are not) emitted.

use fir_check::{
    CheckRule, DuplicateDeclaration, DuplicateField, DuplicateModule, MainNotFound,
    MalformedLiteral, NegativeWidth, PrimOpArity, RecursiveInstance, UndefinedModule,
    UnknownType, UnreachableModule,
};
use fir_conformance::{corpus, full_pipeline, full_pipeline_with_config, make_config};
use fir_diagnostics::Severity;
use fir_ir::{Circuit, DefModule, Field, Port, Statement, Type};

#[test]
fn main_must_name_a_module() {
    let c = Circuit::new(
        "B",
        vec![DefModule::module("A", vec![], Statement::Block(vec![]))],
    );
    let errs = fir_check::validate(&c).unwrap_err();
    let main = errs
        .iter()
        .find(|d| d.code == MainNotFound.code())
        .expect("E101 expected");
    assert_eq!(main.severity, Severity::Error);
    assert!(main.message.contains("`B`"));
}

#[test]
fn bundle_with_repeated_field_is_detected() {
    let c = Circuit::new(
        "Top",
        vec![DefModule::module(
            "Top",
            vec![],
            Statement::Block(vec![Statement::wire(
                "w",
                Type::Bundle(vec![
                    Field::new("x", Type::uint(1)),
                    Field::flipped("x", Type::Clock),
                ]),
            )]),
        )],
    );
    let errs = fir_check::validate(&c).unwrap_err();
    assert!(errs
        .iter()
        .any(|d| d.code == DuplicateField.code() && d.message.contains("`x`")));
}

#[test]
fn repeated_field_in_text_is_detected() {
    let result = full_pipeline(
        "circuit Top :\n  module Top :\n    input io : {a : UInt<1>, b : {x : Clock, x : Clock}}\n\n    skip\n",
    );
    assert!(result.has_errors);
    assert_eq!(result.with_code(DuplicateField.code()).len(), 1);
}

#[test]
fn corpus_circuits_have_no_errors() {
    for (name, circuit) in corpus() {
        let diags = fir_check::CheckEngine::with_defaults().check(&circuit);
        let errors: Vec<_> = diags.iter().filter(|d| d.severity.is_error()).collect();
        assert!(errors.is_empty(), "corpus entry `{name}`: {errors:?}");
    }
}

#[test]
fn structural_errors_are_all_reported() {
    let src = "\
circuit Top :
  module Top :
    input a : UInt<-1>
    output b : UInt<8>

    wire a : UInt<1>
    inst s of Missing
    inst r of Loop
    node n = add(a)
    node big = UInt<2>(7)
    b <= n
  module Loop :
    inst again of Loop
  module Top :
    skip
";
    let result = full_pipeline(src);
    assert!(result.has_errors);
    for code in [
        DuplicateModule.code(),
        DuplicateDeclaration.code(),
        UndefinedModule.code(),
        RecursiveInstance.code(),
        PrimOpArity.code(),
        MalformedLiteral.code(),
        NegativeWidth.code(),
    ] {
        assert!(result.has_code(code), "expected {code}: {:?}", result.diagnostics);
    }
}

#[test]
fn diagnostics_point_into_the_source() {
    let result = full_pipeline(
        "circuit Top :\n  module Top :\n    inst s of Missing @[Top.scala 12:5]\n",
    );
    let diag = &result.with_code(UndefinedModule.code())[0];
    let loc = diag.info.location().unwrap();
    assert_eq!((loc.file.as_str(), loc.line, loc.col), ("Top.scala", 12, 5));
}

#[test]
fn warnings_do_not_fail_validation() {
    let src = "circuit Top :\n  module Top :\n    wire w : ?\n  module Spare :\n    skip\n";
    let result = full_pipeline(src);
    assert!(!result.has_errors);
    assert_eq!(result.warning_count, 2);
    assert!(result.has_code(UnknownType.code()));
    assert!(result.has_code(UnreachableModule.code()));
}

#[test]
fn deny_and_allow_overrides() {
    let src = "circuit Top :\n  module Top :\n    wire w : ?\n  module Spare :\n    skip\n";

    let denied = full_pipeline_with_config(src, &make_config(&["unknown-type"], &[]));
    assert_eq!(denied.error_count, 1);
    assert_eq!(denied.warning_count, 1);

    let allowed = full_pipeline_with_config(src, &make_config(&[], &["W101", "W102"]));
    assert!(allowed.diagnostics.is_empty());
}

#[test]
fn parse_errors_stop_before_validation() {
    let result = full_pipeline("circuit Top :\n  module Other :\n    node = a\n");
    assert!(result.has_errors);
    assert!(!result.has_code(MainNotFound.code()));
}

#[test]
fn validation_does_not_modify_the_circuit() {
    let c = Circuit::new(
        "Top",
        vec![DefModule::module(
            "Top",
            vec![Port::input("a", Type::uint(1)), Port::input("a", Type::uint(1))],
            Statement::Empty,
        )],
    );
    let before = c.clone();
    let _ = fir_check::validate(&c);
    assert_eq!(c, before);
}

#[test]
fn diagnostics_serialize_as_json() {
    let result = full_pipeline("circuit Top :\n  module Other :\n    skip\n");
    let json = serde_json::to_value(&result.diagnostics).unwrap();
    let first = &json.as_array().unwrap()[0];
    assert_eq!(first["severity"], "error");
    assert!(first["message"].as_str().unwrap().contains("`Top`"));
}
