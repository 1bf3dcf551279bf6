//! E104: Duplicate field. Bundle field names must be unique.

use std::collections::HashSet;

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::{Circuit, DefModule, Type};
use fir_source::Info;

use crate::helpers::{declared_type, for_each_module_expr};
use crate::CheckRule;

/// Detects bundle types with two fields of the same name.
///
/// Port types, declared types and the types carried by expressions are all
/// inspected, at any nesting depth.
pub struct DuplicateField;

impl DuplicateField {
    fn report(&self, what: &str, tpe: &Type, info: &Info, sink: &DiagnosticSink) {
        for field in tpe.duplicate_field_names() {
            sink.emit(
                Diagnostic::error(
                    self.code(),
                    format!("bundle field `{field}` is repeated in the type of {what}"),
                    info.clone(),
                )
                .with_label(Label::primary(info.clone(), "type declared here"))
                .with_help("rename one of the fields"),
            );
        }
    }
}

impl CheckRule for DuplicateField {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::error(104)
    }

    fn name(&self) -> &str {
        "duplicate-field"
    }

    fn description(&self) -> &str {
        "bundle type with repeated field names"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &DefModule, _circuit: &Circuit, sink: &DiagnosticSink) {
        for port in module.ports() {
            self.report(&format!("port `{}`", port.name), &port.tpe, &port.info, sink);
        }
        let Some(body) = module.body() else {
            return;
        };
        for decl in body.declarations() {
            if let (Some(tpe), Some(name)) = (declared_type(decl), decl.name()) {
                self.report(&format!("`{name}`"), tpe, decl.info(), sink);
            }
        }

        // A typed expression tree repeats its operand's type at every level,
        // so report each distinct bad type once per statement.
        let mut reported: HashSet<(Info, Type)> = HashSet::new();
        for_each_module_expr(module, &mut |expr, stmt| {
            let tpe = expr.tpe();
            if !expr.is_literal()
                && !tpe.duplicate_field_names().is_empty()
                && reported.insert((stmt.info().clone(), tpe.clone()))
            {
                self.report(&format!("expression `{expr}`"), &tpe, stmt.info(), sink);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::{parse, run};
    use fir_ir::{Expression, Field, Port, Statement};

    fn bad_bundle() -> Type {
        Type::Bundle(vec![Field::new("x", Type::uint(1)), Field::new("x", Type::Clock)])
    }

    #[test]
    fn unique_fields_are_silent() {
        let c = parse("circuit T :\n  module T :\n    input io : {x : UInt<1>, y : {x : UInt<1>}}\n");
        assert!(run(&DuplicateField, &c).is_empty());
    }

    #[test]
    fn repeated_port_field_fires() {
        let c = parse("circuit T :\n  module T :\n    input io : {x : UInt<1>, flip x : UInt<2>}\n");
        let diags = run(&DuplicateField, &c);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("`x`"));
        assert!(diags[0].message.contains("port `io`"));
    }

    #[test]
    fn nested_declaration_fires() {
        let c = parse(
            "circuit T :\n  module T :\n    when c :\n      wire w : {a : {b : UInt, b : UInt}[2]}\n",
        );
        let diags = run(&DuplicateField, &c);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("`b`"));
    }

    #[test]
    fn typed_expression_fires_once() {
        let r = Expression::reference("r", bad_bundle());
        let body = Statement::Block(vec![Statement::node("n", r.clone().field("x"))]);
        let c = Circuit::new(
            "T",
            vec![DefModule::module("T", vec![Port::input("p", Type::Clock)], body)],
        );
        let diags = run(&DuplicateField, &c);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("expression `r`"));
    }
}
