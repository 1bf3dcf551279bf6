//! Structural validation of circuits.
//!
//! The IR accepts any tree at construction time. This crate is the separate
//! pass that rejects malformed circuits before a transform runs on them:
//! every check is a [`CheckRule`] registered with the [`CheckEngine`].
//!
//! # Rule Categories
//!
//! - **E-series (errors):** Missing or ambiguous `main`, name collisions,
//!   undefined or recursive instances, malformed primops and literals
//! - **W-series (warnings):** Unresolved type placeholders, modules never
//!   instantiated under `main`

#![warn(missing_docs)]

mod engine;
mod helpers;
mod rules;

pub use engine::CheckEngine;
pub use helpers::{declared_type, duplicates, for_each_module_expr};
pub use rules::register_builtin_rules;
pub use rules::{
    DuplicateDeclaration, DuplicateField, DuplicateModule, DuplicatePort, InvalidMemory,
    MainNotFound, MalformedLiteral, NegativeWidth, PrimOpArity, RecursiveInstance,
    UndefinedModule, UnknownType, UnreachableModule,
};

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use fir_ir::{Circuit, DefModule};

/// A single validation rule.
///
/// Each rule has a unique diagnostic code, a kebab-case name, a description,
/// and a default severity. Rules about the circuit as a whole implement
/// `check_circuit`; rules about one module at a time implement
/// `check_module`, which the engine calls for every module.
pub trait CheckRule: Send + Sync {
    /// Returns the diagnostic code for this rule (e.g., E101, W102).
    fn code(&self) -> DiagnosticCode;

    /// Returns the short kebab-case name of this rule (e.g., "main-not-found").
    fn name(&self) -> &str;

    /// Returns a human-readable description of what this rule checks.
    fn description(&self) -> &str;

    /// Returns the default severity for diagnostics emitted by this rule.
    fn default_severity(&self) -> Severity;

    /// Checks properties of the whole circuit.
    fn check_circuit(&self, _circuit: &Circuit, _sink: &DiagnosticSink) {}

    /// Checks a single module.
    fn check_module(&self, _module: &DefModule, _circuit: &Circuit, _sink: &DiagnosticSink) {}
}

/// Runs every built-in rule with default settings.
///
/// Returns all findings if any of them is an error, so the caller can report
/// warnings alongside the errors. A circuit with warnings only is accepted.
pub fn validate(circuit: &Circuit) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = CheckEngine::with_defaults().check(circuit);
    if diagnostics.iter().any(|d| d.severity.is_error()) {
        Err(diagnostics)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fir_ir::{Expression, Port, Statement, Type};

    #[test]
    fn valid_circuit_passes() {
        let c = fir_parser::parse_str(
            "circuit Top :\n  module Top :\n    input a : UInt<8>\n    output b : UInt<8>\n\n    b <= a\n",
        )
        .unwrap();
        assert_eq!(validate(&c), Ok(()));
    }

    #[test]
    fn missing_main_is_rejected() {
        let c = Circuit::new(
            "Top",
            vec![DefModule::module("Other", vec![], Statement::Block(vec![]))],
        );
        let errs = validate(&c).unwrap_err();
        assert!(errs.iter().any(|d| d.code == MainNotFound.code()));
    }

    #[test]
    fn duplicate_bundle_field_is_rejected() {
        let bundle = Type::Bundle(vec![
            fir_ir::Field::new("x", Type::uint(1)),
            fir_ir::Field::new("x", Type::uint(2)),
        ]);
        let c = Circuit::new(
            "Top",
            vec![DefModule::module(
                "Top",
                vec![Port::input("io", bundle)],
                Statement::Block(vec![]),
            )],
        );
        let errs = validate(&c).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, DuplicateField.code());
        assert!(errs[0].message.contains("`x`"));
    }

    #[test]
    fn warnings_alone_pass() {
        let c = Circuit::new(
            "Top",
            vec![DefModule::module(
                "Top",
                vec![],
                Statement::Block(vec![
                    Statement::wire("w", Type::Unknown),
                    Statement::connect(Expression::untyped("w"), Expression::uint(0, fir_ir::Width::known(1))),
                ]),
            )],
        );
        assert_eq!(validate(&c), Ok(()));
    }
}
