//! E101: Main not found. `main` must name exactly one module.

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::Circuit;

use crate::CheckRule;

/// Detects a circuit whose `main` names no module, or more than one.
pub struct MainNotFound;

impl CheckRule for MainNotFound {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::error(101)
    }

    fn name(&self) -> &str {
        "main-not-found"
    }

    fn description(&self) -> &str {
        "circuit main names no module or several"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_circuit(&self, circuit: &Circuit, sink: &DiagnosticSink) {
        let count = circuit.module_names().filter(|n| *n == circuit.main).count();
        let message = match count {
            1 => return,
            0 => format!("main module `{}` is not defined", circuit.main),
            n => format!("main module `{}` is defined {n} times", circuit.main),
        };
        let mut diag = Diagnostic::error(self.code(), message, circuit.info.clone())
            .with_label(Label::primary(circuit.info.clone(), "circuit declared here"));
        if count == 0 {
            let names: Vec<&str> = circuit.module_names().collect();
            if !names.is_empty() {
                diag = diag.with_note(format!("defined modules: {}", names.join(", ")));
            }
        }
        sink.emit(diag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::{parse, run};

    #[test]
    fn defined_main_is_silent() {
        let c = parse("circuit Top :\n  module Top :\n    skip\n");
        assert!(run(&MainNotFound, &c).is_empty());
    }

    #[test]
    fn missing_main_fires() {
        let c = parse("circuit Top :\n  module A :\n    skip\n  module B :\n    skip\n");
        let diags = run(&MainNotFound, &c);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Error);
        assert!(diags[0].message.contains("not defined"));
        assert_eq!(diags[0].notes, vec!["defined modules: A, B"]);
    }

    #[test]
    fn empty_circuit_fires() {
        let c = Circuit::new("Top", vec![]);
        assert_eq!(run(&MainNotFound, &c).len(), 1);
    }

    #[test]
    fn repeated_main_fires() {
        let c = parse("circuit Top :\n  module Top :\n    skip\n  extmodule Top :\n    input a : Clock\n");
        let diags = run(&MainNotFound, &c);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("2 times"));
    }
}
