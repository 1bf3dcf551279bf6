//! E102: Duplicate module. Module names must be unique in a circuit.

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::Circuit;

use crate::helpers::duplicates;
use crate::CheckRule;

/// Detects module names defined more than once.
pub struct DuplicateModule;

impl CheckRule for DuplicateModule {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::error(102)
    }

    fn name(&self) -> &str {
        "duplicate-module"
    }

    fn description(&self) -> &str {
        "module name defined more than once"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_circuit(&self, circuit: &Circuit, sink: &DiagnosticSink) {
        for (name, first, second) in duplicates(circuit.module_names()) {
            let info = circuit.modules[second].info().clone();
            let prev = circuit.modules[first].info().clone();
            sink.emit(
                Diagnostic::error(self.code(), format!("module `{name}` is defined more than once"), info.clone())
                    .with_label(Label::primary(info, "redefined here"))
                    .with_label(Label::secondary(prev, "first defined here")),
            );
        }
    }
}
