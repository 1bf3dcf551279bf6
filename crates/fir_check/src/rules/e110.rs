//! E110: Recursive instance. The instance hierarchy must be acyclic.

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::{Circuit, InstanceGraph};

use crate::CheckRule;

/// Detects modules that instantiate themselves, directly or through other
/// modules.
pub struct RecursiveInstance;

impl CheckRule for RecursiveInstance {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::error(110)
    }

    fn name(&self) -> &str {
        "recursive-instance"
    }

    fn description(&self) -> &str {
        "module instantiates itself directly or indirectly"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_circuit(&self, circuit: &Circuit, sink: &DiagnosticSink) {
        let graph = InstanceGraph::new(circuit);
        let Some(cycle) = graph.find_cycle() else {
            return;
        };
        let info = cycle
            .first()
            .and_then(|name| circuit.module(name))
            .map(|m| m.info().clone())
            .unwrap_or_default();
        sink.emit(
            Diagnostic::error(
                self.code(),
                format!("recursive instantiation through modules {}", cycle.join(", ")),
                info.clone(),
            )
            .with_label(Label::primary(info, "part of the cycle"))
            .with_note("a module cannot contain an instance of itself"),
        );
    }
}
