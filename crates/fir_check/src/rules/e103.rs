//! E103: Duplicate port. Port names must be unique within a module.

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::{Circuit, DefModule};

use crate::helpers::duplicates;
use crate::CheckRule;

/// Detects a port name used twice in one module's port list.
pub struct DuplicatePort;

impl CheckRule for DuplicatePort {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::error(103)
    }

    fn name(&self) -> &str {
        "duplicate-port"
    }

    fn description(&self) -> &str {
        "port name repeated in a module"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &DefModule, _circuit: &Circuit, sink: &DiagnosticSink) {
        let ports = module.ports();
        for (name, first, second) in duplicates(ports.iter().map(|p| p.name.as_str())) {
            let info = ports[second].info.clone();
            sink.emit(
                Diagnostic::error(
                    self.code(),
                    format!("port `{name}` is declared more than once in module `{}`", module.name()),
                    info.clone(),
                )
                .with_label(Label::primary(info, "redeclared here"))
                .with_label(Label::secondary(ports[first].info.clone(), "first declared here")),
            );
        }
    }
}
