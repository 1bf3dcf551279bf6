//! E106: Undefined module. Instances must name a module of the circuit.

use std::collections::HashSet;

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::{Circuit, DefModule, Statement};

use crate::CheckRule;

/// Detects instances of modules that the circuit does not define.
pub struct UndefinedModule;

impl CheckRule for UndefinedModule {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::error(106)
    }

    fn name(&self) -> &str {
        "undefined-module"
    }

    fn description(&self) -> &str {
        "instance of a module not defined in the circuit"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &DefModule, circuit: &Circuit, sink: &DiagnosticSink) {
        let Some(body) = module.body() else {
            return;
        };
        let defined: HashSet<&str> = circuit.module_names().collect();
        body.for_each_stmt(&mut |stmt| {
            if let Statement::DefInstance { info, name, module: target } = stmt {
                if !defined.contains(target.as_str()) {
                    sink.emit(
                        Diagnostic::error(
                            self.code(),
                            format!("instance `{name}` refers to undefined module `{target}`"),
                            info.clone(),
                        )
                        .with_label(Label::primary(info.clone(), "instantiated here")),
                    );
                }
            }
        });
    }
}
