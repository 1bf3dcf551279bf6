//! E105: Duplicate declaration. Names in a module's namespace must be unique.

use std::collections::HashMap;

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::{Circuit, DefModule};
use fir_source::Info;

use crate::CheckRule;

/// Detects declarations whose name is already taken by a port or an
/// earlier declaration of the same module.
///
/// Declarations inside `when` branches share the module namespace.
pub struct DuplicateDeclaration;

impl CheckRule for DuplicateDeclaration {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::error(105)
    }

    fn name(&self) -> &str {
        "duplicate-declaration"
    }

    fn description(&self) -> &str {
        "declaration name collides with a port or another declaration"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &DefModule, _circuit: &Circuit, sink: &DiagnosticSink) {
        let Some(body) = module.body() else {
            return;
        };
        // name -> (is port, where)
        let mut taken: HashMap<&str, (bool, &Info)> = HashMap::new();
        for port in module.ports() {
            taken.entry(port.name.as_str()).or_insert((true, &port.info));
        }
        for decl in body.declarations() {
            let Some(name) = decl.name() else {
                continue;
            };
            match taken.get(name) {
                None => {
                    taken.insert(name, (false, decl.info()));
                }
                Some(&(is_port, prev)) => {
                    let what = if is_port { "port" } else { "declaration" };
                    sink.emit(
                        Diagnostic::error(
                            self.code(),
                            format!(
                                "`{name}` is already declared as a {what} in module `{}`",
                                module.name()
                            ),
                            decl.info().clone(),
                        )
                        .with_label(Label::primary(decl.info().clone(), "redeclared here"))
                        .with_label(Label::secondary(prev.clone(), "previous declaration")),
                    );
                }
            }
        }
    }
}
