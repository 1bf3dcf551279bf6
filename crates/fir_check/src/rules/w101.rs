//! W101: Unknown type. A port or declaration still has an unresolved type.

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::{Circuit, DefModule};

use crate::helpers::declared_type;
use crate::CheckRule;

/// Detects ports and declarations whose type contains the `?` placeholder.
///
/// Placeholders are legal before type inference, so this is a warning.
pub struct UnknownType;

impl CheckRule for UnknownType {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::warning(101)
    }

    fn name(&self) -> &str {
        "unknown-type"
    }

    fn description(&self) -> &str {
        "port or declaration with an unresolved type"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_module(&self, module: &DefModule, _circuit: &Circuit, sink: &DiagnosticSink) {
        let mut found = Vec::new();
        for port in module.ports() {
            if port.tpe.contains_unknown() {
                found.push((format!("port `{}`", port.name), &port.info));
            }
        }
        if let Some(body) = module.body() {
            for decl in body.declarations() {
                if let (Some(tpe), Some(name)) = (declared_type(decl), decl.name()) {
                    if tpe.contains_unknown() {
                        found.push((format!("`{name}`"), decl.info()));
                    }
                }
            }
        }
        for (what, info) in found {
            sink.emit(
                Diagnostic::warning(self.code(), format!("{what} has an unresolved type"), info.clone())
                    .with_label(Label::primary(info.clone(), "type is `?`")),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::{parse, run};

    #[test]
    fn resolved_types_are_silent() {
        let c = parse("circuit T :\n  module T :\n    input a : UInt\n\n    wire w : {x : SInt<2>}\n");
        assert!(run(&UnknownType, &c).is_empty());
    }

    #[test]
    fn placeholder_fires() {
        let c = parse("circuit T :\n  module T :\n    input a : {x : ?}\n\n    reg r : ?, clk\n");
        let diags = run(&UnknownType, &c);
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.severity == Severity::Warning));
        assert_eq!(diags[0].message, "port `a` has an unresolved type");
        assert_eq!(diags[1].message, "`r` has an unresolved type");
    }
}
