//! W102: Unreachable module. A module never instantiated under `main`.

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::{Circuit, InstanceGraph};

use crate::CheckRule;

/// Detects modules that no instance path from `main` reaches.
///
/// Silent when `main` itself is missing; E101 reports that.
pub struct UnreachableModule;

impl CheckRule for UnreachableModule {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::warning(102)
    }

    fn name(&self) -> &str {
        "unreachable-module"
    }

    fn description(&self) -> &str {
        "module not instantiated under main"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_circuit(&self, circuit: &Circuit, sink: &DiagnosticSink) {
        if circuit.main_module().is_none() {
            return;
        }
        let reachable = InstanceGraph::new(circuit).reachable_modules();
        for module in &circuit.modules {
            if reachable.contains(module.name()) {
                continue;
            }
            let info = module.info().clone();
            sink.emit(
                Diagnostic::warning(
                    self.code(),
                    format!("module `{}` is never instantiated under `{}`", module.name(), circuit.main),
                    info.clone(),
                )
                .with_label(Label::primary(info, "defined here")),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::{parse, run};

    #[test]
    fn instantiated_modules_are_silent() {
        let c = parse("circuit T :\n  module T :\n    when c :\n      inst a of A\n  module A :\n    inst b of B\n  extmodule B :\n    input x : Clock\n");
        assert!(run(&UnreachableModule, &c).is_empty());
    }

    #[test]
    fn orphan_fires() {
        let c = parse("circuit T :\n  module T :\n    skip\n  module Orphan :\n    inst a of A\n  module A :\n    skip\n");
        let diags = run(&UnreachableModule, &c);
        let names: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "module `Orphan` is never instantiated under `T`",
                "module `A` is never instantiated under `T`",
            ]
        );
    }

    #[test]
    fn missing_main_is_silent() {
        let c = parse("circuit T :\n  module A :\n    skip\n");
        assert!(run(&UnreachableModule, &c).is_empty());
    }
}
