//! E107: Primop arity. Operators take a fixed number of operands.

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::{Circuit, DefModule, Expression};

use crate::helpers::for_each_module_expr;
use crate::CheckRule;

/// Detects primitive operations applied to the wrong number of expression
/// arguments or integer constants.
pub struct PrimOpArity;

fn plural(n: usize, what: &str) -> String {
    if n == 1 {
        format!("1 {what}")
    } else {
        format!("{n} {what}s")
    }
}

impl CheckRule for PrimOpArity {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::error(107)
    }

    fn name(&self) -> &str {
        "primop-arity"
    }

    fn description(&self) -> &str {
        "primitive operation with the wrong number of operands"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &DefModule, _circuit: &Circuit, sink: &DiagnosticSink) {
        for_each_module_expr(module, &mut |expr, stmt| {
            let Expression::DoPrim { op, args, consts, .. } = expr else {
                return;
            };
            let (n_args, n_consts) = op.arity();
            if args.len() == n_args && consts.len() == n_consts {
                return;
            }
            let info = stmt.info().clone();
            sink.emit(
                Diagnostic::error(
                    self.code(),
                    format!(
                        "`{op}` takes {} and {}, found {} and {}",
                        plural(n_args, "argument"),
                        plural(n_consts, "constant"),
                        args.len(),
                        consts.len()
                    ),
                    info.clone(),
                )
                .with_label(Label::primary(info, format!("in `{expr}`"))),
            );
        });
    }
}
