//! E108: Malformed literal. A literal's value must fit its width.

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::{BigInt, Circuit, DefModule, Expression, Width};

use crate::helpers::for_each_module_expr;
use crate::CheckRule;

/// Detects literals whose value is not representable in their known width,
/// and negative unsigned literals.
///
/// Literals with a negative width are left to E109.
pub struct MalformedLiteral;

impl CheckRule for MalformedLiteral {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::error(108)
    }

    fn name(&self) -> &str {
        "malformed-literal"
    }

    fn description(&self) -> &str {
        "literal value does not fit its width"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &DefModule, _circuit: &Circuit, sink: &DiagnosticSink) {
        for_each_module_expr(module, &mut |expr, stmt| {
            let (Expression::UIntLiteral { width, .. } | Expression::SIntLiteral { width, .. }) =
                expr
            else {
                return;
            };
            if width.is_negative() || expr.literal_fits() {
                return;
            }
            let reason = match (expr, width) {
                (Expression::UIntLiteral { value, .. }, _) if *value < BigInt::from(0) => {
                    "unsigned literals cannot be negative".to_string()
                }
                (_, Width::Known(w)) => format!("value needs more than {w} bits"),
                (_, Width::Unknown) => "value does not fit".to_string(),
            };
            let info = stmt.info().clone();
            sink.emit(
                Diagnostic::error(self.code(), format!("malformed literal `{expr}`: {reason}"), info.clone())
                    .with_label(Label::primary(info, "literal used here")),
            );
        });
    }
}
