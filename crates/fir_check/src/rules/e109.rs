//! E109: Negative width. Declared widths must not be negative.

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::{Circuit, DefModule, Expression, Type, Width};
use fir_source::Info;

use crate::helpers::{declared_type, for_each_module_expr};
use crate::CheckRule;

/// Detects known negative widths in port types, declared types and literals.
///
/// Width arithmetic may produce negative intermediate results. Only widths a
/// user wrote down are checked here.
pub struct NegativeWidth;

impl NegativeWidth {
    fn report(&self, what: &str, widths: Vec<Width>, info: &Info, sink: &DiagnosticSink) {
        for w in widths {
            sink.emit(
                Diagnostic::error(
                    self.code(),
                    format!("{what} has negative width {}", w.value().map(|v| v.to_string()).unwrap_or_default()),
                    info.clone(),
                )
                .with_label(Label::primary(info.clone(), "declared here")),
            );
        }
    }

    fn check_type(&self, what: &str, tpe: &Type, info: &Info, sink: &DiagnosticSink) {
        self.report(what, tpe.negative_widths(), info, sink);
    }
}

impl CheckRule for NegativeWidth {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::error(109)
    }

    fn name(&self) -> &str {
        "negative-width"
    }

    fn description(&self) -> &str {
        "known negative width in a declared type or literal"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &DefModule, _circuit: &Circuit, sink: &DiagnosticSink) {
        for port in module.ports() {
            self.check_type(&format!("port `{}`", port.name), &port.tpe, &port.info, sink);
        }
        if let Some(body) = module.body() {
            for decl in body.declarations() {
                if let (Some(tpe), Some(name)) = (declared_type(decl), decl.name()) {
                    self.check_type(&format!("`{name}`"), tpe, decl.info(), sink);
                }
            }
        }
        for_each_module_expr(module, &mut |expr, stmt| {
            if let Expression::UIntLiteral { width, .. } | Expression::SIntLiteral { width, .. } =
                expr
            {
                if width.is_negative() {
                    self.report(&format!("literal `{expr}`"), vec![width.clone()], stmt.info(), sink);
                }
            }
        });
    }
}
