//! E111: Invalid memory. Memories need a depth and distinct port names.

use fir_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, Severity};
use fir_ir::{Circuit, DefModule, Statement};

use crate::helpers::duplicates;
use crate::CheckRule;

/// Detects memories of zero depth and memories whose reader, writer and
/// readwriter ports share a name.
pub struct InvalidMemory;

impl CheckRule for InvalidMemory {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::error(111)
    }

    fn name(&self) -> &str {
        "invalid-memory"
    }

    fn description(&self) -> &str {
        "memory with zero depth or repeated port names"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check_module(&self, module: &DefModule, _circuit: &Circuit, sink: &DiagnosticSink) {
        let Some(body) = module.body() else {
            return;
        };
        body.for_each_stmt(&mut |stmt| {
            let Statement::DefMemory {
                info,
                name,
                depth,
                readers,
                writers,
                readwriters,
                ..
            } = stmt
            else {
                return;
            };
            if *depth == 0 {
                sink.emit(
                    Diagnostic::error(self.code(), format!("memory `{name}` has depth 0"), info.clone())
                        .with_label(Label::primary(info.clone(), "declared here"))
                        .with_help("a memory needs at least one entry"),
                );
            }
            let ports = readers.iter().chain(writers).chain(readwriters);
            for (port, _, _) in duplicates(ports.map(String::as_str)) {
                sink.emit(
                    Diagnostic::error(
                        self.code(),
                        format!("memory `{name}` declares port `{port}` more than once"),
                        info.clone(),
                    )
                    .with_label(Label::primary(info.clone(), "declared here")),
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::{parse, run};

    fn memory(depth: u64, ports: &str) -> String {
        format!(
            "circuit T :\n  module T :\n    mem m :\n      data-type => UInt<8>\n      depth => {depth}\n      read-latency => 0\n      write-latency => 1\n{ports}"
        )
    }

    #[test]
    fn valid_memory_is_silent() {
        let c = parse(&memory(4, "      reader => r\n      writer => w\n      readwriter => rw\n"));
        assert!(run(&InvalidMemory, &c).is_empty());
    }

    #[test]
    fn zero_depth_fires() {
        let c = parse(&memory(0, ""));
        let diags = run(&InvalidMemory, &c);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("depth 0"));
    }

    #[test]
    fn shared_port_name_fires() {
        let c = parse(&memory(4, "      reader => p q\n      writer => p\n"));
        let diags = run(&InvalidMemory, &c);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("port `p`"));
    }
}
