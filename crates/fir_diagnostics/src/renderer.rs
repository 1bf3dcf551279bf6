//! Diagnostic rendering for terminals and machines.

use crate::diagnostic::Diagnostic;
use crate::label::LabelStyle;
use crate::severity::Severity;

/// Formats a diagnostic into a string.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-like terminal format:
///
/// ```text
/// error[E002]: expected ':', found Newline
///   --> Top.fir:3:14
///    |
///  3 |   module Top
///    |             ^ here
///    = help: ...
/// ```
///
/// The source excerpt is shown only when the renderer holds the text of the
/// file the diagnostic points into.
pub struct TerminalRenderer {
    /// Whether to emit ANSI color codes.
    pub color: bool,
    source: Option<(String, String)>,
}

impl TerminalRenderer {
    /// Creates a renderer without source text.
    pub fn new(color: bool) -> Self {
        Self {
            color,
            source: None,
        }
    }

    /// Attaches the text of `file` so locations in it get a source excerpt.
    pub fn with_source(mut self, file: impl Into<String>, text: impl Into<String>) -> Self {
        self.source = Some((file.into(), text.into()));
        self
    }

    fn paint(&self, text: &str, severity: Severity) -> String {
        if !self.color {
            return text.to_string();
        }
        let code = match severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
        };
        format!("\x1b[1;{code}m{text}\x1b[0m")
    }

    fn source_line(&self, file: &str, line: u32) -> Option<&str> {
        let (name, text) = self.source.as_ref()?;
        if name != file || line == 0 {
            return None;
        }
        text.lines().nth(line as usize - 1)
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        let header = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!(
            "{}: {}\n",
            self.paint(&header, diag.severity),
            diag.message
        ));

        if let Some(loc) = diag.info.location() {
            out.push_str(&format!("  --> {}\n", loc.to_diagnostic_string()));

            if let Some(line_content) = self.source_line(&loc.file, loc.line) {
                let line_num = loc.line.to_string();
                let padding = " ".repeat(line_num.len());
                let col_padding = " ".repeat((loc.col as usize).saturating_sub(1));
                let primary_msg = diag
                    .labels
                    .iter()
                    .find(|l| l.style == LabelStyle::Primary)
                    .map(|l| format!(" {}", l.message))
                    .unwrap_or_default();
                out.push_str(&format!("{padding} |\n"));
                out.push_str(&format!("{line_num} | {line_content}\n"));
                out.push_str(&format!("{padding} | {col_padding}^{primary_msg}\n"));
            }
        } else if let Some(text) = diag.info.text() {
            out.push_str(&format!("  --> @[{text}]\n"));
        }

        for label in diag
            .labels
            .iter()
            .filter(|l| l.style == LabelStyle::Secondary)
        {
            match label.info.text() {
                Some(text) => out.push_str(&format!("   - {} @[{text}]\n", label.message)),
                None => out.push_str(&format!("   - {}\n", label.message)),
            }
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

/// Renders each diagnostic as one line of JSON.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        serde_json::to_string(diag).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;
    use crate::label::Label;
    use fir_source::Info;

    #[test]
    fn render_error_with_source() {
        let source = "circuit Top :\n  module Top\n";
        let info = Info::at("Top.fir", 2, 13);
        let diag = Diagnostic::error(DiagnosticCode::error(2), "expected ':'", info.clone())
            .with_label(Label::primary(info, "here"));

        let renderer = TerminalRenderer::new(false).with_source("Top.fir", source);
        let output = renderer.render(&diag);

        assert!(output.contains("error[E002]: expected ':'"));
        assert!(output.contains("--> Top.fir:2:13"));
        assert!(output.contains("2 |   module Top"));
        assert!(output.contains("^ here"));
    }

    #[test]
    fn render_opaque_info() {
        let diag = Diagnostic::warning(
            DiagnosticCode::warning(102),
            "module is never instantiated",
            Info::new("generated"),
        )
        .with_note("only modules under main are emitted");

        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.contains("warning[W102]: module is never instantiated"));
        assert!(output.contains("--> @[generated]"));
        assert!(output.contains("= note: only modules under main are emitted"));
    }

    #[test]
    fn render_without_info() {
        let diag = Diagnostic::error(DiagnosticCode::error(101), "no main", Info::NoInfo);
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.contains("error[E101]: no main"));
        assert!(!output.contains("-->"));
    }

    #[test]
    fn render_secondary_labels() {
        let diag = Diagnostic::error(DiagnosticCode::error(103), "duplicate port", Info::NoInfo)
            .with_label(Label::secondary(Info::new("a.fir 3:5"), "first declared here"));
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.contains("- first declared here @[a.fir 3:5]"));
    }

    #[test]
    fn color_wraps_header() {
        let diag = Diagnostic::error(DiagnosticCode::error(101), "no main", Info::NoInfo);
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.starts_with("\x1b[1;31merror[E101]\x1b[0m"));
    }

    #[test]
    fn json_is_parseable() {
        let diag = Diagnostic::error(DiagnosticCode::error(101), "no main", Info::NoInfo);
        let json = JsonRenderer.render(&diag);
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diag);
    }
}
