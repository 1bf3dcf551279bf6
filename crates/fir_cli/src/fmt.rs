//! `firc fmt`: print a circuit in canonical form.

use std::path::Path;

use fir_diagnostics::DiagnosticSink;

use crate::pipeline::{self, SourceText};
use crate::{FmtArgs, GlobalArgs, ReportFormat};

/// Renders the canonical text of a circuit.
///
/// The output parses back to the same circuit.
pub fn format_source(src: &SourceText, sink: &DiagnosticSink) -> Option<String> {
    let circuit = src.parse(sink).filter(|_| !sink.has_errors())?;
    Some(circuit.canonical().to_string())
}

/// Runs the `firc fmt` command.
///
/// The circuit is only parsed, not validated, so any well-formed text can be
/// reformatted.
pub fn run(args: &FmtArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let src = SourceText::read(Path::new(&args.file))?;
    let sink = DiagnosticSink::new();
    let formatted = format_source(&src, &sink);
    pipeline::report(&sink.take_all(), Some(&src), ReportFormat::Text, global);

    match formatted {
        Some(text) => {
            pipeline::write_output(&text, args.output.as_deref().map(Path::new))?;
            Ok(0)
        }
        None => Ok(1),
    }
}
